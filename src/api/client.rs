//! `RecruitApi` trait and its reqwest-backed implementation.
//!
//! [`HttpApiClient`] issues exactly one request per operation.  JSON
//! operations send a JSON body; file-bearing operations send a multipart
//! form.  The base URL comes from [`ApiConfig`] and nothing else.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{de::DeserializeOwned, Serialize};

use crate::api::error::{ApiError, Operation};
use crate::api::types::{
    AudioAnalysisResponse, CvFile, CvScreenResponse, HealthStatus, JdRequest, JdResponse,
    QuizEvaluationRequest, QuizEvaluationResponse, QuizRequest, QuizResponse,
};
use crate::audio::AudioBlob;
use crate::config::ApiConfig;

// ---------------------------------------------------------------------------
// RecruitApi trait
// ---------------------------------------------------------------------------

/// Async interface to the recruitment backend.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks as
/// `Arc<dyn RecruitApi>`.
#[async_trait]
pub trait RecruitApi: Send + Sync {
    async fn generate_jd(&self, request: &JdRequest) -> Result<JdResponse, ApiError>;

    async fn screen_cv(&self, cv: &CvFile, jd_text: &str) -> Result<CvScreenResponse, ApiError>;

    async fn generate_quiz(&self, request: &QuizRequest) -> Result<QuizResponse, ApiError>;

    async fn evaluate_quiz(
        &self,
        request: &QuizEvaluationRequest,
    ) -> Result<QuizEvaluationResponse, ApiError>;

    async fn analyze_audio(&self, audio: &AudioBlob) -> Result<AudioAnalysisResponse, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

// ---------------------------------------------------------------------------
// HttpApiClient
// ---------------------------------------------------------------------------

pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    /// Build a client from config.
    ///
    /// A timeout is applied only when `config.timeout_secs` is set.  A
    /// default client is used if the builder fails.
    pub fn from_config(config: &ApiConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self::with_client(client, &config.base_url)
    }

    /// Wrap an already-configured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, operation: Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    async fn post_json<B, R>(&self, operation: Operation, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(operation))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::request(operation, e))?;

        decode(operation, response).await
    }

    async fn post_multipart<R>(&self, operation: Operation, form: Form) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(operation))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::request(operation, e))?;

        decode(operation, response).await
    }
}

/// Turn a response into `R`, discarding the body of any non-success status.
async fn decode<R: DeserializeOwned>(
    operation: Operation,
    response: reqwest::Response,
) -> Result<R, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            operation,
            status: status.as_u16(),
        });
    }

    response
        .json::<R>()
        .await
        .map_err(|e| ApiError::parse(operation, e))
}

#[async_trait]
impl RecruitApi for HttpApiClient {
    async fn generate_jd(&self, request: &JdRequest) -> Result<JdResponse, ApiError> {
        self.post_json(Operation::GenerateJd, request).await
    }

    async fn screen_cv(&self, cv: &CvFile, jd_text: &str) -> Result<CvScreenResponse, ApiError> {
        let operation = Operation::ScreenCv;
        let part = Part::bytes(cv.bytes.clone())
            .file_name(cv.name.clone())
            .mime_str(cv.media_type())
            .map_err(|e| ApiError::request(operation, e))?;
        let form = Form::new()
            .part("cv_file", part)
            .text("jd_text", jd_text.to_string());

        self.post_multipart(operation, form).await
    }

    async fn generate_quiz(&self, request: &QuizRequest) -> Result<QuizResponse, ApiError> {
        self.post_json(Operation::GenerateQuiz, request).await
    }

    async fn evaluate_quiz(
        &self,
        request: &QuizEvaluationRequest,
    ) -> Result<QuizEvaluationResponse, ApiError> {
        self.post_json(Operation::EvaluateQuiz, request).await
    }

    async fn analyze_audio(&self, audio: &AudioBlob) -> Result<AudioAnalysisResponse, ApiError> {
        let operation = Operation::AnalyzeAudio;
        let part = Part::bytes(audio.to_wav())
            .file_name(AudioBlob::FILE_NAME)
            .mime_str(AudioBlob::MEDIA_TYPE)
            .map_err(|e| ApiError::request(operation, e))?;
        let form = Form::new().part("file", part);

        self.post_multipart(operation, form).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let operation = Operation::Health;
        let response = self
            .client
            .get(self.url(operation))
            .send()
            .await
            .map_err(|e| ApiError::request(operation, e))?;

        decode(operation, response).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ExperienceLevel, SkillLevel, UserAnswer};
    use crate::audio::AudioFormat;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Raw request captured by the loopback server.
    struct Captured {
        head: String,
        body: Vec<u8>,
    }

    impl Captured {
        fn head_lower(&self) -> String {
            self.head.to_ascii_lowercase()
        }

        fn body_text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    async fn read_more(socket: &mut TcpStream, buf: &mut Vec<u8>) -> bool {
        let mut chunk = [0u8; 4096];
        let n = socket.read(&mut chunk).await.expect("read");
        buf.extend_from_slice(&chunk[..n]);
        n > 0
    }

    async fn read_request(socket: &mut TcpStream) -> Captured {
        let mut buf = Vec::new();
        let header_end = loop {
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
            assert!(read_more(socket, &mut buf).await, "closed before headers");
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
        let lower = head.to_ascii_lowercase();
        let mut body = buf[header_end..].to_vec();

        let content_length = lower
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());

        if let Some(len) = content_length {
            while body.len() < len {
                if !read_more(socket, &mut body).await {
                    break;
                }
            }
        } else if lower.contains("transfer-encoding: chunked") {
            while !body.ends_with(b"0\r\n\r\n") {
                if !read_more(socket, &mut body).await {
                    break;
                }
            }
        }

        Captured { head, body }
    }

    /// Accept one connection, reply with `status` and `body`, and hand back
    /// what the client sent.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let captured = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
            captured
        });

        (format!("http://{addr}"), handle)
    }

    fn client_for(base_url: String) -> HttpApiClient {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("client");
        HttpApiClient::with_client(client, &base_url)
    }

    fn jd_request() -> JdRequest {
        JdRequest {
            role: "Platform Engineer".into(),
            skills: vec!["Rust".into(), "Kubernetes".into()],
            experience_level: ExperienceLevel::Mid,
            company_type: Some("Fintech".into()),
        }
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpApiClient::from_config(&ApiConfig {
            base_url: "http://localhost:8000/".into(),
            timeout_secs: None,
        });
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url(Operation::GenerateJd),
            "http://localhost:8000/api/jd/generate"
        );
    }

    #[tokio::test]
    async fn generate_jd_posts_json() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"title": "Platform Engineer", "job_description": "We are hiring."}"#,
        )
        .await;

        let response = client_for(base).generate_jd(&jd_request()).await.unwrap();
        assert_eq!(response.title, "Platform Engineer");
        assert_eq!(response.job_description, "We are hiring.");

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /api/jd/generate HTTP/1.1"));
        assert!(captured.head_lower().contains("content-type: application/json"));

        let sent: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(sent["skills"], serde_json::json!(["Rust", "Kubernetes"]));
        assert_eq!(sent["experience_level"], "mid");
        assert_eq!(sent["company_type"], "Fintech");
    }

    #[tokio::test]
    async fn server_error_is_uniform_failure() {
        let (base, server) =
            serve_once("500 Internal Server Error", r#"{"detail": "gemini exploded"}"#).await;

        let err = client_for(base).generate_jd(&jd_request()).await.unwrap_err();
        match &err {
            ApiError::Status { operation, status } => {
                assert_eq!(*operation, Operation::GenerateJd);
                assert_eq!(*status, 500);
            }
            other => panic!("expected Status, got {other:?}"),
        }
        assert!(!err.to_string().contains("gemini"));
        assert_eq!(err.user_message(), "Failed to generate JD. Please try again.");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn validation_status_is_not_distinguished() {
        let (base, server) = serve_once("422 Unprocessable Entity", r#"{"detail": []}"#).await;

        let err = client_for(base)
            .generate_quiz(&QuizRequest {
                role: String::new(),
                skill_level: SkillLevel::Beginner,
                num_questions: 3,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 422, .. }));
        assert_eq!(err.user_message(), "Failed to generate quiz. Please try again.");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_success_body_is_parse_error() {
        let (base, server) = serve_once("200 OK", r#"{"score": "not a number"}"#).await;

        let err = client_for(base)
            .evaluate_quiz(&QuizEvaluationRequest {
                answers: vec![UserAnswer::new("q1", "a1")],
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Parse {
                operation: Operation::EvaluateQuiz,
                ..
            }
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn evaluate_quiz_sends_answers_in_order() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"score": 64, "confidence_level": "Medium", "feedback": "Decent"}"#,
        )
        .await;

        let request = QuizEvaluationRequest {
            answers: vec![
                UserAnswer::new("first", "yes"),
                UserAnswer::new("second", ""),
            ],
        };
        let response = client_for(base).evaluate_quiz(&request).await.unwrap();
        assert_eq!(response.score, 64);

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /api/quiz/evaluate HTTP/1.1"));
        let sent: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"answers": [
                {"question": "first", "answer": "yes"},
                {"question": "second", "answer": "No answer provided"}
            ]})
        );
    }

    #[tokio::test]
    async fn screen_cv_sends_multipart() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"match_score": 77, "strengths": ["a"], "gaps": [], "recommendation": "Proceed"}"#,
        )
        .await;

        let cv = CvFile::new("resume.pdf", b"%PDF-1.4 fake".to_vec());
        let response = client_for(base)
            .screen_cv(&cv, "Senior Rust engineer")
            .await
            .unwrap();
        assert_eq!(response.match_score, 77);
        assert!(response.confidence_level.is_none());

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /api/cv/screen HTTP/1.1"));
        assert!(captured.head_lower().contains("multipart/form-data"));
        let body = captured.body_text();
        assert!(body.contains(r#"name="cv_file"; filename="resume.pdf""#));
        assert!(body.contains("application/pdf"));
        assert!(body.contains("%PDF-1.4 fake"));
        assert!(body.contains(r#"name="jd_text""#));
        assert!(body.contains("Senior Rust engineer"));
    }

    #[tokio::test]
    async fn analyze_audio_uploads_wav_file() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"confidence_score": 81, "confidence_level": "High", "tone": "Calm",
                "summary": "Clear answer", "transcription": "I led the migration"}"#,
        )
        .await;

        let blob = AudioBlob::new(
            AudioFormat {
                sample_rate: 16_000,
                channels: 1,
            },
            vec![1, 0, 2, 0],
        );
        let response = client_for(base).analyze_audio(&blob).await.unwrap();
        assert_eq!(response.confidence_score, 81);
        assert_eq!(response.tone, "Calm");

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /api/interview/analyze-audio HTTP/1.1"));
        let body = captured.body_text();
        assert!(body.contains(r#"name="file"; filename="recording.wav""#));
        assert!(body.contains("audio/wav"));
        assert!(body.contains("RIFF"));
        assert!(!body.contains("jd_text"));
    }

    #[tokio::test]
    async fn health_uses_get() {
        let (base, server) = serve_once("200 OK", r#"{"status": "healthy"}"#).await;

        let status = client_for(base).health().await.unwrap();
        assert!(status.is_healthy());

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("GET /health HTTP/1.1"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{addr}"))
            .health()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Request {
                operation: Operation::Health,
                ..
            }
        ));
    }

    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn RecruitApi> = Box::new(client_for("http://localhost:8000".into()));
        drop(client);
    }
}
