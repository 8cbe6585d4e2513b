//! Request and response records exchanged with the recruitment backend.
//!
//! Request types derive `Serialize` only and response types derive
//! `Deserialize` only; no record outlives a single page interaction.
//! Lists keep the order the server (or the user) supplied.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Placeholder submitted for a quiz question the user left blank.
pub const NO_ANSWER: &str = "No answer provided";

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Seniority of the role a job description is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [Self::Entry, Self::Mid, Self::Senior];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Entry => "Entry Level",
            Self::Mid => "Mid Level",
            Self::Senior => "Senior Level",
        }
    }
}

/// Target skill level of a generated quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// Difficulty tag of a generated question.
///
/// Matched case-insensitively; unknown values are kept verbatim so the UI
/// can still show them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Other(value),
        }
    }
}

impl Difficulty {
    pub fn label(&self) -> &str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Other(raw) => raw,
        }
    }
}

/// Coarse High / Medium / Low label attached to scores by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    Other(String),
}

impl From<String> for ConfidenceLevel {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other(value),
        }
    }
}

impl ConfidenceLevel {
    pub fn label(&self) -> &str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Other(raw) => raw,
        }
    }
}

// ---------------------------------------------------------------------------
// JD generator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JdRequest {
    pub role: String,
    pub skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JdResponse {
    pub title: String,
    pub job_description: String,
}

// ---------------------------------------------------------------------------
// CV screener
// ---------------------------------------------------------------------------

/// A CV document picked by the user, ready for multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct CvFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl CvFile {
    const PDF: &'static str = ".pdf";
    const DOCX: &'static str = ".docx";

    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its final path component as the
    /// upload name.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(file_name_of(path), bytes))
    }

    /// Suffix-only type gate: the name must end in `.pdf` or `.docx`.
    /// File contents are never inspected.
    pub fn is_supported_name(name: &str) -> bool {
        name.ends_with(Self::PDF) || name.ends_with(Self::DOCX)
    }

    /// MIME type sent with the multipart part.
    pub fn media_type(&self) -> &'static str {
        if self.name.ends_with(Self::PDF) {
            "application/pdf"
        } else if self.name.ends_with(Self::DOCX) {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        } else {
            "application/octet-stream"
        }
    }
}

/// Final path component as UTF-8 text, or the whole path when there is none.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Result of screening a CV against a job description.
///
/// `confidence_level` and `confidence_analysis` are absent from older
/// backend versions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CvScreenResponse {
    pub match_score: u32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(default)]
    pub confidence_analysis: Option<String>,
    pub recommendation: String,
}

// ---------------------------------------------------------------------------
// Tech quiz
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizRequest {
    pub role: String,
    pub skill_level: SkillLevel,
    pub num_questions: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    pub question: String,
    /// Reference answer; only some backend versions send it.
    #[serde(default)]
    pub answer: Option<String>,
    pub difficulty: Difficulty,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAnswer {
    pub question: String,
    pub answer: String,
}

impl UserAnswer {
    /// Pair a question with the user's answer, substituting [`NO_ANSWER`]
    /// when the answer is blank.
    pub fn new(question: impl Into<String>, answer: &str) -> Self {
        let answer = if answer.trim().is_empty() {
            NO_ANSWER.to_string()
        } else {
            answer.to_string()
        };
        Self {
            question: question.into(),
            answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizEvaluationRequest {
    pub answers: Vec<UserAnswer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizEvaluationResponse {
    pub score: u32,
    pub confidence_level: ConfidenceLevel,
    pub feedback: String,
}

// ---------------------------------------------------------------------------
// Live interview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AudioAnalysisResponse {
    pub confidence_score: u32,
    pub confidence_level: ConfidenceLevel,
    pub tone: String,
    pub summary: String,
    pub transcription: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jd_request_wire_shape() {
        let request = JdRequest {
            role: "Backend Engineer".into(),
            skills: vec!["Rust".into(), "Postgres".into()],
            experience_level: ExperienceLevel::Senior,
            company_type: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "role": "Backend Engineer",
                "skills": ["Rust", "Postgres"],
                "experience_level": "senior"
            })
        );
    }

    #[test]
    fn jd_request_includes_company_type_when_present() {
        let request = JdRequest {
            role: "Designer".into(),
            skills: vec!["Figma".into()],
            experience_level: ExperienceLevel::Entry,
            company_type: Some("Startup".into()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["company_type"], "Startup");
        assert_eq!(json["experience_level"], "entry");
    }

    #[test]
    fn quiz_request_wire_shape() {
        let request = QuizRequest {
            role: "SRE".into(),
            skill_level: SkillLevel::Advanced,
            num_questions: 7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "SRE", "skill_level": "advanced", "num_questions": 7})
        );
    }

    #[test]
    fn cv_response_with_confidence_fields() {
        let body = r#"{
            "match_score": 82,
            "strengths": ["Rust", "Distributed systems"],
            "gaps": ["Kubernetes"],
            "confidence_level": "High",
            "confidence_analysis": "Strong overlap",
            "recommendation": "Interview"
        }"#;
        let parsed: CvScreenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.match_score, 82);
        assert_eq!(parsed.strengths, vec!["Rust", "Distributed systems"]);
        assert_eq!(parsed.confidence_level, Some(ConfidenceLevel::High));
        assert_eq!(parsed.confidence_analysis.as_deref(), Some("Strong overlap"));
    }

    #[test]
    fn cv_response_without_confidence_fields() {
        let body = r#"{
            "match_score": 40,
            "strengths": [],
            "gaps": ["Go", "AWS", "Terraform"],
            "recommendation": "Reject"
        }"#;
        let parsed: CvScreenResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.confidence_level.is_none());
        assert!(parsed.confidence_analysis.is_none());
        assert_eq!(parsed.gaps, vec!["Go", "AWS", "Terraform"]);
    }

    #[test]
    fn question_answer_is_optional() {
        let with: Question = serde_json::from_str(
            r#"{"question": "What is ownership?", "answer": "...", "difficulty": "Easy", "topic": "Rust"}"#,
        )
        .unwrap();
        let without: Question = serde_json::from_str(
            r#"{"question": "Explain Pin", "difficulty": "HARD", "topic": "Async"}"#,
        )
        .unwrap();

        assert_eq!(with.answer.as_deref(), Some("..."));
        assert_eq!(with.difficulty, Difficulty::Easy);
        assert!(without.answer.is_none());
        assert_eq!(without.difficulty, Difficulty::Hard);
    }

    #[test]
    fn unknown_labels_are_preserved() {
        assert_eq!(
            Difficulty::from("Expert".to_string()),
            Difficulty::Other("Expert".into())
        );
        assert_eq!(Difficulty::from("Expert".to_string()).label(), "Expert");
        assert_eq!(ConfidenceLevel::from("medium".to_string()), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from("Unsure".to_string()).label(), "Unsure");
    }

    #[test]
    fn blank_answers_become_sentinel() {
        assert_eq!(UserAnswer::new("q", "").answer, NO_ANSWER);
        assert_eq!(UserAnswer::new("q", "  \n ").answer, NO_ANSWER);
        assert_eq!(UserAnswer::new("q", " keep spacing ").answer, " keep spacing ");
    }

    #[test]
    fn cv_file_suffix_gate() {
        assert!(CvFile::is_supported_name("resume.pdf"));
        assert!(CvFile::is_supported_name("resume.final.docx"));
        assert!(!CvFile::is_supported_name("resume.doc"));
        assert!(!CvFile::is_supported_name("resume.PDF"));
        assert!(!CvFile::is_supported_name("pdf"));
    }

    #[test]
    fn cv_file_media_type() {
        assert_eq!(CvFile::new("a.pdf", vec![]).media_type(), "application/pdf");
        assert!(CvFile::new("a.docx", vec![]).media_type().contains("wordprocessingml"));
    }

    #[test]
    fn health_status() {
        let status: HealthStatus = serde_json::from_str(r#"{"status": "healthy"}"#).unwrap();
        assert!(status.is_healthy());
        assert!(!HealthStatus { status: "degraded".into() }.is_healthy());
    }
}
