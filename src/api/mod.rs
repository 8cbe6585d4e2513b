//! Typed client for the recruitment backend.
//!
//! * [`RecruitApi`]: async trait with one method per backend operation.
//! * [`HttpApiClient`]: reqwest implementation (JSON and multipart).
//! * [`ApiError`] / [`Operation`]: uniform failure signal per operation.
//! * `types`: request and response records.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use recruit_assist::api::{ExperienceLevel, HttpApiClient, JdRequest, RecruitApi};
//! use recruit_assist::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = HttpApiClient::from_config(&config.api);
//!
//!     let request = JdRequest {
//!         role: "Backend Engineer".into(),
//!         skills: vec!["Rust".into()],
//!         experience_level: ExperienceLevel::Senior,
//!         company_type: None,
//!     };
//!     match client.generate_jd(&request).await {
//!         Ok(jd) => println!("{}\n\n{}", jd.title, jd.job_description),
//!         Err(e) => eprintln!("{}", e.user_message()),
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{HttpApiClient, RecruitApi};
pub use error::{ApiError, Operation};
pub use types::{
    file_name_of, AudioAnalysisResponse, ConfidenceLevel, CvFile, CvScreenResponse, Difficulty,
    ExperienceLevel, HealthStatus, JdRequest, JdResponse, Question, QuizEvaluationRequest,
    QuizEvaluationResponse, QuizRequest, QuizResponse, SkillLevel, UserAnswer, NO_ANSWER,
};
