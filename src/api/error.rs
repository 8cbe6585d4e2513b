//! API error type and the operations it is reported against.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// One logical backend call.  Every request issued by the client belongs to
/// exactly one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GenerateJd,
    ScreenCv,
    GenerateQuiz,
    EvaluateQuiz,
    AnalyzeAudio,
    Health,
}

impl Operation {
    /// Endpoint path, appended to the configured base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::GenerateJd => "/api/jd/generate",
            Operation::ScreenCv => "/api/cv/screen",
            Operation::GenerateQuiz => "/api/quiz/generate",
            Operation::EvaluateQuiz => "/api/quiz/evaluate",
            Operation::AnalyzeAudio => "/api/interview/analyze-audio",
            Operation::Health => "/health",
        }
    }

    /// The message shown to the user when this operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::GenerateJd => "Failed to generate JD. Please try again.",
            Operation::ScreenCv => "Failed to screen CV. Please try again.",
            Operation::GenerateQuiz => "Failed to generate quiz. Please try again.",
            Operation::EvaluateQuiz => "Failed to evaluate quiz. Please try again.",
            Operation::AnalyzeAudio => "Failed to analyze audio. Please try again.",
            Operation::Health => "Backend unreachable.",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors returned by [`RecruitApi`](super::RecruitApi) calls.
///
/// The server's error body is never read: a failed status carries only the
/// code.  All variants map to the same user-facing message per operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout or request-building failure.
    #[error("{operation}: request failed: {message}")]
    Request {
        operation: Operation,
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("{operation}: backend returned HTTP {status}")]
    Status { operation: Operation, status: u16 },

    /// The success body did not match the expected response shape.
    #[error("{operation}: failed to parse response: {message}")]
    Parse {
        operation: Operation,
        message: String,
    },
}

impl ApiError {
    pub(crate) fn request(operation: Operation, err: reqwest::Error) -> Self {
        ApiError::Request {
            operation,
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(operation: Operation, err: reqwest::Error) -> Self {
        ApiError::Parse {
            operation,
            message: err.to_string(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            ApiError::Request { operation, .. }
            | ApiError::Status { operation, .. }
            | ApiError::Parse { operation, .. } => *operation,
        }
    }

    /// Generic, retry-worthy message for display.  Never includes detail
    /// from the server.
    pub fn user_message(&self) -> &'static str {
        self.operation().failure_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_the_operation_message() {
        let errors = [
            ApiError::Request {
                operation: Operation::ScreenCv,
                message: "connection refused".into(),
            },
            ApiError::Status {
                operation: Operation::ScreenCv,
                status: 422,
            },
            ApiError::Parse {
                operation: Operation::ScreenCv,
                message: "missing field".into(),
            },
        ];
        for err in errors {
            assert_eq!(err.user_message(), "Failed to screen CV. Please try again.");
        }
    }

    #[test]
    fn display_names_the_endpoint() {
        let err = ApiError::Status {
            operation: Operation::GenerateQuiz,
            status: 500,
        };
        assert_eq!(err.to_string(), "/api/quiz/generate: backend returned HTTP 500");
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(Operation::GenerateJd.path(), "/api/jd/generate");
        assert_eq!(Operation::ScreenCv.path(), "/api/cv/screen");
        assert_eq!(Operation::GenerateQuiz.path(), "/api/quiz/generate");
        assert_eq!(Operation::EvaluateQuiz.path(), "/api/quiz/evaluate");
        assert_eq!(Operation::AnalyzeAudio.path(), "/api/interview/analyze-audio");
        assert_eq!(Operation::Health.path(), "/health");
    }
}
