//! Per-page form state.
//!
//! Each page keeps its editable draft plus one or more [`Submission`] slots.
//! Forms never talk to the network: `submit*` methods hand back a [`Ticket`]
//! and the request to send, and completions are fed back in by the UI when
//! the dispatcher reports them.

pub mod cv;
pub mod interview;
pub mod jd;
pub mod quiz;
pub mod submission;

pub use cv::CvForm;
pub use interview::InterviewPage;
pub use jd::JdForm;
pub use quiz::QuizForm;
pub use submission::{Submission, Ticket};
