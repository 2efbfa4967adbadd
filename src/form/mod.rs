pub mod submission;

pub use submission::{validate_interview, InterviewForm};
