use crate::error::ValidationError;
use crate::schedule::{Interview, InterviewerId};

/// Draft of the booking form while a slot is in CREATE or EDIT
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewForm {
    pub student: String,
    pub interviewer: Option<InterviewerId>,
    pub error: Option<ValidationError>, // shown under the form
}

impl InterviewForm {
    /// Form pre-filled from an existing booking (the EDIT view)
    pub fn from_interview(interview: &Interview) -> Self {
        Self {
            student: interview.student.clone(),
            interviewer: Some(interview.interviewer),
            error: None,
        }
    }

    /// Validates the draft and records the outcome on the form
    pub fn submit(&mut self, available: &[InterviewerId]) -> Result<Interview, ValidationError> {
        let result = validate_interview(&self.student, self.interviewer, available);
        self.error = result.as_ref().err().cloned();
        result
    }
}

/// Validates form input into an interview
///
/// # Arguments
/// * `student` - Student name as typed; surrounding whitespace is dropped
/// * `interviewer` - Selected interviewer, if any
/// * `available` - Interviewers offered on the slot's day
pub fn validate_interview(
    student: &str,
    interviewer: Option<InterviewerId>,
    available: &[InterviewerId],
) -> Result<Interview, ValidationError> {
    let student = student.trim();
    if student.is_empty() {
        return Err(ValidationError::BlankStudentName);
    }

    let interviewer = interviewer.ok_or(ValidationError::MissingInterviewer)?;
    if !available.contains(&interviewer) {
        return Err(ValidationError::InterviewerUnavailable(interviewer));
    }

    Ok(Interview {
        student: student.to_string(),
        interviewer,
    })
}
