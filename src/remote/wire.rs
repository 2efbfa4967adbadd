use serde::{Deserialize, Serialize};

use crate::schedule::{Day, Interview};

/// A day as served by `GET /api/days`: the record plus its derived spot count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    #[serde(flatten)]
    pub day: Day,
    pub spots: usize,
}

/// Body of `PUT /api/appointments/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewPayload {
    pub interview: Interview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
