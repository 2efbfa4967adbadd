use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::error::RemoteError;
use crate::schedule::{Appointment, AppointmentId, Day, Interview, Interviewer, InterviewerId};
use super::store::Operation;
use super::wire::{ErrorBody, InterviewPayload};
use super::SchedulerApi;

/// Client for the scheduler API served by [`crate::web`]
#[derive(Debug, Clone)]
pub struct HttpSchedulerApi {
    client: Client,
    base_url: String,
}

impl HttpSchedulerApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Re-seeds the server's store (test setup only)
    pub async fn reset(&self) -> Result<(), RemoteError> {
        let response = self.client.get(self.url("/api/debug/reset")).send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// Makes the server reject its next `operation` (test setup only)
    pub async fn fail_next(&self, operation: Operation) -> Result<(), RemoteError> {
        let operation = match operation {
            Operation::Save => "save",
            Operation::Delete => "delete",
        };
        let response = self
            .client
            .get(self.url(&format!("/api/debug/fail-next/{}", operation)))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Passes 2xx responses through and turns everything else into a `RemoteError`
async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or(body),
        Err(_) => String::new(),
    };
    Err(RemoteError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Maps the status codes the API uses for record errors onto their variants
fn classify(error: RemoteError, appointment_id: AppointmentId) -> RemoteError {
    match error {
        RemoteError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            RemoteError::UnknownAppointment(appointment_id)
        }
        RemoteError::Status { status, message } if status == StatusCode::BAD_REQUEST.as_u16() => {
            RemoteError::InvalidInterview(message)
        }
        other => other,
    }
}

#[async_trait]
impl SchedulerApi for HttpSchedulerApi {
    async fn read_days(&self) -> Result<Vec<Day>, RemoteError> {
        self.get_json("/api/days").await
    }

    async fn read_appointments(&self) -> Result<BTreeMap<AppointmentId, Appointment>, RemoteError> {
        self.get_json("/api/appointments").await
    }

    async fn read_interviewers(&self) -> Result<BTreeMap<InterviewerId, Interviewer>, RemoteError> {
        self.get_json("/api/interviewers").await
    }

    async fn save_interview(&self, appointment_id: AppointmentId, interview: &Interview) -> Result<(), RemoteError> {
        let payload = InterviewPayload {
            interview: interview.clone(),
        };
        let response = self
            .client
            .put(self.url(&format!("/api/appointments/{}", appointment_id)))
            .json(&payload)
            .send()
            .await?;
        check_status(response)
            .await
            .map_err(|error| classify(error, appointment_id))?;
        Ok(())
    }

    async fn delete_interview(&self, appointment_id: AppointmentId) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/appointments/{}", appointment_id)))
            .send()
            .await?;
        check_status(response)
            .await
            .map_err(|error| classify(error, appointment_id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpSchedulerApi {
        HttpSchedulerApi::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn reads_string_keyed_maps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appointments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "1": { "id": 1, "time": "12pm", "day": 1, "interview": null },
                "2": { "id": 2, "time": "1pm", "day": 1,
                       "interview": { "student": "Archie Cohen", "interviewer": 2 } }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/days"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Monday", "appointments": [1, 2], "interviewers": [1, 2], "spots": 1 }
            ])))
            .mount(&server)
            .await;

        let api = client(&server);
        let appointments = api.read_appointments().await.unwrap();
        assert!(!appointments[&1].is_booked());
        assert_eq!(appointments[&2].interview.as_ref().unwrap().student, "Archie Cohen");

        let days = api.read_days().await.unwrap();
        assert_eq!(days[0].appointments, vec![1, 2]);
    }

    #[tokio::test]
    async fn save_puts_the_interview_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/appointments/1"))
            .and(body_json(json!({
                "interview": { "student": "Lydia Miller-Jones", "interviewer": 1 }
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let interview = Interview {
            student: "Lydia Miller-Jones".to_string(),
            interviewer: 1,
        };
        client(&server).save_interview(1, &interview).await.unwrap();
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/appointments/40"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "appointment 40 does not exist" })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/appointments/2"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "cancel failed" })))
            .mount(&server)
            .await;

        let api = client(&server);
        assert_eq!(api.delete_interview(40).await, Err(RemoteError::UnknownAppointment(40)));
        assert_eq!(
            api.delete_interview(2).await,
            Err(RemoteError::Status {
                status: 500,
                message: "cancel failed".to_string()
            })
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let api = HttpSchedulerApi::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert!(matches!(api.read_days().await, Err(RemoteError::Transport(_))));
    }
}
