use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::error::ApiError;
use super::types::{
    CreateInterview, MailAck, MeetingRequest, MeetingResponse, OutgoingMail, StatusUpdate,
};
use super::{InterviewStore, MailSender, MeetingProvisioner};
use crate::workflow::{Interview, InterviewId, MeetingDetails};

/// Shared HTTP plumbing: bearer auth, request ids and status mapping.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    token: String,
}

impl HttpTransport {
    pub fn new(token: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, token })
    }

    fn authorize(&self, req: RequestBuilder) -> (RequestBuilder, String) {
        let request_id = Uuid::new_v4().to_string();
        let req = req.header("x-request-id", &request_id);
        let req = if self.token.is_empty() {
            req
        } else {
            req.bearer_auth(&self.token)
        };
        (req, request_id)
    }

    /// Send the request and return the raw body of a successful response.
    async fn send(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let (req, request_id) = self.authorize(req);
        let response = req.send().await?;
        let status = response.status();
        debug!(%request_id, status = status.as_u16(), url = %response.url(), "collaborator responded");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(ApiError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(req).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn join(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Record store reached over REST.
#[derive(Clone)]
pub struct HttpInterviewStore {
    transport: HttpTransport,
    base_url: String,
}

impl HttpInterviewStore {
    pub fn new(transport: HttpTransport, base_url: String) -> Self {
        Self {
            transport,
            base_url,
        }
    }
}

impl InterviewStore for HttpInterviewStore {
    async fn list_interviews(&self) -> Result<Vec<Interview>, ApiError> {
        let url = join(&self.base_url, "interviews");
        self.transport.send_json(self.transport.client.get(url)).await
    }

    async fn fetch_interview(&self, id: &InterviewId) -> Result<Interview, ApiError> {
        let url = join(&self.base_url, &format!("interviews/{id}"));
        self.transport.send_json(self.transport.client.get(url)).await
    }

    async fn create_interview(&self, request: &CreateInterview) -> Result<Interview, ApiError> {
        let url = join(&self.base_url, "interviews");
        self.transport
            .send_json(self.transport.client.post(url).json(request))
            .await
    }

    async fn update_status(
        &self,
        id: &InterviewId,
        update: &StatusUpdate,
    ) -> Result<Interview, ApiError> {
        let url = join(&self.base_url, &format!("interviews/{id}/status"));
        self.transport
            .send_json(self.transport.client.put(url).json(update))
            .await
    }
}

/// Conferencing service that hands out joinable meetings.
#[derive(Clone)]
pub struct HttpMeetingProvisioner {
    transport: HttpTransport,
    base_url: String,
}

impl HttpMeetingProvisioner {
    pub fn new(transport: HttpTransport, base_url: String) -> Self {
        Self {
            transport,
            base_url,
        }
    }
}

impl MeetingProvisioner for HttpMeetingProvisioner {
    async fn create_meeting(&self, request: &MeetingRequest) -> Result<MeetingDetails, ApiError> {
        let url = join(&self.base_url, "meetings");
        let resp: MeetingResponse = self
            .transport
            .send_json(self.transport.client.post(url).json(request))
            .await?;
        Ok(resp.into())
    }
}

/// Mail relay.
#[derive(Clone)]
pub struct HttpMailSender {
    transport: HttpTransport,
    base_url: String,
}

impl HttpMailSender {
    pub fn new(transport: HttpTransport, base_url: String) -> Self {
        Self {
            transport,
            base_url,
        }
    }
}

impl MailSender for HttpMailSender {
    async fn send(&self, mail: &OutgoingMail) -> Result<MailAck, ApiError> {
        let url = join(&self.base_url, "send");
        let body = self
            .transport
            .send(self.transport.client.post(url).json(mail))
            .await?;
        // Some relays answer 202 with an empty body.
        if body.trim().is_empty() {
            return Ok(MailAck::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}
