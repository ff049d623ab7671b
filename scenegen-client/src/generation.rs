//! Generation API endpoints

use async_trait::async_trait;
use reqwest::multipart;
use tracing::debug;

use crate::backend::{EventBatch, GenerationBackend};
use crate::error::{ClientError, Result};
use crate::GenerationClient;
use scenegen_core::domain::job::{JobConfiguration, JobStatus};
use scenegen_core::dto::job::{EventsResponse, ResultResponse, StatusResponse, SubmitResponse};

#[async_trait]
impl GenerationBackend for GenerationClient {
    async fn submit(&self, config: &JobConfiguration) -> Result<String> {
        let url = self.endpoint("add_task");

        debug!(
            "Requesting generation with prompt: `{}` (reference: {})",
            config.prompt,
            config
                .reference
                .as_ref()
                .map(|r| r.file_name.as_str())
                .unwrap_or("none"),
        );

        let mut form = multipart::Form::new()
            .text("client_id", self.client_id().to_string())
            .text("prompt", config.prompt.clone());

        if let Some(reference) = &config.reference {
            let part = multipart::Part::bytes(reference.bytes.clone())
                .file_name(reference.file_name.clone())
                .mime_str(&reference.content_type)?;
            form = form.part("image", part);
        }

        let response = self.client.post(&url).multipart(form).send().await?;
        let res: SubmitResponse = self.handle_response(response).await?;

        debug!("Generation request accepted, task id: `{}`", res.task_id);
        Ok(res.task_id)
    }

    async fn fetch_events(&self, job_id: &str, received: usize) -> Result<EventBatch> {
        let url = self.endpoint("get_events");
        let received = received.to_string();
        let params = [
            ("client_id", self.client_id()),
            ("task_id", job_id),
            ("n_received", received.as_str()),
        ];

        let response = self.client.post(&url).form(&params).send().await?;
        let res: EventsResponse = self.handle_response(response).await?;

        Ok(EventBatch {
            events: res.events,
            total_received: res.n_received,
        })
    }

    async fn fetch_status(&self, job_id: &str) -> Result<JobStatus> {
        let url = self.endpoint("get_status");
        let params = [("client_id", self.client_id()), ("task_id", job_id)];

        let response = self.client.post(&url).form(&params).send().await?;
        let res: StatusResponse = self.handle_response(response).await?;

        match JobStatus::from_token(&res.status) {
            Some(status) => Ok(status),
            None => Err(ClientError::UnrecognizedStatus(res.status)),
        }
    }

    async fn fetch_result(&self, job_id: &str) -> Result<String> {
        let url = self.endpoint("get_result");
        let params = [("client_id", self.client_id()), ("task_id", job_id)];

        let response = self.client.post(&url).form(&params).send().await?;
        let res: ResultResponse = self.handle_response(response).await?;

        if !res.success || res.url.is_empty() {
            return Err(ClientError::ResultUnavailable);
        }

        debug!("Generation result url: `{}`", res.url);
        Ok(res.url)
    }
}
