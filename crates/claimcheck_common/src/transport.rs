//! Transport - one HTTP exchange with the analysis service
//!
//! The controllers only see `Transport`; `HttpTransport` is the reqwest
//! implementation used by the CLI. Tests substitute scripted transports.

use crate::config::ApiConfig;
use crate::error::TransportError;
use crate::request::{OutboundRequest, RequestPayload};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Status and body of a completed exchange, whatever the status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request once. Non-2xx statuses are returned, not raised.
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request).await
    }
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("claimcheck/{}", crate::VERSION))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, TransportError> {
        Self::new(&api.base_url, Duration::from_secs(api.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_form(
        form: &crate::request::MultipartForm,
    ) -> Result<reqwest::multipart::Form, TransportError> {
        let mut multipart = reqwest::multipart::Form::new();
        for (name, value) in &form.text_fields {
            multipart = multipart.text(name.clone(), value.clone());
        }
        for part in &form.file_parts {
            let file_part = reqwest::multipart::Part::bytes(part.file.bytes.clone())
                .file_name(part.file.name.clone())
                .mime_str(&part.file.mime)
                .map_err(|e| TransportError::Request(e.to_string()))?;
            multipart = multipart.part(part.field.clone(), file_part);
        }
        Ok(multipart)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Unreachable(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        let url = request.endpoint.url(&self.base_url);
        debug!(%url, "sending request");

        let builder = self.client.post(&url);
        let builder = match &request.payload {
            RequestPayload::Json(body) => builder.json(body),
            RequestPayload::Multipart(form) => builder.multipart(Self::build_form(form)?),
        };

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        debug!(%url, status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body })
    }
}
