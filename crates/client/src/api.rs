//! HTTP wrapper over `/api/invoices`.

use serde::de::DeserializeOwned;
use thiserror::Error;

use invoicer_core::InvoiceId;
use invoicer_invoicing::Invoice;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/invoices";

/// Request failure, already in the form shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response (connect, transport or decode failure).
    #[error("An error occurred: {0}")]
    Network(String),
    #[error("Server returned code: {status}, error message is: {message}")]
    Status { status: u16, message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        ClientError::Network(value.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct InvoiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl InvoiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Link to the rendered PDF of an invoice.
    pub fn pdf_url(&self, id: InvoiceId) -> String {
        format!("{}/pdf/{}", self.base_url, id)
    }

    pub async fn list(&self) -> Result<Vec<Invoice>, ClientError> {
        let resp = self.http.get(&self.base_url).send().await?;
        json_body(resp).await
    }

    pub async fn get(&self, id: InvoiceId) -> Result<Invoice, ClientError> {
        let resp = self
            .http
            .get(format!("{}/{}", self.base_url, id))
            .send()
            .await?;
        json_body(resp).await
    }

    pub async fn delete(&self, id: InvoiceId) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(format!("{}/{}", self.base_url, id))
            .send()
            .await?;
        check_status(resp).await?;
        tracing::debug!(%id, "invoice deleted");
        Ok(())
    }

    pub async fn pdf(&self, id: InvoiceId) -> Result<Vec<u8>, ClientError> {
        let resp = self.http.get(self.pdf_url(id)).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

async fn json_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let resp = check_status(resp).await?;
    Ok(resp.json().await?)
}

/// Turn a non-2xx response into `ClientError::Status`, preferring the
/// `message` field of a JSON error body over the raw text.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("").to_string()
            } else {
                text
            }
        });

    tracing::warn!(status = status.as_u16(), %message, "api request failed");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
