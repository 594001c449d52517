use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;

use crate::{
    app::{ServiceError, ServiceResult},
    config::ServiceCredentials,
};

/// Wrapper on the personality-inference service. Implementations differ in
/// request shape but share the contract: submit text, get back the profile
/// document as opaque JSON.
#[async_trait::async_trait]
pub trait ProfileService {
    async fn get_profile(&self, text: &str) -> ServiceResult<Value>;
}

const SYNTHETIC_USER_ID: &str = "dummy-user";
const SYNTHETIC_CONTENT_ID: &str = "dummy-content";

/// Submits the raw text as a text/plain body to `{url}/v2/profile`.
pub struct PlainTextProfileService {
    client: reqwest::Client,
    credentials: ServiceCredentials,
}

impl PlainTextProfileService {
    pub fn new(credentials: ServiceCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl ProfileService for PlainTextProfileService {
    async fn get_profile(&self, text: &str) -> ServiceResult<Value> {
        let Some(url) = &self.credentials.url else {
            return ServiceError::upstream("no profile service endpoint is configured");
        };
        let response = self
            .client
            .post(format!("{}/v2/profile", url))
            .basic_auth(
                self.credentials.username.as_deref().unwrap_or_default(),
                self.credentials.password.as_deref(),
            )
            .header("Content-Type", "text/plain")
            .body(text.to_string())
            .send()
            .await?;
        parse_profile_response(response).await
    }
}

/// Wraps the text into a single-item content document and posts it as JSON to
/// `{url}api/v2/profile`. The endpoint is expected to carry its own trailing
/// separator.
pub struct JsonProfileService {
    client: reqwest::Client,
    credentials: ServiceCredentials,
}

#[derive(Serialize)]
struct ContentItem<'a> {
    id: &'static str,
    userid: &'static str,
    sourceid: &'static str,
    contenttype: &'static str,
    language: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRequest<'a> {
    content_items: Vec<ContentItem<'a>>,
}

impl JsonProfileService {
    pub fn new(credentials: ServiceCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl ProfileService for JsonProfileService {
    async fn get_profile(&self, text: &str) -> ServiceResult<Value> {
        let Some(url) = &self.credentials.url else {
            return ServiceError::upstream("no profile service endpoint is configured");
        };
        let request = ProfileRequest {
            content_items: vec![ContentItem {
                id: SYNTHETIC_CONTENT_ID,
                userid: SYNTHETIC_USER_ID,
                sourceid: "freetext",
                contenttype: "text/plain",
                language: "en",
                content: text,
            }],
        };
        let response = self
            .client
            .post(format!("{}api/v2/profile", url))
            .basic_auth(
                self.credentials.username.as_deref().unwrap_or_default(),
                self.credentials.password.as_deref(),
            )
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&request)?)
            .send()
            .await?;
        parse_profile_response(response).await
    }
}

/// The body is parsed as JSON regardless of status; a body that is not JSON
/// fails with the status embedded in the message.
async fn parse_profile_response(response: reqwest::Response) -> ServiceResult<Value> {
    let status = response.status();
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|_| {
        ServiceError::Upstream(format!(
            "error processing the upstream response, HTTP {}",
            status.as_u16()
        ))
    })
}

#[derive(Clone, Default)]
pub struct MockProfileService {
    pub received_texts: Arc<Mutex<Vec<String>>>,
}

#[allow(unused)]
impl MockProfileService {
    pub fn get_received_texts(&self) -> Vec<String> {
        self.received_texts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ProfileService for MockProfileService {
    async fn get_profile(&self, text: &str) -> ServiceResult<Value> {
        self.received_texts.lock().unwrap().push(text.to_string());
        Ok(serde_json::json!({
            "word_count": text.split_whitespace().count(),
        }))
    }
}
