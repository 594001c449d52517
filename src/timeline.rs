use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::{
    app::{ServiceError, ServiceResult},
    config::SocialCredentials,
    oauth1,
    sanitize::sanitize,
};

pub const DEFAULT_SOCIAL_API_URL: &str = "https://api.twitter.com/1.1";

const TIMELINE_POST_LIMIT: u32 = 100;

/// Fetches the recent posts of a handle and flattens them into one sanitized
/// text blob.
#[async_trait::async_trait]
pub trait TimelineService {
    async fn fetch_timeline(&self, handle: &str) -> ServiceResult<String>;
}

#[derive(Deserialize)]
struct TimelinePost {
    text: String,
}

pub struct TwitterTimelineService {
    client: reqwest::Client,
    base_url: String,
    credentials: SocialCredentials,
}

impl TwitterTimelineService {
    pub fn new(credentials: SocialCredentials, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl TimelineService for TwitterTimelineService {
    async fn fetch_timeline(&self, handle: &str) -> ServiceResult<String> {
        if !self.credentials.is_complete() {
            return ServiceError::configuration("social API credentials are not configured");
        }

        let url = format!("{}/statuses/user_timeline.json", self.base_url);
        let count = TIMELINE_POST_LIMIT.to_string();
        let query = [
            ("screen_name", handle),
            ("count", count.as_str()),
            ("exclude_replies", "true"),
        ];
        let authorization = oauth1::authorization_header(
            "GET",
            &url,
            &query,
            &self.credentials,
            &oauth1::RequestToken::generate(),
        );

        let response = self
            .client
            .get(&url)
            .query(&query)
            .header("Authorization", authorization)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return ServiceError::upstream(format!(
                "social API returned HTTP {}",
                status.as_u16()
            ));
        }
        let posts: Vec<TimelinePost> = serde_json::from_str(&body).map_err(|_| {
            ServiceError::Upstream(format!(
                "unexpected social API response, HTTP {}",
                status.as_u16()
            ))
        })?;

        Ok(posts.iter().map(|post| sanitize(&post.text)).collect())
    }
}

#[derive(Clone, Default)]
pub struct MockTimelineService {
    pub timeline: Arc<Mutex<Option<String>>>,
    pub requested_handles: Arc<Mutex<Vec<String>>>,
}

#[allow(unused)]
impl MockTimelineService {
    pub fn with_timeline(timeline: impl Into<String>) -> Self {
        let service = Self::default();
        *service.timeline.lock().unwrap() = Some(timeline.into());
        service
    }

    pub fn get_requested_handles(&self) -> Vec<String> {
        self.requested_handles.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TimelineService for MockTimelineService {
    async fn fetch_timeline(&self, handle: &str) -> ServiceResult<String> {
        self.requested_handles
            .lock()
            .unwrap()
            .push(handle.to_string());
        match self.timeline.lock().unwrap().clone() {
            Some(timeline) => Ok(timeline),
            None => ServiceError::upstream("no timeline available"),
        }
    }
}
