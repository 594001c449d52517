use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse};
use log::error;
use thiserror::Error;

use crate::{
    config::{ServiceCredentials, SocialCredentials},
    persistence::records::{RecordRepository, RecordRepositoryImpl},
    profile::{JsonProfileService, PlainTextProfileService, ProfileService},
    timeline::{DEFAULT_SOCIAL_API_URL, TimelineService, TwitterTimelineService},
};

pub type ArcProfileService = Arc<Box<dyn ProfileService + Send + Sync + 'static>>;
pub type ArcTimelineService = Arc<Box<dyn TimelineService + Send + Sync + 'static>>;
pub type ArcRecordRepository = Arc<Box<dyn RecordRepository + Send + Sync + 'static>>;

const SAMPLE_TEXT_PATH: &str = "public/text/en.txt";

#[derive(Clone)]
pub struct AppState {
    pub profile_service: ArcProfileService,
    pub timeline_service: ArcTimelineService,
    pub record_repository: ArcRecordRepository,

    pub default_content: Arc<String>,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no such user: {0}")]
    NoSuchUser(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("connection error: {0}")]
    ConnectionError(rusqlite::Error),
    #[error("query error: {0}")]
    QueryError(rusqlite::Error),
}

impl ServiceError {
    pub fn configuration<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Configuration(msg.into()))
    }

    pub fn upstream<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Upstream(msg.into()))
    }

    pub fn no_such_user<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::NoSuchUser(msg.into()))
    }

    pub fn bad_request<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::BadRequest(msg.into()))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self {
            ServiceError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::Transport(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            ServiceError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ServiceError::Serialization(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ServiceError::NoSuchUser(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Database(DatabaseError::ConnectionError(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database unavailable".to_string(),
            ),
            ServiceError::Database(DatabaseError::QueryError(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub fn construct_app() -> AppState {
    let credentials = ServiceCredentials::from_env();
    let profile_service: ArcProfileService = match std::env::var("PROFILE_API_FORMAT").as_deref() {
        Ok("json") => Arc::new(Box::new(JsonProfileService::new(credentials))),
        _ => Arc::new(Box::new(PlainTextProfileService::new(credentials))),
    };

    let social_api_url =
        std::env::var("SOCIAL_API_URL").unwrap_or_else(|_| DEFAULT_SOCIAL_API_URL.to_string());
    let timeline_service: ArcTimelineService = Arc::new(Box::new(TwitterTimelineService::new(
        SocialCredentials::from_env(),
        social_api_url,
    )));

    let record_repository: ArcRecordRepository = Arc::new(Box::new(RecordRepositoryImpl::new()));

    let default_content = match std::fs::read_to_string(SAMPLE_TEXT_PATH) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read sample text at {}: {}", SAMPLE_TEXT_PATH, e);
            String::new()
        }
    };

    AppState {
        profile_service,
        timeline_service,
        record_repository,
        default_content: Arc::new(default_content),
    }
}
