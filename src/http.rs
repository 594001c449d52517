use axum::{
    Json, Router,
    extract::{Form, State},
    response::Html,
    routing::get,
};
use log::{error, info};
use serde::Deserialize;
use serde_json::Value;
use tower_http::services::ServeDir;

use crate::{
    app::{AppState, ServiceError, ServiceResult},
    persistence::records::LookupOutcome,
    sanitize::sanitize,
};

pub async fn run(
    state: AppState,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let router: Router<AppState> = Router::new()
        .route("/", get(index).post(analyze))
        .nest_service("/public", ServeDir::new("public"));

    let host = std::env::var("INSIGHT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("INSIGHT_PORT")
        .map(|port| port.parse::<u16>().expect("INSIGHT_PORT must be a valid u16"))
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .expect("Failed to bind HTTP listener");

    info!("Listening on {}:{}", host, port);
    axum::serve(listener, router.with_state(state))
        .with_graceful_shutdown(shutdown_signal)
        .await
        .unwrap();

    info!("HTTP server shut down gracefully");
}

/// Shows the default page with sample text content.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let page = include_str!("../templates/index.html")
        .replace("{{content}}", &escape_html(&state.default_content));
    Html(page)
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub twittername: Option<String>,
    pub fullname: Option<String>,
}

pub async fn analyze(
    State(state): State<AppState>,
    Form(request): Form<AnalyzeRequest>,
) -> Result<Json<Value>, ServiceError> {
    match run_analysis(&state, &request).await {
        Ok(profile) => Ok(Json(profile)),
        Err(e) => {
            error!("Analysis failed: {}", e);
            Err(e)
        }
    }
}

/// Exactly one of {social handle, full name, free text} drives the request,
/// checked in that order.
async fn run_analysis(state: &AppState, request: &AnalyzeRequest) -> ServiceResult<Value> {
    if let Some(handle) = request.twittername.as_deref().filter(|h| !h.is_empty()) {
        info!("Analyzing the timeline of {}", handle);
        let timeline = state.timeline_service.fetch_timeline(handle).await?;
        return state.profile_service.get_profile(&timeline).await;
    }

    if let Some(fullname) = request
        .fullname
        .as_deref()
        .filter(|f| !f.is_empty() && *f != "None")
    {
        let Some((first_name, last_name)) = fullname.split_once(' ') else {
            return ServiceError::bad_request(
                "expected a first and last name separated by a space",
            );
        };
        info!("Analyzing the stored records of {} {}", first_name, last_name);
        let text = match state.record_repository.lookup_record(first_name, last_name)? {
            LookupOutcome::Found(text) => text,
            LookupOutcome::NotFound => {
                return ServiceError::no_such_user(format!("No stored records for {}", fullname));
            }
        };
        return state.profile_service.get_profile(&text).await;
    }

    info!("Analyzing textbox entry");
    let text = sanitize(request.text.as_deref().unwrap_or_default());
    state.profile_service.get_profile(&text).await
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        persistence::records::MockRecordRepository, profile::MockProfileService,
        timeline::MockTimelineService,
    };

    use super::*;

    fn test_state(
        profile: &MockProfileService,
        timeline: &MockTimelineService,
        records: &MockRecordRepository,
    ) -> AppState {
        AppState {
            profile_service: Arc::new(Box::new(profile.clone())),
            timeline_service: Arc::new(Box::new(timeline.clone())),
            record_repository: Arc::new(Box::new(records.clone())),
            default_content: Arc::new(String::new()),
        }
    }

    fn request(
        text: Option<&str>,
        twittername: Option<&str>,
        fullname: Option<&str>,
    ) -> AnalyzeRequest {
        AnalyzeRequest {
            text: text.map(str::to_string),
            twittername: twittername.map(str::to_string),
            fullname: fullname.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_timeline_branch_takes_precedence() {
        let profile = MockProfileService::default();
        let timeline = MockTimelineService::with_timeline("cleaned timeline text");
        let records = MockRecordRepository::default();
        records.insert("Jane", "Doe", "stored text");
        let state = test_state(&profile, &timeline, &records);

        let result = run_analysis(
            &state,
            &request(Some("typed text"), Some("someone"), Some("Jane Doe")),
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(timeline.get_requested_handles(), vec!["someone".to_string()]);
        assert_eq!(
            profile.get_received_texts(),
            vec!["cleaned timeline text".to_string()]
        );
        assert!(records.get_requested_names().is_empty());
    }

    #[tokio::test]
    async fn test_record_branch_feeds_stored_text() {
        let profile = MockProfileService::default();
        let timeline = MockTimelineService::default();
        let records = MockRecordRepository::default();
        records.insert("Jane", "Doe", "Hello  World!!");
        let state = test_state(&profile, &timeline, &records);

        let result = run_analysis(&state, &request(None, None, Some("Jane Doe"))).await;

        assert!(result.is_ok());
        assert_eq!(
            records.get_requested_names(),
            vec![("Jane".to_string(), "Doe".to_string())]
        );
        assert_eq!(profile.get_received_texts(), vec!["Hello  World!!".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_name_is_no_such_user() {
        let profile = MockProfileService::default();
        let timeline = MockTimelineService::default();
        let records = MockRecordRepository::default();
        let state = test_state(&profile, &timeline, &records);

        let result = run_analysis(&state, &request(None, None, Some("Jane Doe"))).await;

        assert!(matches!(result, Err(ServiceError::NoSuchUser(_))));
        assert!(profile.get_received_texts().is_empty());
    }

    #[tokio::test]
    async fn test_fullname_without_space_is_bad_request() {
        let profile = MockProfileService::default();
        let timeline = MockTimelineService::default();
        let records = MockRecordRepository::default();
        let state = test_state(&profile, &timeline, &records);

        let result = run_analysis(&state, &request(None, None, Some("Prince"))).await;

        assert!(matches!(result, Err(ServiceError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_text_branch_sanitizes_before_submission() {
        let profile = MockProfileService::default();
        let timeline = MockTimelineService::default();
        let records = MockRecordRepository::default();
        let state = test_state(&profile, &timeline, &records);

        let result = run_analysis(
            &state,
            &request(Some("Hello http://x.com World!! <script>"), None, None),
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(
            profile.get_received_texts(),
            vec!["Hello  World!! script".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_fields_fall_through_to_text_branch() {
        let profile = MockProfileService::default();
        let timeline = MockTimelineService::default();
        let records = MockRecordRepository::default();
        let state = test_state(&profile, &timeline, &records);

        let result = run_analysis(
            &state,
            &request(Some("typed text"), Some(""), Some("")),
        )
        .await;

        assert!(result.is_ok());
        assert!(timeline.get_requested_handles().is_empty());
        assert!(records.get_requested_names().is_empty());
        assert_eq!(profile.get_received_texts(), vec!["typed text".to_string()]);
    }

    #[tokio::test]
    async fn test_fullname_none_falls_through_to_text_branch() {
        let profile = MockProfileService::default();
        let timeline = MockTimelineService::default();
        let records = MockRecordRepository::default();
        let state = test_state(&profile, &timeline, &records);

        let result = run_analysis(&state, &request(Some("typed text"), None, Some("None"))).await;

        assert!(result.is_ok());
        assert!(records.get_requested_names().is_empty());
        assert_eq!(profile.get_received_texts(), vec!["typed text".to_string()]);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A & B"</b>"#),
            "&lt;b&gt;&quot;A &amp; B&quot;&lt;/b&gt;"
        );
    }
}
