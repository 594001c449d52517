use std::collections::HashMap;

use log::{info, warn};
use serde::Deserialize;

/// Name of the profile-inference entry in the service registry document.
pub const PROFILE_SERVICE_NAME: &str = "personality_insights";

/// Connection settings for the profile-inference API. Resolved once at
/// startup and immutable afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceCredentials {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
struct RegistryEntry {
    credentials: RegistryCredentials,
}

#[derive(Deserialize)]
struct RegistryCredentials {
    url: String,
    username: String,
    password: String,
}

impl ServiceCredentials {
    /// Baseline credentials come from `PROFILE_API_URL` / `PROFILE_API_USERNAME`
    /// / `PROFILE_API_PASSWORD`; a `SERVICE_REGISTRY` document, when present,
    /// overrides them with its named service entry.
    pub fn from_env() -> Self {
        let baseline = Self {
            url: std::env::var("PROFILE_API_URL").ok(),
            username: std::env::var("PROFILE_API_USERNAME").ok(),
            password: std::env::var("PROFILE_API_PASSWORD").ok(),
        };
        match std::env::var("SERVICE_REGISTRY") {
            Ok(document) => Self::from_registry_document(&document, baseline),
            Err(_) => baseline,
        }
    }

    /// A malformed document aborts startup; a document without the named
    /// service keeps the baseline.
    pub fn from_registry_document(document: &str, baseline: Self) -> Self {
        info!("Parsing service registry document");
        let registry: HashMap<String, Vec<RegistryEntry>> =
            serde_json::from_str(document).expect("Invalid service registry document");

        let Some(entry) = registry
            .get(PROFILE_SERVICE_NAME)
            .and_then(|entries| entries.first())
        else {
            warn!(
                "Service {} not found in the registry document, keeping environment credentials",
                PROFILE_SERVICE_NAME
            );
            return baseline;
        };

        info!("Service {} found in the registry document", PROFILE_SERVICE_NAME);
        Self {
            url: Some(entry.credentials.url.clone()),
            username: Some(entry.credentials.username.clone()),
            password: Some(entry.credentials.password.clone()),
        }
    }
}

/// Application-level credentials for the social API (OAuth1 key pairs).
#[derive(Clone, Debug, Default)]
pub struct SocialCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl SocialCredentials {
    pub fn from_env() -> Self {
        Self {
            consumer_key: std::env::var("SOCIAL_CONSUMER_KEY").unwrap_or_default(),
            consumer_secret: std::env::var("SOCIAL_CONSUMER_SECRET").unwrap_or_default(),
            access_token: std::env::var("SOCIAL_ACCESS_TOKEN").unwrap_or_default(),
            access_secret: std::env::var("SOCIAL_ACCESS_SECRET").unwrap_or_default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.consumer_key.is_empty()
            && !self.consumer_secret.is_empty()
            && !self.access_token.is_empty()
            && !self.access_secret.is_empty()
    }
}
