use base64::Engine as _;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;

use crate::config::SocialCredentials;

/// RFC 3986 unreserved characters survive encoding unchanged.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Per-request nonce and timestamp, split out so signatures are reproducible
/// in tests.
pub struct RequestToken {
    pub nonce: String,
    pub timestamp: u64,
}

impl RequestToken {
    pub fn generate() -> Self {
        Self {
            nonce: format!("{:032x}", rand::random::<u128>()),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("System clock before Unix epoch")
                .as_secs(),
        }
    }
}

pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// HMAC-SHA1 signature over the OAuth1 base string: method, encoded URL, and
/// the sorted, percent-encoded parameter string.
pub fn signature(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");
    let base_string = format!(
        "{}&{}&{}",
        method,
        percent_encode(url),
        percent_encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac = Hmac::<Sha1>::new_from_slice(signing_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(base_string.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Builds the `Authorization: OAuth ...` header value for a signed request.
pub fn authorization_header(
    method: &str,
    url: &str,
    query: &[(&str, &str)],
    credentials: &SocialCredentials,
    token: &RequestToken,
) -> String {
    let oauth_params: Vec<(String, String)> = vec![
        (
            "oauth_consumer_key".to_string(),
            credentials.consumer_key.clone(),
        ),
        ("oauth_nonce".to_string(), token.nonce.clone()),
        (
            "oauth_signature_method".to_string(),
            "HMAC-SHA1".to_string(),
        ),
        ("oauth_timestamp".to_string(), token.timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend(
        query
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string())),
    );

    let signature = signature(
        method,
        url,
        &all_params,
        &credentials.consumer_secret,
        &credentials.access_secret,
    );

    let mut header_params = oauth_params;
    header_params.push(("oauth_signature".to_string(), signature));
    header_params.sort();

    let fields = header_params
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {}", fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Known vector from the OAuth1 signing walkthrough in the Twitter API
    // documentation.
    #[test]
    fn test_signature_known_vector() {
        let params: Vec<(String, String)> = vec![
            ("status".to_string(), "Hello Ladies + Gentlemen, a signed OAuth request!".to_string()),
            ("include_entities".to_string(), "true".to_string()),
            ("oauth_consumer_key".to_string(), "xvz1evFS4wEEPTGEFPHBog".to_string()),
            ("oauth_nonce".to_string(), "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg".to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), "1318622958".to_string()),
            ("oauth_token".to_string(), "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let signature = signature(
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &params,
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );

        assert_eq!(signature, "tnnArxj06cWHq44gCs1OSKk/jLY=");
    }

    #[test]
    fn test_percent_encoding() {
        assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("safe-chars_are.kept~"), "safe-chars_are.kept~");
    }

    #[test]
    fn test_authorization_header_shape() {
        let credentials = SocialCredentials {
            consumer_key: "ck".to_string(),
            consumer_secret: "cs".to_string(),
            access_token: "at".to_string(),
            access_secret: "as".to_string(),
        };
        let token = RequestToken {
            nonce: "fixed-nonce".to_string(),
            timestamp: 1318622958,
        };

        let header = authorization_header(
            "GET",
            "https://social.example.com/statuses/user_timeline.json",
            &[("screen_name", "someone"), ("count", "100")],
            &credentials,
            &token,
        );

        assert!(header.starts_with("OAuth oauth_consumer_key=\"ck\""));
        assert!(header.contains("oauth_nonce=\"fixed-nonce\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_signature=\""));
        assert!(header.contains("oauth_version=\"1.0\""));
    }
}
