use std::sync::OnceLock;

use regex::Regex;

static WHITELIST_RE: OnceLock<Regex> = OnceLock::new();
static URL_RE: OnceLock<Regex> = OnceLock::new();

/// Removes characters outside `[A-Za-z0-9 !.,&]`, then strips `http`-prefixed
/// runs. Applied to any text sourced from an external feed or store.
pub fn sanitize(text: &str) -> String {
    let whitelist =
        WHITELIST_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9 !.,&]+").expect("Invalid regex"));
    let url = URL_RE.get_or_init(|| Regex::new(r"http\S+").expect("Invalid regex"));

    let cleaned = whitelist.replace_all(text, "");
    url.replace_all(&cleaned, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_disallowed_characters() {
        assert_eq!(sanitize("He said: \"hi\" (twice)"), "He said hi twice");
        assert_eq!(sanitize("a!b.c,d&e f"), "a!b.c,d&e f");
    }

    #[test]
    fn test_strips_urls() {
        assert_eq!(sanitize("Hello http://x.com World!!"), "Hello  World!!");
        assert_eq!(sanitize("see https://example.com/page now"), "see  now");
    }

    #[test]
    fn test_empty_and_clean_input_unchanged() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("Already clean text."), "Already clean text.");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Hello http://x.com World!!",
            "tabs\tand\nnewlines",
            "mixed https://a.b/c?d=e text #hash @mention",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }
}
