//! Session selection kept in a URL query parameter.
//!
//! The selected session is ordinary application state owned by the
//! [`Navigator`](super::Navigator). This adapter sits at the boundary: it
//! reads `session_id` from a URL to seed the initial selection, and writes it
//! back whenever the selection changes so the current view stays shareable.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Query parameter carrying the selected session
pub const SESSION_PARAM: &str = "session_id";

// Unreserved URL characters stay as they are; everything else is encoded
const QUERY_VALUE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Split a URL into (base, query, fragment), none of them including their delimiter
fn split_url(url: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    match rest.split_once('?') {
        Some((base, query)) => (base, Some(query), fragment),
        None => (rest, None, fragment),
    }
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> =
        if raw.contains('+') { Cow::Owned(raw.replace('+', " ")) } else { Cow::Borrowed(raw) };
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE_SET).to_string()
}

/// Read the selected session from a URL or a bare query string.
///
/// Accepts `https://host/?session_id=abc`, `?session_id=abc` and `session_id=abc`.
/// An empty value counts as no selection.
pub fn read_session_param(url_or_query: &str) -> Option<String> {
    let query = if url_or_query.contains('?') {
        split_url(url_or_query).1?
    } else {
        split_url(url_or_query).0
    };

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| decode_component(key) == SESSION_PARAM)
        .map(|(_, value)| decode_component(value))
        .filter(|value| !value.is_empty())
}

/// Set or remove the session parameter of `url`, keeping every other parameter
pub fn write_session_param(url: &str, session: Option<&str>) -> String {
    let (base, query, fragment) = split_url(url);

    let mut pairs: Vec<String> = query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
            decode_component(key) != SESSION_PARAM
        })
        .map(str::to_string)
        .collect();

    if let Some(session) = session.filter(|s| !s.is_empty()) {
        pairs.push(format!("{}={}", SESSION_PARAM, encode_component(session)));
    }

    let mut rebuilt = base.to_string();
    if !pairs.is_empty() {
        rebuilt.push('?');
        rebuilt.push_str(&pairs.join("&"));
    }
    if let Some(fragment) = fragment {
        rebuilt.push('#');
        rebuilt.push_str(fragment);
    }
    rebuilt
}

/// Link that opens the viewer on `session_id`. Other parameters of `base_url` are dropped.
pub fn shareable_url(base_url: &str, session_id: &str) -> String {
    let (base, _, _) = split_url(base_url);
    format!("{}?{}={}", base, SESSION_PARAM, encode_component(session_id))
}

/// Keeps a URL in step with the selected session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSync {
    url: String,
}

impl SessionSync {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Session requested by the URL the viewer was opened with
    pub fn initial_session(&self) -> Option<String> {
        read_session_param(&self.url)
    }

    /// Record a selection change
    pub fn sync(&mut self, session: Option<&str>) {
        self.url = write_session_param(&self.url, session);
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Shareable link for the currently recorded session
    pub fn shareable_url(&self) -> Option<String> {
        self.initial_session().map(|session| shareable_url(&self.url, &session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_session_param_from_url() {
        assert_eq!(
            read_session_param("https://viewer.example/?session_id=abc-123"),
            Some("abc-123".to_string())
        );
        assert_eq!(
            read_session_param("https://viewer.example/flow?tab=2&session_id=s%201#top"),
            Some("s 1".to_string())
        );
    }

    #[test]
    fn test_read_session_param_from_bare_query() {
        assert_eq!(read_session_param("?session_id=x"), Some("x".to_string()));
        assert_eq!(read_session_param("session_id=a+b"), Some("a b".to_string()));
    }

    #[test]
    fn test_read_session_param_missing_or_empty() {
        assert_eq!(read_session_param("https://viewer.example/"), None);
        assert_eq!(read_session_param("https://viewer.example/?tab=1"), None);
        assert_eq!(read_session_param("?session_id="), None);
        assert_eq!(read_session_param(""), None);
    }

    #[test]
    fn test_write_session_param_sets_and_replaces() {
        assert_eq!(
            write_session_param("https://viewer.example/", Some("s1")),
            "https://viewer.example/?session_id=s1"
        );
        assert_eq!(
            write_session_param("https://viewer.example/?tab=2&session_id=old#x", Some("new")),
            "https://viewer.example/?tab=2&session_id=new#x"
        );
    }

    #[test]
    fn test_write_session_param_removes() {
        assert_eq!(
            write_session_param("https://viewer.example/?session_id=old", None),
            "https://viewer.example/"
        );
        assert_eq!(
            write_session_param("https://viewer.example/?session_id=old&tab=2", Some("")),
            "https://viewer.example/?tab=2"
        );
    }

    #[test]
    fn test_write_session_param_encodes_value() {
        let url = write_session_param("http://localhost:3000/", Some("a/b c"));
        assert_eq!(url, "http://localhost:3000/?session_id=a%2Fb%20c");
        assert_eq!(read_session_param(&url), Some("a/b c".to_string()));
    }

    #[test]
    fn test_shareable_url_drops_other_parameters() {
        assert_eq!(
            shareable_url("https://viewer.example/flow?tab=2#x", "sess-9"),
            "https://viewer.example/flow?session_id=sess-9"
        );
    }

    #[test]
    fn test_session_sync() {
        let mut sync = SessionSync::new("http://localhost:3000/?session_id=first");
        assert_eq!(sync.initial_session(), Some("first".to_string()));

        sync.sync(Some("second"));
        assert_eq!(sync.url(), "http://localhost:3000/?session_id=second");
        assert_eq!(
            sync.shareable_url(),
            Some("http://localhost:3000/?session_id=second".to_string())
        );

        sync.sync(None);
        assert_eq!(sync.url(), "http://localhost:3000/");
        assert_eq!(sync.shareable_url(), None);
    }
}
