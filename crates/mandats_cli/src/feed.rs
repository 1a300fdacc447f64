//! Mandats feed data
//!
//! The feed is exported to a GitHub repository and served through the
//! contents API as `{"content": "<base64>", "encoding": "base64", ..}`.
//! A raw JSON array of mandats is accepted too.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mandats_theme::ColorToken;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// State value of a postponed mandat
pub const POSTPONED: &str = "Reportée";

/// One entry of the feed
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mandat {
    /// `Validée` or `Reportée`
    pub state: String,
    pub org: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub date: String,
}

impl Mandat {
    /// Identifies the entry in the feed
    pub fn key(&self) -> String {
        format!("{} - {}", self.org, self.date)
    }

    pub fn title(&self) -> String {
        format!("{} - {}", self.name, self.date)
    }

    pub fn status(&self) -> StatusProps {
        status_props(&self.state)
    }

    // `é` read as 7-bit ASCII comes out as `C)`
    fn with_fixed_state(mut self) -> Self {
        self.state = self.state.replace("C)", "é");
        self
    }
}

// =============================================================================
// Status presentation
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusIcon {
    Clock,
    XCircle,
}

impl StatusIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            StatusIcon::Clock => "◷",
            StatusIcon::XCircle => "✕",
        }
    }
}

/// Icon and icon background of a feed item
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusProps {
    pub icon: StatusIcon,
    pub background: ColorToken,
}

pub fn status_props(state: &str) -> StatusProps {
    if state == POSTPONED {
        StatusProps {
            icon: StatusIcon::XCircle,
            background: ColorToken::Warning500,
        }
    } else {
        StatusProps {
            icon: StatusIcon::Clock,
            background: ColorToken::Success500,
        }
    }
}

// =============================================================================
// Request state
// =============================================================================

/// State of the feed fetch
#[derive(Clone, Debug, PartialEq)]
pub enum Request<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Request<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Request::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T>> for Request<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Request::Ready(value),
            Err(err) => Request::Failed(format!("{err:#}")),
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

#[derive(Deserialize)]
struct ContentsPayload {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// Decode a contents payload or a raw mandats array
pub fn decode_payload(raw: &str) -> Result<Vec<Mandat>> {
    let value: serde_json::Value = serde_json::from_str(raw).context("Payload is not JSON")?;

    let mandats: Vec<Mandat> = if value.is_array() {
        serde_json::from_value(value).context("Invalid mandats array")?
    } else {
        let payload: ContentsPayload = serde_json::from_value(value)
            .context("Expected a mandats array or an object with a `content` field")?;
        if let Some(encoding) = payload.encoding.as_deref() {
            if encoding != "base64" {
                bail!("Unsupported content encoding '{}'", encoding);
            }
        }
        let text = decode_text(decode_base64(&payload.content)?);
        serde_json::from_str(&text).context("Decoded content is not a mandats array")?
    };

    tracing::debug!(count = mandats.len(), "feed decoded");
    Ok(mandats.into_iter().map(Mandat::with_fixed_state).collect())
}

// The contents API wraps base64 at 60 columns
fn decode_base64(content: &str) -> Result<Vec<u8>> {
    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .context("Content is not valid base64")
}

/// UTF-8 when possible, 7-bit ASCII otherwise
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("content is not UTF-8, reading it as ASCII");
            err.into_bytes()
                .into_iter()
                .map(|b| char::from(b & 0x7f))
                .collect()
        }
    }
}

/// Read and decode a feed file
pub fn load_feed(path: &Path) -> Request<Vec<Mandat>> {
    let result = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
        .and_then(|raw| decode_payload(&raw));
    if let Err(err) = &result {
        tracing::error!("feed unavailable: {err:#}");
    }
    Request::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"[
        {"state": "ValidC)e", "org": "TAA", "name": "Dupont", "date": "2023-01-10", "link": "https://example.org/1"},
        {"state": "ReportC)e", "org": "Mende", "name": "Martin", "date": "2023-02-03"}
    ]"#;

    #[test]
    fn test_raw_array_and_state_fix() {
        let mandats = decode_payload(FEED).unwrap();
        assert_eq!(mandats.len(), 2);
        assert_eq!(mandats[0].state, "Validée");
        assert_eq!(mandats[1].state, "Reportée");
        assert_eq!(mandats[1].link, None);
        assert_eq!(mandats[0].key(), "TAA - 2023-01-10");
        assert_eq!(mandats[0].title(), "Dupont - 2023-01-10");
    }

    #[test]
    fn test_contents_payload_with_wrapped_base64() {
        let encoded = STANDARD.encode(FEED);
        let (head, tail) = encoded.split_at(60);
        let payload = serde_json::json!({
            "name": "mandats.json",
            "encoding": "base64",
            "content": format!("{head}\n{tail}\n"),
        });

        let mandats = decode_payload(&payload.to_string()).unwrap();
        assert_eq!(mandats[1].org, "Mende");
        assert_eq!(mandats[1].state, POSTPONED);
    }

    #[test]
    fn test_non_utf8_content_reads_as_ascii() {
        // Latin-1 `é` (0xE9) masks to `i`
        let mut bytes = br#"[{"state": "Valid"#.to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(br#"e", "org": "TAA", "name": "Dupont", "date": "2023"}]"#);
        let payload = serde_json::json!({ "content": STANDARD.encode(&bytes) });

        let mandats = decode_payload(&payload.to_string()).unwrap();
        assert_eq!(mandats[0].state, "Validie");
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(decode_payload("not json").is_err());
        assert!(decode_payload(r#"{"sha": "abc"}"#).is_err());
        assert!(decode_payload(r#"{"content": "%%%"}"#).is_err());
        let err = decode_payload(r#"{"content": "", "encoding": "utf-8"}"#).unwrap_err();
        assert!(err.to_string().contains("utf-8"));
    }

    #[test]
    fn test_status_props() {
        assert_eq!(status_props("Reportée").icon, StatusIcon::XCircle);
        assert_eq!(status_props("Reportée").background, ColorToken::Warning500);
        assert_eq!(status_props("Validée").icon, StatusIcon::Clock);
        assert_eq!(status_props("anything").background, ColorToken::Success500);
    }

    #[test]
    fn test_request_state() {
        let loading: Request<Vec<Mandat>> = Request::Loading;
        assert!(loading.ready().is_none());

        let failed = load_feed(Path::new("no/such/feed.json"));
        match failed {
            Request::Failed(reason) => assert!(reason.contains("feed.json")),
            other => panic!("expected a failure, got {other:?}"),
        }

        let ready = Request::from(decode_payload(FEED));
        assert_eq!(ready.ready().map(Vec::len), Some(2));
    }
}
