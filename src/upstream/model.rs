//! Typed view of the upstream event document.
//!
//! The gateway never decodes relayed bodies; these types document the shape
//! and let client tooling summarize what came back. Every field is optional
//! because the upstream owns the schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An event as returned by `GET /events/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Event {
    pub id: Option<String>,
    pub name: Option<MultipartText>,
    pub description: Option<MultipartText>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub start: Option<DateTimeTz>,
    pub end: Option<DateTimeTz>,
    pub organization_id: Option<String>,
    pub organizer_id: Option<String>,
    pub venue_id: Option<String>,
    pub category_id: Option<String>,
    pub format_id: Option<String>,
    pub created: Option<String>,
    pub changed: Option<String>,
    pub published: Option<String>,
    /// Number or null upstream.
    pub capacity: Option<Value>,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub locale: Option<String>,
    pub listed: Option<bool>,
    pub shareable: Option<bool>,
    pub online_event: Option<bool>,
    pub is_free: Option<bool>,
    pub is_series: Option<bool>,
    pub is_reserved_seating: Option<bool>,
    pub privacy_setting: Option<String>,
    pub resource_uri: Option<String>,
    pub logo: Option<Logo>,
}

/// Text carried in both plain and HTML renderings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MultipartText {
    pub text: Option<String>,
    pub html: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DateTimeTz {
    pub timezone: Option<String>,
    pub local: Option<String>,
    pub utc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Logo {
    pub id: Option<String>,
    pub url: Option<String>,
    pub aspect_ratio: Option<String>,
    pub edge_color: Option<String>,
    pub original: Option<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Image {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A page of events as returned by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub pagination: Option<Value>,
}

impl Event {
    /// One-line digest: id, name, start and status, with "-" for gaps.
    pub fn summary_line(&self) -> String {
        let name = self
            .name
            .as_ref()
            .and_then(|n| n.text.as_deref().or(n.html.as_deref()))
            .unwrap_or("-");
        let start = self
            .start
            .as_ref()
            .and_then(|s| s.utc.as_deref().or(s.local.as_deref()))
            .unwrap_or("-");
        format!(
            "{}\t{}\t{}\t{}",
            self.id.as_deref().unwrap_or("-"),
            name,
            start,
            self.status.as_deref().unwrap_or("-"),
        )
    }
}
