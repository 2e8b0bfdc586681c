//! Fixed payloads sent on create and update.
//!
//! Inbound request bodies are ignored; every create (and every update) sends
//! the same document. The payload is serialized once when the route table is
//! built.

use serde::Serialize;

/// Envelope expected by the events endpoints: `{"event": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDraft {
    pub event: DraftBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftBody {
    pub name: RichText,
    pub description: RichText,
    pub start: Moment,
    pub end: Moment,
    pub currency: String,
    pub online_event: bool,
    pub organizer_id: String,
    pub listed: bool,
    pub shareable: bool,
    pub invite_only: bool,
    pub show_remaining: bool,
    pub password: String,
    pub capacity: u32,
    pub is_reserved_seating: bool,
    pub is_series: bool,
    pub show_pick_a_seat: bool,
    pub show_seatmap_thumbnail: bool,
    pub show_colors_in_seatmap_thumbnail: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Markup-only text field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichText {
    pub html: String,
}

/// A point in time with its zone, as the upstream writes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Moment {
    pub timezone: String,
    pub utc: String,
}

impl Moment {
    fn utc(at: &str) -> Self {
        Self {
            timezone: "UTC".to_string(),
            utc: at.to_string(),
        }
    }
}

fn draft(text: &str, locale: Option<&str>) -> EventDraft {
    let markup = RichText {
        html: format!("<p>{}</p>", text),
    };
    EventDraft {
        event: DraftBody {
            name: markup.clone(),
            description: markup,
            start: Moment::utc("2018-05-12T02:00:00Z"),
            end: Moment::utc("2018-05-12T02:00:00Z"),
            currency: "USD".to_string(),
            online_event: false,
            organizer_id: String::new(),
            listed: false,
            shareable: false,
            invite_only: false,
            show_remaining: true,
            password: "12345".to_string(),
            capacity: 100,
            is_reserved_seating: true,
            is_series: true,
            show_pick_a_seat: true,
            show_seatmap_thumbnail: true,
            show_colors_in_seatmap_thumbnail: true,
            locale: locale.map(str::to_string),
        },
    }
}

/// Payload for `POST /organizations/{org}/events/`.
pub fn create_event_template() -> EventDraft {
    draft("Some text", Some("de_AT"))
}

/// Payload for `POST /events/{id}/`. Same shape as create, without a locale.
pub fn update_event_template() -> EventDraft {
    draft("Updated text", None)
}
