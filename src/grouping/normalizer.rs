//! Record normalizer: turns one raw history record into a speaker/text pair.
//!
//! Histories come from several historical writers, none of which tag their
//! format. The normalizer sniffs the shape of each record against
//! [`RECORD_SHAPES`], a table checked top to bottom. The first shape whose
//! test passes decides the outcome, even when it then yields no text.
//!
//! Field tests use the truthiness rules of the data's producers: `null`,
//! `false`, `0` and `""` are falsy, everything else (including `[]` and `{}`)
//! is truthy.

use serde_json::{Map, Value};

use crate::models::{NormalizedMessage, RawRecord, Speaker};

/// Outcome of normalizing one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedRecord {
    Message(NormalizedMessage),
    /// A combined `user`/`assistant` record: opens an interaction and may
    /// answer it in the same step
    Exchange { customer: String, agent: Option<String> },
}

/// How a matched object shape is turned into a normalized record
#[derive(Debug, Clone, Copy)]
enum ShapeRule {
    /// `field` is truthy; its value is the text of a fixed speaker
    Fixed { field: &'static str, speaker: Speaker },
    /// `tag` and `text` are both truthy; `tag` decides the speaker
    Tagged { tag: &'static str, text: &'static str },
    /// `user` is truthy; `assistant` optionally answers it
    Exchange { user: &'static str, assistant: &'static str },
}

/// A named object shape, in priority order
#[derive(Debug, Clone, Copy)]
pub struct RecordShape {
    pub name: &'static str,
    rule: ShapeRule,
}

/// Recognized object shapes. Plain strings are checked before all of these.
pub const RECORD_SHAPES: &[RecordShape] = &[
    RecordShape {
        name: "customer",
        rule: ShapeRule::Fixed { field: "customer", speaker: Speaker::Customer },
    },
    RecordShape {
        name: "ai_agent",
        rule: ShapeRule::Fixed { field: "ai_agent", speaker: Speaker::Agent },
    },
    RecordShape { name: "role/content", rule: ShapeRule::Tagged { tag: "role", text: "content" } },
    RecordShape { name: "type/text", rule: ShapeRule::Tagged { tag: "type", text: "text" } },
    RecordShape {
        name: "sender/message",
        rule: ShapeRule::Tagged { tag: "sender", text: "message" },
    },
    RecordShape { name: "from/text", rule: ShapeRule::Tagged { tag: "from", text: "text" } },
    RecordShape {
        name: "user/assistant",
        rule: ShapeRule::Exchange { user: "user", assistant: "assistant" },
    },
];

impl RecordShape {
    fn matches(&self, object: &Map<String, Value>) -> bool {
        match self.rule {
            ShapeRule::Fixed { field, .. } => truthy_field(object, field).is_some(),
            ShapeRule::Tagged { tag, text } => {
                truthy_field(object, tag).is_some() && truthy_field(object, text).is_some()
            }
            ShapeRule::Exchange { user, .. } => truthy_field(object, user).is_some(),
        }
    }

    fn extract(&self, object: &Map<String, Value>) -> Option<NormalizedRecord> {
        match self.rule {
            ShapeRule::Fixed { field, speaker } => {
                let text = truthy_field(object, field).and_then(value_text)?;
                Some(NormalizedRecord::Message(NormalizedMessage { speaker, text }))
            }
            ShapeRule::Tagged { tag, text } => {
                let speaker = match truthy_field(object, tag)? {
                    Value::String(tag) => Speaker::from_tag(tag),
                    _ => Speaker::Agent,
                };
                let text = truthy_field(object, text).and_then(value_text)?;
                Some(NormalizedRecord::Message(NormalizedMessage { speaker, text }))
            }
            ShapeRule::Exchange { user, assistant } => {
                let customer = truthy_field(object, user).and_then(value_text)?;
                let agent = truthy_field(object, assistant).and_then(value_text);
                Some(NormalizedRecord::Exchange { customer, agent })
            }
        }
    }
}

/// Normalize one record.
///
/// `position` is the record's index in its history and only matters for
/// bare strings, which alternate customer (even) and agent (odd).
/// Returns `None` for records that cannot contribute a message.
pub fn normalize(record: &RawRecord, position: usize) -> Option<NormalizedRecord> {
    match record {
        Value::String(text) if !text.is_empty() => {
            let speaker = if position % 2 == 0 { Speaker::Customer } else { Speaker::Agent };
            Some(NormalizedRecord::Message(NormalizedMessage { speaker, text: text.clone() }))
        }
        Value::Object(object) => {
            let shape = matching_shape(object)?;
            shape.extract(object)
        }
        _ => None,
    }
}

/// First shape in [`RECORD_SHAPES`] that an object satisfies
pub fn matching_shape(object: &Map<String, Value>) -> Option<&'static RecordShape> {
    RECORD_SHAPES.iter().find(|shape| shape.matches(object))
}

/// Read `result` and `timestamp` annotations from a record, when it carries them
pub fn record_annotations(
    record: &RawRecord,
) -> (Option<String>, Option<chrono::DateTime<chrono::Utc>>) {
    let Value::Object(object) = record else {
        return (None, None);
    };

    let result = truthy_field(object, "result").and_then(value_text);
    let timestamp = truthy_field(object, "timestamp")
        .and_then(|value| crate::parsers::deserializers::parse_timestamp_value(value).ok());

    (result, timestamp)
}

/// Short preview of a history for conversation pickers
pub fn conversation_preview(history: &[RawRecord]) -> String {
    const PREVIEW_FIELDS: [&str; 6] = ["customer", "ai_agent", "content", "text", "message", "user"];

    let preview = match history.first() {
        Some(Value::Object(object)) => PREVIEW_FIELDS
            .iter()
            .find_map(|field| truthy_field(object, field).and_then(value_text)),
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    };

    preview.unwrap_or_else(|| "No preview available".to_string())
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_field<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| is_truthy(value))
}

/// Display text of a field value, `None` when nothing readable remains.
///
/// Arrays are treated as content-part lists: string parts and the `text` of
/// object parts are joined with newlines.
pub fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Bool(false) => return None,
        Value::String(s) => s.clone(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(object) => object.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect();
            texts.join("\n")
        }
        Value::Object(_) => value.to_string(),
    };

    if text.is_empty() { None } else { Some(text) }
}
