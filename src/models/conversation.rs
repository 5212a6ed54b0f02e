use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One unprocessed element of a conversation history.
///
/// Kept as a raw JSON value: the history column is not schema-controlled and
/// the record normalizer decides what each element means.
pub type RawRecord = Value;

/// A row of the exported analysis table, exactly as it arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRow {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_row_id")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_id"
    )]
    pub session_id: Option<String>,
    #[serde(default)]
    pub conversation_history: Option<Value>,
    /// Every other column (status, journeys, batch payloads, timing)
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// A row whose history can be handed to the interaction grouper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub id: String,
    pub session_id: Option<String>,
    pub history: Vec<RawRecord>,
    pub metadata: Map<String, Value>,
}

impl Conversation {
    /// Convert a table row, excluding rows without a usable history.
    ///
    /// An array history is taken as-is and a single object is treated as a
    /// one-element history. Null, absent, or scalar histories exclude the row.
    pub fn from_row(row: ConversationRow) -> Option<Self> {
        let history = match row.conversation_history? {
            Value::Array(items) => items,
            record @ Value::Object(_) => vec![record],
            _ => return None,
        };

        Some(Self { id: row.id, session_id: row.session_id, history, metadata: row.metadata })
    }

    /// Session identifier used for grouping and selection, falling back to the row id
    pub fn session_label(&self) -> &str {
        match self.session_id.as_deref() {
            Some(session) if !session.is_empty() => session,
            _ => &self.id,
        }
    }

    pub fn metadata_field(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key).filter(|value| !value.is_null())
    }
}
