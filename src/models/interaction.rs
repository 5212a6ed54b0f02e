use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Customer,
    Agent,
}

impl Speaker {
    /// Classify a speaker tag such as `role`, `type`, `sender` or `from`.
    /// Only `"user"` and `"customer"` denote the customer.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "user" | "customer" => Speaker::Customer,
            _ => Speaker::Agent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub speaker: Speaker,
    pub text: String,
}

/// One customer message and the agent messages that answered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub customer_message: String,
    pub agent_messages: Vec<String>,
    pub interaction_number: usize,
    /// Outcome label carried by the opening record, if it had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Interaction {
    pub fn message_count(&self) -> usize {
        1 + self.agent_messages.len()
    }
}
