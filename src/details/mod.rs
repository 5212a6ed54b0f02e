//! Conversation details card
//!
//! Formats the analysis columns of a conversation row for display next to the
//! current interaction. Every field tolerates absence: missing values render as
//! `N/A` (or `0`, `No`, `Unknown` where that reads better).

use serde::Serialize;
use serde_json::Value;

use crate::grouping::normalizer::is_truthy;
use crate::models::Conversation;

const NOT_AVAILABLE: &str = "N/A";

/// Colour class of a journey status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Pending,
    Failed,
    InProgress,
    Unknown,
}

impl StatusKind {
    /// Classify a status string, case-insensitively
    pub fn classify(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "success" | "completed" | "active" => Self::Success,
            "pending" | "processing" => Self::Pending,
            "failed" | "error" => Self::Failed,
            "in_progress" | "running" => Self::InProgress,
            _ => Self::Unknown,
        }
    }
}

/// A status as displayed: the original wording plus its class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyStatus {
    pub kind: StatusKind,
    pub label: String,
}

impl JourneyStatus {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.filter(|v| is_truthy(v)) {
            Some(value) => {
                let label = display_value(value);
                Self { kind: StatusKind::classify(&label), label }
            }
            None => Self { kind: StatusKind::Unknown, label: "Unknown".to_string() },
        }
    }
}

/// Everything the details pane shows for one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsCard {
    pub session_id: String,
    pub interaction_number: usize,
    pub relevant_journeys: String,
    pub status: JourneyStatus,
    pub top_journeys: String,
    pub activated_journey: String,
    pub in_top_predictive: bool,
    pub batch_generations: String,
    pub running_time: String,
}

impl DetailsCard {
    pub fn new(conversation: &Conversation, interaction_number: usize) -> Self {
        let field = |key: &str| conversation.metadata_field(key);

        Self {
            session_id: conversation.session_label().to_string(),
            interaction_number,
            relevant_journeys: format_journeys(field("relevant_journeys")),
            status: JourneyStatus::from_value(field("relevant_journeys_status")),
            top_journeys: format_journeys(field("top_3_journeys")),
            activated_journey: field("activated_journey")
                .filter(|v| is_truthy(v))
                .map_or_else(|| NOT_AVAILABLE.to_string(), display_value),
            in_top_predictive: field("activated_journey_in_top_predictive").is_some_and(is_truthy),
            batch_generations: field("batch_generations_count")
                .filter(|v| is_truthy(v))
                .map_or_else(|| "0".to_string(), display_value),
            running_time: format_running_time(field("total_running_time")),
        }
    }

    /// Label/value pairs in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Session", self.session_id.clone()),
            ("Interaction", format!("#{}", self.interaction_number)),
            ("Relevant journeys", self.relevant_journeys.clone()),
            ("Status", self.status.label.clone()),
            ("Top 3 journeys", self.top_journeys.clone()),
            ("Activated journey", self.activated_journey.clone()),
            ("In top predictive", if self.in_top_predictive { "Yes" } else { "No" }.to_string()),
            ("Batch generations", self.batch_generations.clone()),
            ("Total running time", self.running_time.clone()),
        ]
    }
}

/// Render a journey list: titles (or names) of objects, primitives as text
pub fn format_journeys(journeys: Option<&Value>) -> String {
    let Some(journeys) = journeys.filter(|v| is_truthy(v)) else {
        return NOT_AVAILABLE.to_string();
    };

    match journeys {
        Value::Array(items) if items.is_empty() => "None".to_string(),
        Value::Array(items) => items.iter().map(journey_label).collect::<Vec<_>>().join(", "),
        other => journey_label(other),
    }
}

fn journey_label(journey: &Value) -> String {
    match journey {
        Value::Object(object) => ["title", "name"]
            .iter()
            .filter_map(|key| object.get(*key))
            .find(|value| is_truthy(value))
            .map_or_else(|| journey.to_string(), display_value),
        other => display_value(other),
    }
}

/// Seconds for numbers, strings verbatim
pub fn format_running_time(time: Option<&Value>) -> String {
    match time.filter(|v| is_truthy(v)) {
        Some(Value::Number(seconds)) => format!("{}s", seconds),
        Some(other) => display_value(other),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::ConversationRow;

    fn conversation(metadata: Value) -> Conversation {
        let mut row = json!({"id": 12, "session_id": "sess-a", "conversation_history": []});
        if let (Some(target), Value::Object(extra)) = (row.as_object_mut(), metadata) {
            target.extend(extra);
        }
        let row: ConversationRow = serde_json::from_value(row).unwrap();
        Conversation::from_row(row).unwrap()
    }

    #[test]
    fn test_format_journeys_absent_and_empty() {
        assert_eq!(format_journeys(None), "N/A");
        assert_eq!(format_journeys(Some(&json!(""))), "N/A");
        assert_eq!(format_journeys(Some(&json!([]))), "None");
    }

    #[test]
    fn test_format_journeys_mixed_items() {
        let journeys = json!([
            {"title": "Refund", "name": "ignored"},
            {"name": "Upgrade"},
            {"id": 4},
            "Billing",
            7
        ]);
        assert_eq!(format_journeys(Some(&journeys)), r#"Refund, Upgrade, {"id":4}, Billing, 7"#);
    }

    #[test]
    fn test_format_journeys_single_values() {
        assert_eq!(format_journeys(Some(&json!({"title": "Onboarding"}))), "Onboarding");
        assert_eq!(format_journeys(Some(&json!({"name": "Cancel"}))), "Cancel");
        assert_eq!(format_journeys(Some(&json!("Billing"))), "Billing");
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(StatusKind::classify("SUCCESS"), StatusKind::Success);
        assert_eq!(StatusKind::classify("completed"), StatusKind::Success);
        assert_eq!(StatusKind::classify("Processing"), StatusKind::Pending);
        assert_eq!(StatusKind::classify("error"), StatusKind::Failed);
        assert_eq!(StatusKind::classify("running"), StatusKind::InProgress);
        assert_eq!(StatusKind::classify("paused"), StatusKind::Unknown);
    }

    #[test]
    fn test_status_label_keeps_original_wording() {
        let status = JourneyStatus::from_value(Some(&json!("In_Progress")));
        assert_eq!(status.kind, StatusKind::InProgress);
        assert_eq!(status.label, "In_Progress");

        let missing = JourneyStatus::from_value(None);
        assert_eq!(missing.kind, StatusKind::Unknown);
        assert_eq!(missing.label, "Unknown");

        let unusual = JourneyStatus::from_value(Some(&json!("paused")));
        assert_eq!(unusual.kind, StatusKind::Unknown);
        assert_eq!(unusual.label, "paused");
    }

    #[test]
    fn test_format_running_time() {
        assert_eq!(format_running_time(Some(&json!(42))), "42s");
        assert_eq!(format_running_time(Some(&json!(1.5))), "1.5s");
        assert_eq!(format_running_time(Some(&json!("2m 3s"))), "2m 3s");
        assert_eq!(format_running_time(Some(&json!(0))), "N/A");
        assert_eq!(format_running_time(None), "N/A");
    }

    #[test]
    fn test_details_card_from_full_row() {
        let conversation = conversation(json!({
            "relevant_journeys": [{"title": "Refund"}],
            "relevant_journeys_status": "success",
            "top_3_journeys": ["Refund", "Billing"],
            "activated_journey": "Refund",
            "activated_journey_in_top_predictive": true,
            "batch_generations_count": 3,
            "total_running_time": 12
        }));

        let card = DetailsCard::new(&conversation, 2);
        assert_eq!(card.session_id, "sess-a");
        assert_eq!(card.relevant_journeys, "Refund");
        assert_eq!(card.status.kind, StatusKind::Success);
        assert_eq!(card.top_journeys, "Refund, Billing");
        assert_eq!(card.activated_journey, "Refund");
        assert!(card.in_top_predictive);
        assert_eq!(card.batch_generations, "3");
        assert_eq!(card.running_time, "12s");
    }

    #[test]
    fn test_details_card_defaults() {
        let card = DetailsCard::new(&conversation(json!({})), 1);
        assert_eq!(card.relevant_journeys, "N/A");
        assert_eq!(card.status.label, "Unknown");
        assert_eq!(card.activated_journey, "N/A");
        assert!(!card.in_top_predictive);
        assert_eq!(card.batch_generations, "0");
        assert_eq!(card.running_time, "N/A");

        let rows = card.rows();
        assert_eq!(rows[1], ("Interaction", "#1".to_string()));
        assert_eq!(rows[6], ("In top predictive", "No".to_string()));
    }
}
