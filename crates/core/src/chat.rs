//! Stored chat rows, message classification and session grouping.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MessageParseError;

/// One row of a chat history table.
///
/// `message` holds the column as JSON: a text column arrives as
/// `Value::String` and is parsed lazily by [`ParsedMessage::parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRow {
    pub session_id: String,
    pub message: Value,
    pub created_at: NaiveDateTime,
}

impl ChatRow {
    #[must_use]
    pub fn new(session_id: impl Into<String>, message: Value, created_at: NaiveDateTime) -> Self {
        Self { session_id: session_id.into(), message, created_at }
    }

    pub fn parse_message(&self) -> Result<ParsedMessage, MessageParseError> {
        ParsedMessage::parse(&self.message)
    }
}

/// Who authored a message, derived from its `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Human,
    Ai,
    /// Any other value; carries the type as found (or `"unknown"` when absent).
    Unknown(String),
}

impl MessageKind {
    #[must_use]
    pub fn from_type(type_value: &str) -> Self {
        match type_value {
            "human" => Self::Human,
            "ai" => Self::Ai,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// CSS class of the rendered block.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match *self {
            Self::Human => "human",
            Self::Ai => "ai",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// A message payload after JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub kind: MessageKind,
    pub content: String,
}

impl ParsedMessage {
    /// Label for an absent or `null` type; a literal `None` is never shown.
    const MISSING_TYPE: &'static str = "unknown";

    /// Decode a stored message.
    ///
    /// Strings are parsed as JSON text first. The decoded value must be an
    /// object; `type` and `content` are optional, and non-string values are
    /// kept as their compact JSON text.
    pub fn parse(raw: &Value) -> Result<Self, MessageParseError> {
        let decoded;
        let value = match raw {
            Value::String(text) => {
                decoded = serde_json::from_str::<Value>(text)?;
                &decoded
            },
            other => other,
        };

        let Value::Object(map) = value else {
            return Err(MessageParseError::NotAnObject(json_kind(value)));
        };

        let type_value = map
            .get("type")
            .filter(|v| !v.is_null())
            .map_or_else(|| Self::MISSING_TYPE.to_owned(), value_text);
        let content = map.get("content").map(value_text).unwrap_or_default();

        Ok(Self { kind: MessageKind::from_type(&type_value), content })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match *value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// All rows of one chat session for the selected date.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGroup {
    pub session_id: String,
    pub rows: Vec<ChatRow>,
}

/// Group rows by `session_id`.
///
/// Groups keep the order in which their session first appears; rows inside a
/// group are sorted by ascending `created_at`, ties keeping input order.
#[must_use]
pub fn group_by_session(rows: Vec<ChatRow>) -> Vec<SessionGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<SessionGroup> = Vec::new();

    for row in rows {
        if let Some(&pos) = index.get(&row.session_id) {
            if let Some(group) = groups.get_mut(pos) {
                group.rows.push(row);
            }
        } else {
            index.insert(row.session_id.clone(), groups.len());
            groups.push(SessionGroup { session_id: row.session_id.clone(), rows: vec![row] });
        }
    }

    for group in &mut groups {
        group.rows.sort_by_key(|r| r.created_at);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_object_human() {
        let parsed = ParsedMessage::parse(&json!({"type": "human", "content": "hi"})).unwrap();
        assert_eq!(parsed.kind, MessageKind::Human);
        assert_eq!(parsed.content, "hi");
    }

    #[test]
    fn test_parse_json_text_ai() {
        let raw = Value::String(r#"{"type":"ai","content":"hello there"}"#.to_owned());
        let parsed = ParsedMessage::parse(&raw).unwrap();
        assert_eq!(parsed.kind, MessageKind::Ai);
        assert_eq!(parsed.content, "hello there");
    }

    #[test]
    fn test_parse_missing_type_is_unknown() {
        let parsed = ParsedMessage::parse(&json!({"content": "x"})).unwrap();
        assert_eq!(parsed.kind, MessageKind::Unknown("unknown".to_owned()));
    }

    #[test]
    fn test_parse_null_type_is_unknown() {
        let parsed = ParsedMessage::parse(&json!({"type": null, "content": "x"})).unwrap();
        assert_eq!(parsed.kind, MessageKind::Unknown("unknown".to_owned()));
    }

    #[test]
    fn test_parse_unrecognized_type_keeps_value() {
        let parsed = ParsedMessage::parse(&json!({"type": "tool", "content": "ran"})).unwrap();
        assert_eq!(parsed.kind, MessageKind::Unknown("tool".to_owned()));
        assert_eq!(parsed.kind.css_class(), "unknown");
    }

    #[test]
    fn test_parse_missing_content_is_empty() {
        let parsed = ParsedMessage::parse(&json!({"type": "human"})).unwrap();
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn test_parse_structured_content_as_json_text() {
        let parsed =
            ParsedMessage::parse(&json!({"type": "ai", "content": [{"text": "a"}]})).unwrap();
        assert_eq!(parsed.content, r#"[{"text":"a"}]"#);
    }

    #[test]
    fn test_parse_malformed_text_fails() {
        let err = ParsedMessage::parse(&Value::String("{not json".to_owned())).unwrap_err();
        assert!(matches!(err, MessageParseError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_non_object_fails() {
        let err = ParsedMessage::parse(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, MessageParseError::NotAnObject("an array")));
        let err = ParsedMessage::parse(&Value::String("42".to_owned())).unwrap_err();
        assert!(matches!(err, MessageParseError::NotAnObject("a number")));
    }

    #[test]
    fn test_group_by_session_contiguous_and_sorted() {
        let rows = vec![
            ChatRow::new("b", json!({}), at(10, 5)),
            ChatRow::new("a", json!({}), at(9, 0)),
            ChatRow::new("b", json!({}), at(10, 1)),
            ChatRow::new("a", json!({}), at(8, 0)),
            ChatRow::new("c", json!({}), at(7, 0)),
        ];
        let groups = group_by_session(rows);

        let ids: Vec<&str> = groups.iter().map(|g| g.session_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        for group in &groups {
            assert!(group.rows.iter().all(|r| r.session_id == group.session_id));
            assert!(group.rows.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        }
        assert_eq!(groups[0].rows[0].created_at, at(10, 1));
        assert_eq!(groups[1].rows.len(), 2);
    }

    #[test]
    fn test_group_by_session_keeps_tie_order() {
        let rows = vec![
            ChatRow::new("s", json!({"content": "first"}), at(1, 0)),
            ChatRow::new("s", json!({"content": "second"}), at(1, 0)),
        ];
        let groups = group_by_session(rows);
        assert_eq!(groups[0].rows[0].message, json!({"content": "first"}));
    }

    #[test]
    fn test_group_by_session_empty() {
        assert!(group_by_session(Vec::new()).is_empty());
    }
}
