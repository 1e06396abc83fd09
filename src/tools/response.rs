//! Uniform tool response: `{content: [{type: "text", text}], isError?}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// What a tool call returns to the dispatcher. Failures are values, not
/// errors: every path ends here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default, skip_serializing_if = "is_false")]
    pub is_error: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Success carrying pretty-printed JSON.
    pub fn json(value: &Value) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(format!("Failed to serialize result: {}", e)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Text of the first content block.
    pub fn text_content(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_wire_shape_omits_is_error() {
        let response = ToolResponse::json(&json!({"a": 1}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"content": [{"type": "text", "text": "{\n  \"a\": 1\n}"}]})
        );
    }

    #[test]
    fn test_error_wire_shape() {
        let response = ToolResponse::error("boom");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"content": [{"type": "text", "text": "boom"}], "isError": true})
        );
        assert_eq!(response.text_content(), "boom");
    }
}
