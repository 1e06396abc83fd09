//! Tool handler: validate, call, format.

use super::category::ToolCategory;
use super::response::ToolResponse;
use crate::rpc::SerpstatClient;
use crate::schema::Schema;
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Inbound tool call from the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Static description of one tool: a schema plus the remote method it
/// forwards to.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub category: ToolCategory,
    pub method: String,
    pub schema: Arc<Schema>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        category: ToolCategory,
        method: impl Into<String>,
        description: impl Into<String>,
        schema: Schema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            method: method.into(),
            schema: Arc::new(schema),
        }
    }
}

/// Tool listing entry as published to agents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One tool, bound to the shared client. Immutable after construction.
#[derive(Debug, Clone)]
pub struct ToolHandler {
    definition: ToolDefinition,
    client: Arc<SerpstatClient>,
}

impl ToolHandler {
    pub fn new(definition: ToolDefinition, client: Arc<SerpstatClient>) -> Self {
        Self { definition, client }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.definition.name.clone(),
            description: self.definition.description.clone(),
            input_schema: self.definition.schema.to_json_schema(),
        }
    }

    /// Validate `arguments` into normalized params. Absent arguments are an
    /// empty object.
    pub fn normalize(&self, arguments: &Value) -> Result<Map<String, Value>> {
        let empty = Value::Object(Map::new());
        let arguments = if arguments.is_null() { &empty } else { arguments };

        self.definition.schema.validate(arguments).map_err(|errors| {
            tracing::debug!(
                tool = %self.definition.name,
                violations = errors.len(),
                "tool arguments rejected: {}",
                errors
            );
            Error::Validation(errors)
        })
    }

    /// Validate then forward to the remote method.
    pub async fn execute(&self, arguments: &Value) -> Result<Value> {
        let params = self.normalize(arguments)?;
        self.client.call(&self.definition.method, params).await
    }

    /// Run the call and fold every outcome into a `ToolResponse`. Error
    /// messages pass through unchanged.
    pub async fn handle(&self, arguments: &Value) -> ToolResponse {
        match self.execute(arguments).await {
            Ok(result) => ToolResponse::json(&result),
            Err(err) => {
                tracing::info!(
                    tool = %self.definition.name,
                    outcome = err.kind(),
                    "tool call failed: {}",
                    err
                );
                ToolResponse::error(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{RetryPolicy, SerpstatClient, Transport};
    use crate::rpc::{RequestEnvelope, ResponseEnvelope};
    use crate::schema::{Constraint, FieldSpec};
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    /// Echoes the normalized params back as the result.
    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope> {
            Ok(ResponseEnvelope::success(
                &envelope.id,
                json!({"method": envelope.method, "params": envelope.params}),
            ))
        }
    }

    fn handler() -> ToolHandler {
        let schema = Schema::strict()
            .field(FieldSpec::required("keyword", Constraint::string().non_empty()))
            .field(
                FieldSpec::optional("page", Constraint::integer().min(1.0)).with_default(json!(1)),
            );
        let definition = ToolDefinition::new(
            "get_keywords",
            ToolCategory::Keywords,
            "SerpstatKeywordProcedure.getKeywords",
            "Keyword research",
            schema,
        );
        let client = SerpstatClient::new(
            Arc::new(EchoTransport),
            RetryPolicy {
                max_retries: 0,
                delay: Duration::ZERO,
            },
        );
        ToolHandler::new(definition, Arc::new(client))
    }

    #[tokio::test]
    async fn test_forwards_normalized_params_to_fixed_method() {
        let response = handler().handle(&json!({"keyword": "seo"})).await;
        assert!(!response.is_error);
        let body: Value = serde_json::from_str(response.text_content()).unwrap();
        assert_eq!(body["method"], "SerpstatKeywordProcedure.getKeywords");
        assert_eq!(body["params"], json!({"keyword": "seo", "page": 1}));
    }

    #[tokio::test]
    async fn test_validation_failure_joins_all_violations() {
        let response = handler().handle(&json!({"page": 0, "extra": true})).await;
        assert!(response.is_error);
        assert_eq!(
            response.text_content(),
            "Invalid parameters: keyword: Required, \
             page: Number must be greater than or equal to 1, \
             extra: Unrecognized key"
        );
    }

    #[tokio::test]
    async fn test_null_arguments_are_treated_as_empty() {
        let response = handler().handle(&Value::Null).await;
        assert_eq!(response.text_content(), "Invalid parameters: keyword: Required");
    }

    #[test]
    fn test_descriptor_carries_input_schema() {
        let descriptor = handler().descriptor();
        assert_eq!(descriptor.name, "get_keywords");
        assert_eq!(descriptor.input_schema["required"], json!(["keyword"]));
        let wire = serde_json::to_value(&descriptor).unwrap();
        assert!(wire.get("inputSchema").is_some());
    }
}
