//! Tool registry: name to handler, built once at startup.

use super::category::ToolCategory;
use super::handler::{ToolCall, ToolDefinition, ToolDescriptor, ToolHandler};
use super::response::ToolResponse;
use super::{account, backlinks, domains, keywords, urls};
use crate::rpc::SerpstatClient;
use crate::types::{Error, Result, ToolsConfig};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Every tool definition in the enabled categories, in catalogue order.
pub fn definitions(categories: &[ToolCategory]) -> Result<Vec<ToolDefinition>> {
    let mut all = Vec::new();
    for category in categories {
        let defs = match category {
            ToolCategory::Domains => domains::definitions()?,
            ToolCategory::Keywords => keywords::definitions()?,
            ToolCategory::Backlinks => backlinks::definitions()?,
            ToolCategory::Urls => urls::definitions()?,
            ToolCategory::Account => account::definitions()?,
        };
        all.extend(defs);
    }
    Ok(all)
}

/// Immutable set of handlers sharing one client.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, ToolHandler>,
}

impl ToolRegistry {
    /// Register every tool of the enabled categories. Repeated categories in
    /// the configuration count once.
    pub fn from_config(config: &ToolsConfig, client: Arc<SerpstatClient>) -> Result<Self> {
        let enabled: Vec<ToolCategory> = ToolCategory::ALL
            .into_iter()
            .filter(|c| config.is_enabled(*c))
            .collect();
        let registry = Self::from_definitions(definitions(&enabled)?, client)?;
        tracing::info!(
            tools = registry.len(),
            categories = ?enabled,
            "tool registry built"
        );
        Ok(registry)
    }

    /// Bind each definition to `client`. Names must be unique and every
    /// default must satisfy its own field constraint.
    pub fn from_definitions(
        definitions: Vec<ToolDefinition>,
        client: Arc<SerpstatClient>,
    ) -> Result<Self> {
        let mut handlers = BTreeMap::new();
        for definition in definitions {
            let name = definition.name.clone();
            if name.is_empty() {
                return Err(Error::config("tool name cannot be empty"));
            }
            if let Err(errors) = definition.schema.verify_defaults() {
                return Err(Error::config(format!(
                    "tool {} has invalid defaults: {}",
                    name, errors
                )));
            }
            let handler = ToolHandler::new(definition, Arc::clone(&client));
            if handlers.insert(name.clone(), handler).is_some() {
                return Err(Error::config(format!("duplicate tool name: {}", name)));
            }
        }
        Ok(Self { handlers })
    }

    pub fn get(&self, name: &str) -> Option<&ToolHandler> {
        self.handlers.get(name)
    }

    /// Sorted tool names.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.handlers.values().map(ToolHandler::descriptor).collect()
    }

    /// Route a call to its handler. Unknown names come back as an error
    /// response, never as `Err`.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResponse {
        match self.handlers.get(&call.name) {
            Some(handler) => handler.handle(&call.arguments).await,
            None => {
                let err = Error::not_found(format!("Unknown tool: {}", call.name));
                tracing::warn!(tool = %call.name, outcome = err.kind(), "unknown tool requested");
                ToolResponse::error(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{HttpTransport, RetryPolicy};
    use crate::schema::{Constraint, FieldSpec, Schema};
    use crate::types::ApiConfig;
    use serde_json::json;
    use std::collections::HashSet;

    fn client() -> Arc<SerpstatClient> {
        let api = ApiConfig {
            token: "test-token".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
            ..ApiConfig::default()
        };
        let transport = HttpTransport::new(&api).unwrap();
        Arc::new(SerpstatClient::new(Arc::new(transport), RetryPolicy::default()))
    }

    #[test]
    fn test_catalogue_names_are_unique() {
        let defs = definitions(&ToolCategory::ALL).unwrap();
        let names: HashSet<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), defs.len());
        assert!(names.contains("get_backlinks_summary"));
        assert!(names.contains("get_credits_stats"));
    }

    #[test]
    fn test_every_method_is_qualified() {
        for def in definitions(&ToolCategory::ALL).unwrap() {
            let (procedure, method) = def.method.split_once('.').unwrap();
            assert!(procedure.starts_with("Serpstat"), "{}", def.method);
            assert!(!method.is_empty(), "{}", def.method);
        }
    }

    #[test]
    fn test_from_config_respects_categories() {
        let config = ToolsConfig {
            categories: vec![ToolCategory::Account],
        };
        let registry = ToolRegistry::from_config(&config, client()).unwrap();
        assert_eq!(registry.names(), vec!["get_credits_stats"]);

        let repeated = ToolsConfig {
            categories: vec![ToolCategory::Account, ToolCategory::Account],
        };
        assert_eq!(ToolRegistry::from_config(&repeated, client()).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let def = ToolDefinition::new("t", ToolCategory::Account, "P.m", "d", Schema::strict());
        let err = ToolRegistry::from_definitions(vec![def.clone(), def], client()).unwrap_err();
        assert!(err.to_string().contains("duplicate tool name: t"));
    }

    #[test]
    fn test_invalid_default_rejected_at_build() {
        let schema = Schema::strict().field(
            FieldSpec::optional("size", Constraint::integer().range(1.0, 50.0))
                .with_default(json!(100)),
        );
        let def = ToolDefinition::new("t", ToolCategory::Account, "P.m", "d", schema);
        let err = ToolRegistry::from_definitions(vec![def], client()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("tool t has invalid defaults: size:"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_response() {
        let registry = ToolRegistry::from_config(&ToolsConfig::default(), client()).unwrap();
        let response = registry.dispatch(&ToolCall::new("get_weather", json!({}))).await;
        assert!(response.is_error);
        assert_eq!(response.text_content(), "Unknown tool: get_weather");
    }

    #[tokio::test]
    async fn test_validation_happens_before_network() {
        let registry = ToolRegistry::from_config(&ToolsConfig::default(), client()).unwrap();
        let response = registry
            .dispatch(&ToolCall::new(
                "get_backlinks_summary",
                json!({"query": "bad_domain", "searchType": "domain"}),
            ))
            .await;
        assert!(response.is_error);
        assert!(response.text_content().starts_with("Invalid parameters: query:"));
    }
}
