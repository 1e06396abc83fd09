//! Keyword research tools (`SerpstatKeywordProcedure`).

use super::category::ToolCategory;
use super::fields;
use super::handler::ToolDefinition;
use crate::schema::{Constraint, FieldSpec, Schema};
use crate::types::Result;

const PROCEDURE: &str = "SerpstatKeywordProcedure";

const SORT_FIELDS: &[&str] = &[
    "keyword", "region_queries_count", "cost", "difficulty", "concurrency", "found_results",
];

fn method(name: &str) -> String {
    format!("{}.{}", PROCEDURE, name)
}

fn listing(schema: Schema) -> Schema {
    schema
        .field(fields::page())
        .field(fields::size(1000))
        .field(fields::sort_object(SORT_FIELDS))
        .field(fields::keyword_filters())
}

pub(crate) fn definitions() -> Result<Vec<ToolDefinition>> {
    Ok(vec![
        ToolDefinition::new(
            "get_keywords",
            ToolCategory::Keywords,
            method("getKeywords"),
            "Phrase-match keywords containing the given keyword, with volume and cost",
            listing(
                Schema::strict()
                    .field(fields::keyword())
                    .field(fields::search_engine())
                    .field(
                        fields::keyword_list("minusKeywords", 100)
                            .describe("Exclude keywords containing these words"),
                    )
                    .field(fields::with_intents()),
            ),
        ),
        ToolDefinition::new(
            "get_keywords_info",
            ToolCategory::Keywords,
            method("getKeywordsInfo"),
            "Volume, cost, difficulty and competition for a list of keywords",
            Schema::strict()
                .field(
                    FieldSpec::required(
                        "keywords",
                        Constraint::array(Constraint::string().non_empty().max_len(100))
                            .min_items(1)
                            .max_items(1000)
                            .unique(),
                    )
                    .describe("Keywords to look up"),
                )
                .field(fields::search_engine())
                .field(fields::with_intents()),
        ),
        ToolDefinition::new(
            "get_related_keywords",
            ToolCategory::Keywords,
            method("getRelatedKeywords"),
            "Semantically related keywords",
            listing(
                Schema::strict()
                    .field(fields::keyword())
                    .field(fields::search_engine())
                    .field(fields::with_intents()),
            ),
        ),
        ToolDefinition::new(
            "get_suggestions",
            ToolCategory::Keywords,
            method("getSuggestions"),
            "Search suggestions containing the keyword",
            Schema::strict()
                .field(fields::keyword())
                .field(fields::search_engine())
                .field(fields::page())
                .field(fields::size(1000)),
        ),
        ToolDefinition::new(
            "get_keyword_top",
            ToolCategory::Keywords,
            method("getKeywordFullTop"),
            "Current search results page for a keyword",
            Schema::strict()
                .field(fields::keyword())
                .field(fields::search_engine())
                .field(fields::size(100)),
        ),
        ToolDefinition::new(
            "get_keyword_competitors",
            ToolCategory::Keywords,
            method("getKeywordCompetitors"),
            "Domains ranking for a keyword and its close variants",
            Schema::strict()
                .field(fields::keyword())
                .field(fields::search_engine())
                .field(fields::size(1000)),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(name: &str) -> std::sync::Arc<Schema> {
        definitions()
            .unwrap()
            .into_iter()
            .find(|d| d.name == name)
            .unwrap()
            .schema
    }

    #[test]
    fn test_get_keywords_reports_nested_filter_path() {
        let err = schema("get_keywords")
            .validate(&json!({"keyword": "seo", "filters": {"cost_from": "cheap"}}))
            .unwrap_err();
        assert_eq!(err.to_string(), "filters.cost_from: Expected number, received string");
    }

    #[test]
    fn test_keywords_info_requires_list() {
        let err = schema("get_keywords_info").validate(&json!({})).unwrap_err();
        assert_eq!(err.paths(), vec!["keywords"]);
    }

    #[test]
    fn test_unknown_search_engine() {
        let err = schema("get_suggestions")
            .validate(&json!({"keyword": "seo", "se": "bing_us"}))
            .unwrap_err();
        assert_eq!(err.paths(), vec!["se"]);
    }
}
