//! URL analysis tools (`SerpstatUrlProcedure`).

use super::category::ToolCategory;
use super::fields;
use super::handler::ToolDefinition;
use crate::schema::{Constraint, FieldSpec, Schema};
use crate::types::Result;
use serde_json::json;

const PROCEDURE: &str = "SerpstatUrlProcedure";

const KEYWORD_SORT_FIELDS: &[&str] = &[
    "position",
    "keyword",
    "region_queries_count",
    "cost",
    "traff",
    "difficulty",
];

fn method(name: &str) -> String {
    format!("{}.{}", PROCEDURE, name)
}

pub(crate) fn definitions() -> Result<Vec<ToolDefinition>> {
    Ok(vec![
        ToolDefinition::new(
            "get_url_summary_traffic",
            ToolCategory::Urls,
            method("getUrlSummaryTraffic"),
            "Estimated organic traffic of pages matching a URL prefix",
            Schema::strict()
                .field(fields::domain_field("domain", "Domain the URLs belong to")?)
                .field(
                    FieldSpec::required(
                        "urlContains",
                        Constraint::string().non_empty().max_len(2048),
                    )
                    .describe("Substring the page URLs must contain"),
                )
                .field(fields::search_engine())
                .field(
                    FieldSpec::optional(
                        "output_data",
                        Constraint::enumeration(["traffic", "keywords"]),
                    )
                    .with_default(json!("traffic")),
                ),
        ),
        ToolDefinition::new(
            "get_url_competitors",
            ToolCategory::Urls,
            method("getUrlCompetitors"),
            "Pages competing with a URL for the same keywords",
            Schema::strict()
                .field(fields::url_field("url", "Page to analyze")?)
                .field(fields::search_engine())
                .field(fields::page())
                .field(fields::size(1000))
                .field(fields::sort_object(&["cnt", "url"])),
        ),
        ToolDefinition::new(
            "get_url_keywords",
            ToolCategory::Urls,
            method("getUrlKeywords"),
            "Keywords a single URL ranks for",
            Schema::strict()
                .field(fields::url_field("url", "Page to analyze")?)
                .field(fields::search_engine())
                .field(fields::with_intents())
                .field(fields::page())
                .field(fields::size(1000))
                .field(fields::sort_object(KEYWORD_SORT_FIELDS))
                .field(fields::keyword_filters()),
        ),
        ToolDefinition::new(
            "get_url_missing_keywords",
            ToolCategory::Urls,
            method("getUrlMissingKeywords"),
            "Keywords competitors of a URL rank for but the URL does not",
            Schema::strict()
                .field(fields::url_field("url", "Page to analyze")?)
                .field(fields::search_engine())
                .field(fields::page())
                .field(fields::size(1000))
                .field(fields::sort_object(&[
                    "keyword",
                    "region_queries_count",
                    "cost",
                    "concurrency",
                ]))
                .field(fields::keyword_filters()),
        ),
    ])
}
