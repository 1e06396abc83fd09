//! Backlink analysis tools (`SerpstatBacklinksProcedure`).

use super::category::ToolCategory;
use super::fields;
use super::handler::ToolDefinition;
use crate::schema::{Constraint, FieldSpec, Refinement, Schema};
use crate::types::Result;
use serde_json::json;

const PROCEDURE: &str = "SerpstatBacklinksProcedure";

const LINK_SORT_FIELDS: &[&str] = &[
    "url_from",
    "anchor",
    "link_nofollow",
    "links_external",
    "link_type",
    "url_to",
    "check",
    "add",
    "domain_rank",
];
const FILTER_FIELDS: &[&str] = &[
    "url_from",
    "url_to",
    "anchor",
    "link_nofollow",
    "links_external",
    "domain_rank",
    "link_type",
];
const ADDITIONAL_FILTERS: &[&str] = &[
    "no_subdomains",
    "only_subdomains",
    "only_hosts",
    "last_week",
    "only_main_page",
    "exclude_main_page",
];
const ANCHOR_SORT_FIELDS: &[&str] = &["total", "refDomains", "lastupdate", "anchor", "nofollow"];
const REF_DOMAIN_SORT_FIELDS: &[&str] = &["domain_links", "domain_from", "domain_rank", "check"];
const REF_DOMAIN_FILTER_FIELDS: &[&str] = &["domain_from", "domain_links", "domain_rank"];
const INTERSECT_SORT_FIELDS: &[&str] =
    &["domain_rank", "links_count1", "links_count2", "links_count3"];

fn method(name: &str) -> String {
    format!("{}.{}", PROCEDURE, name)
}

fn query() -> Result<FieldSpec> {
    fields::domain_field("query", "Domain to analyze")
}

fn link_listing(schema: Schema, sort_fields: &[&str], default_sort: &str) -> Schema {
    schema
        .fields_from(fields::sort_and_order(sort_fields, default_sort))
        .field(fields::complex_filter(FILTER_FIELDS, ADDITIONAL_FILTERS))
        .field(fields::page())
        .field(fields::size(1000))
}

pub(crate) fn definitions() -> Result<Vec<ToolDefinition>> {
    Ok(vec![
        ToolDefinition::new(
            "get_backlinks_summary",
            ToolCategory::Backlinks,
            method("getSummaryV2"),
            "Backlink profile summary: referring domains, links, domain rank",
            Schema::strict()
                .field(query()?)
                .field(fields::backlink_search_type()),
        ),
        ToolDefinition::new(
            "get_new_backlinks",
            ToolCategory::Backlinks,
            method("getNewBacklinks"),
            "Backlinks discovered recently",
            link_listing(
                Schema::strict()
                    .field(query()?)
                    .field(fields::backlink_search_type())
                    .field(
                        FieldSpec::optional(
                            "linkPerDomain",
                            Constraint::integer().range(1.0, 1.0),
                        )
                        .describe("Return at most one link per referring domain"),
                    ),
                LINK_SORT_FIELDS,
                "check",
            ),
        ),
        ToolDefinition::new(
            "get_lost_backlinks",
            ToolCategory::Backlinks,
            method("getLostBacklinks"),
            "Backlinks that disappeared recently",
            link_listing(
                Schema::strict()
                    .field(query()?)
                    .field(fields::backlink_search_type()),
                LINK_SORT_FIELDS,
                "check",
            ),
        ),
        ToolDefinition::new(
            "get_anchors",
            ToolCategory::Backlinks,
            method("getAnchors"),
            "Anchor texts of backlinks pointing to the domain",
            Schema::strict()
                .field(query()?)
                .field(fields::backlink_search_type())
                .field(FieldSpec::optional(
                    "anchor",
                    Constraint::string().non_empty().max_len(200),
                ))
                .field(
                    FieldSpec::optional("count", Constraint::integer().min(1.0))
                        .describe("Minimum links per anchor"),
                )
                .fields_from(fields::sort_and_order(ANCHOR_SORT_FIELDS, "total"))
                .field(fields::page())
                .field(fields::size(1000)),
        ),
        ToolDefinition::new(
            "get_referring_domains",
            ToolCategory::Backlinks,
            method("getRefDomains"),
            "Domains linking to the analyzed domain",
            Schema::strict()
                .field(query()?)
                .field(fields::backlink_search_type())
                .fields_from(fields::sort_and_order(REF_DOMAIN_SORT_FIELDS, "check"))
                .field(fields::complex_filter(REF_DOMAIN_FILTER_FIELDS, ADDITIONAL_FILTERS))
                .field(fields::page())
                .field(fields::size(1000)),
        ),
        ToolDefinition::new(
            "get_backlinks_intersection",
            ToolCategory::Backlinks,
            method("getIntersect"),
            "Referring domains that link to the query domain and the intersect domains",
            Schema::strict()
                .field(query()?)
                .field(fields::domains_field("intersect", 1, 2)?)
                .fields_from(fields::sort_and_order(INTERSECT_SORT_FIELDS, "domain_rank"))
                .field(fields::page())
                .field(fields::size(1000))
                .refine(Refinement::distinct_from("intersect", "query")),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(name: &str) -> std::sync::Arc<Schema> {
        definitions()
            .unwrap()
            .into_iter()
            .find(|d| d.name == name)
            .unwrap()
            .schema
    }

    #[test]
    fn test_summary_defaults_search_type() {
        let params = schema("get_backlinks_summary")
            .validate(&json!({"query": "example.com"}))
            .unwrap();
        assert_eq!(
            serde_json::Value::Object(params),
            json!({"query": "example.com", "searchType": "domain"})
        );
    }

    #[test]
    fn test_summary_rejects_bad_domain() {
        let err = schema("get_backlinks_summary")
            .validate(&json!({"query": "bad_domain", "searchType": "domain"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "query: Invalid domain format");
    }

    #[test]
    fn test_intersect_must_not_repeat_query() {
        let s = schema("get_backlinks_intersection");
        assert!(s
            .validate(&json!({"query": "example.com", "intersect": ["other.com"]}))
            .is_ok());
        let err = s
            .validate(&json!({"query": "example.com", "intersect": ["other.com", "example.com"]}))
            .unwrap_err();
        assert_eq!(err.paths(), vec!["intersect.1"]);
    }

    #[test]
    fn test_new_backlinks_defaults_sorting() {
        let params = schema("get_new_backlinks")
            .validate(&json!({"query": "example.com"}))
            .unwrap();
        assert_eq!(params["sort"], "check");
        assert_eq!(params["order"], "desc");
        assert_eq!(params["size"], 100);
    }
}
