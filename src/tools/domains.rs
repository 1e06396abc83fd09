//! Domain analysis tools (`SerpstatDomainProcedure`).

use super::fields;
use super::handler::ToolDefinition;
use super::category::ToolCategory;
use crate::schema::{Constraint, FieldSpec, Refinement, Schema};
use crate::types::Result;
use serde_json::json;

const PROCEDURE: &str = "SerpstatDomainProcedure";

const KEYWORD_SORT_FIELDS: &[&str] = &[
    "position", "keyword", "region_queries_count", "cost", "traff", "difficulty", "concurrency",
];

fn method(name: &str) -> String {
    format!("{}.{}", PROCEDURE, name)
}

pub(crate) fn definitions() -> Result<Vec<ToolDefinition>> {
    Ok(vec![
        ToolDefinition::new(
            "get_domains_info",
            ToolCategory::Domains,
            method("getDomainsInfo"),
            "Visibility, traffic and keyword counts for up to 10 domains",
            Schema::strict()
                .field(fields::domains_field("domains", 1, 10)?)
                .field(fields::search_engine())
                .field(fields::domain_filters()),
        ),
        ToolDefinition::new(
            "get_domain_keywords",
            ToolCategory::Domains,
            method("getDomainKeywords"),
            "Organic keywords a domain ranks for, with positions and metrics",
            Schema::strict()
                .field(fields::domain_field("domain", "Domain to analyze")?)
                .field(fields::search_engine())
                .field(fields::with_subdomains())
                .field(fields::with_intents())
                .field(
                    FieldSpec::optional("url", fields::url()?)
                        .describe("Restrict to one URL of the domain"),
                )
                .field(
                    fields::keyword_list("keywords", 100)
                        .describe("Only keywords containing these words"),
                )
                .field(
                    fields::keyword_list("minusKeywords", 100)
                        .describe("Exclude keywords containing these words"),
                )
                .field(fields::page())
                .field(fields::size(1000))
                .field(fields::sort_object(KEYWORD_SORT_FIELDS))
                .field(fields::keyword_filters()),
        ),
        ToolDefinition::new(
            "get_competitors",
            ToolCategory::Domains,
            method("getCompetitors"),
            "Organic search competitors of a domain",
            Schema::strict()
                .field(fields::domain_field("domain", "Domain to analyze")?)
                .field(fields::search_engine())
                .field(fields::size(100))
                .field(fields::domain_filters()),
        ),
        ToolDefinition::new(
            "get_domain_urls",
            ToolCategory::Domains,
            method("getDomainUrls"),
            "URLs of a domain with the number of keywords each ranks for",
            Schema::strict()
                .field(fields::domain_field("domain", "Domain to analyze")?)
                .field(fields::search_engine())
                .field(fields::page())
                .field(fields::size(1000))
                .field(fields::sort_object(&["keywords"])),
        ),
        ToolDefinition::new(
            "get_regions_count",
            ToolCategory::Domains,
            method("getRegionsCount"),
            "Keyword counts of a domain across all regional databases",
            Schema::strict()
                .field(fields::domain_field("domain", "Domain to analyze")?)
                .field(FieldSpec::optional(
                    "sort",
                    Constraint::enumeration([
                        "keywords_count",
                        "db_name",
                        "country_name_en",
                        "google_domain",
                    ]),
                ))
                .field(
                    FieldSpec::optional("sortOrder", Constraint::enumeration(["asc", "desc"]))
                        .with_default(json!("desc")),
                ),
        ),
        ToolDefinition::new(
            "get_domains_uniq_keywords",
            ToolCategory::Domains,
            method("getDomainsUniqKeywords"),
            "Keywords shared by one or two domains but missing from a third",
            Schema::strict()
                .field(fields::search_engine())
                .field(fields::domains_field("domains", 1, 2)?)
                .field(fields::domain_field("minusDomain", "Domain whose keywords are excluded")?)
                .field(fields::page())
                .field(fields::size(1000))
                .field(fields::keyword_filters())
                .refine(Refinement::distinct_from("minusDomain", "domains")),
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
    fn test_domain_keywords_defaults() {
        let params = schema("get_domain_keywords")
            .validate(&json!({"domain": "example.com"}))
            .unwrap();
        assert_eq!(params["se"], "g_us");
        assert_eq!(params["page"], 1);
        assert_eq!(params["size"], 100);
        assert_eq!(params["withSubdomains"], false);
    }

    #[test]
    fn test_domains_info_rejects_duplicates() {
        let err = schema("get_domains_info")
            .validate(&json!({"domains": ["example.com", "example.com"]}))
            .unwrap_err();
        assert_eq!(err.paths(), vec!["domains"]);
    }

    #[test]
    fn test_minus_domain_must_differ() {
        let err = schema("get_domains_uniq_keywords")
            .validate(&json!({
                "domains": ["a-site.com", "b-site.com"],
                "minusDomain": "b-site.com"
            }))
            .unwrap_err();
        assert_eq!(err.paths(), vec!["minusDomain"]);
    }
}
