//! Shared field tables reused across tool schemas.

use crate::schema::{Constraint, FieldSpec, Refinement, Schema, StringConstraint};
use crate::types::Result;
use serde_json::json;

/// Labels separated by dots, alphanumeric TLD of at least two letters.
pub const DOMAIN_PATTERN: &str =
    r"([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,63}";

pub const URL_PATTERN: &str = r"https?://[^\s/$.?#][^\s]*";

/// Serpstat regional databases.
pub const SEARCH_ENGINES: &[&str] = &[
    "g_us", "g_uk", "g_ca", "g_au", "g_nz", "g_ie", "g_in", "g_sg", "g_za", "g_de", "g_at",
    "g_ch", "g_fr", "g_be", "g_nl", "g_es", "g_pt", "g_it", "g_pl", "g_cz", "g_sk", "g_hu",
    "g_ro", "g_bg", "g_gr", "g_se", "g_no", "g_dk", "g_fi", "g_ua", "g_kz", "g_by", "g_lt",
    "g_lv", "g_ee", "g_tr", "g_il", "g_ae", "g_br", "g_mx", "g_ar", "g_co", "g_cl", "g_jp",
];

/// Comparison operators accepted in `complexFilter` conditions.
pub const COMPARE_TYPES: &[&str] = &[
    "gt",
    "lt",
    "gte",
    "lte",
    "eq",
    "neq",
    "between",
    "contains",
    "notContains",
];

pub const DEFAULT_SEARCH_ENGINE: &str = "g_us";
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 100;

pub fn domain() -> Result<StringConstraint> {
    Constraint::string()
        .min_len(4)
        .max_len(253)
        .pattern(DOMAIN_PATTERN, "Invalid domain format")
}

pub fn url() -> Result<StringConstraint> {
    Constraint::string()
        .min_len(10)
        .max_len(2048)
        .pattern(URL_PATTERN, "Invalid URL format")
}

pub fn domain_field(name: &str, description: &str) -> Result<FieldSpec> {
    Ok(FieldSpec::required(name, domain()?).describe(description))
}

pub fn url_field(name: &str, description: &str) -> Result<FieldSpec> {
    Ok(FieldSpec::required(name, url()?).describe(description))
}

/// `domains: [domain, ...]` with cardinality bounds, no repeats.
pub fn domains_field(name: &str, min: usize, max: usize) -> Result<FieldSpec> {
    Ok(FieldSpec::required(
        name,
        Constraint::array(domain()?).min_items(min).max_items(max).unique(),
    )
    .describe(format!("Between {} and {} distinct domains", min, max)))
}

pub fn search_engine() -> FieldSpec {
    FieldSpec::optional("se", Constraint::enumeration(SEARCH_ENGINES.iter().copied()))
        .with_default(json!(DEFAULT_SEARCH_ENGINE))
        .describe("Search engine database, e.g. g_us")
}

pub fn keyword() -> FieldSpec {
    FieldSpec::required("keyword", Constraint::string().non_empty().max_len(100))
        .describe("Keyword to analyze")
}

pub fn keyword_list(name: &str, max: usize) -> FieldSpec {
    FieldSpec::optional(
        name,
        Constraint::array(Constraint::string().non_empty().max_len(100))
            .min_items(1)
            .max_items(max),
    )
}

pub fn page() -> FieldSpec {
    FieldSpec::optional("page", Constraint::integer().min(1.0))
        .with_default(json!(DEFAULT_PAGE))
        .describe("Page number, starting at 1")
}

pub fn size(max: u32) -> FieldSpec {
    FieldSpec::optional("size", Constraint::integer().range(1.0, f64::from(max)))
        .with_default(json!(DEFAULT_PAGE_SIZE))
        .describe(format!("Results per page, 1 to {}", max))
}

pub fn with_intents() -> FieldSpec {
    FieldSpec::optional("withIntents", Constraint::boolean())
        .with_default(json!(false))
        .describe("Include search intent for each keyword")
}

pub fn with_subdomains() -> FieldSpec {
    FieldSpec::optional("withSubdomains", Constraint::boolean())
        .with_default(json!(false))
        .describe("Include subdomains of the domain")
}

fn order() -> StringConstraint {
    Constraint::enumeration(["asc", "desc"])
}

/// `sort: {<field>: "asc" | "desc"}` restricted to sortable fields.
pub fn sort_object(fields: &[&str]) -> FieldSpec {
    let schema = fields
        .iter()
        .fold(Schema::strict(), |schema, name| schema.field(FieldSpec::optional(*name, order())));
    FieldSpec::optional("sort", schema).describe("Sort directive: field name to asc or desc")
}

/// Backlink-style sorting: `sort: <field>` plus `order`.
pub fn sort_and_order(fields: &[&str], default_sort: &str) -> [FieldSpec; 2] {
    [
        FieldSpec::optional("sort", Constraint::enumeration(fields.iter().copied()))
            .with_default(json!(default_sort))
            .describe("Field to sort by"),
        FieldSpec::optional("order", order())
            .with_default(json!("desc"))
            .describe("Sort order"),
    ]
}

/// Numeric `<name>_from` / `<name>_to` pair with an ordering rule.
fn range_fields(schema: Schema, name: &str, integer: bool) -> Schema {
    let bound = || {
        if integer {
            Constraint::integer().min(0.0)
        } else {
            Constraint::number().min(0.0)
        }
    };
    let low = format!("{}_from", name);
    let high = format!("{}_to", name);
    schema
        .field(FieldSpec::optional(low.clone(), bound()))
        .field(FieldSpec::optional(high.clone(), bound()))
        .refine(Refinement::ordered_range(low, high))
}

/// Keyword metric filters shared by keyword and domain-keyword listings.
pub fn keyword_filters() -> FieldSpec {
    let schema = Schema::strict();
    let schema = range_fields(schema, "cost", false);
    let schema = range_fields(schema, "difficulty", true);
    let schema = range_fields(schema, "region_queries_count", true);
    let schema = range_fields(schema, "concurrency", true);
    let schema = range_fields(schema, "position", true);
    let schema = schema
        .field(FieldSpec::optional("right_spelling", Constraint::boolean()))
        .field(FieldSpec::optional(
            "keyword_contain",
            Constraint::string().non_empty().max_len(100),
        ))
        .field(FieldSpec::optional(
            "keyword_not_contain",
            Constraint::string().non_empty().max_len(100),
        ))
        .field(FieldSpec::optional(
            "lang",
            Constraint::string().min_len(2).max_len(5),
        ));
    FieldSpec::optional("filters", schema).describe("Metric filters")
}

/// Domain listing filters: traffic and visibility ranges.
pub fn domain_filters() -> FieldSpec {
    let schema = Schema::strict();
    let schema = range_fields(schema, "traff", true);
    let schema = range_fields(schema, "visible", false);
    let schema = range_fields(schema, "keywords", true);
    FieldSpec::optional("filters", schema).describe("Metric filters")
}

/// `complexFilter`: groups of conditions. Each condition is either
/// `{field, compareType, value[]}` or `{additional_filters}`.
pub fn complex_filter(fields: &[&str], additional: &[&str]) -> FieldSpec {
    let condition = Schema::strict()
        .field(FieldSpec::required("field", Constraint::enumeration(fields.iter().copied())))
        .field(FieldSpec::required(
            "compareType",
            Constraint::enumeration(COMPARE_TYPES.iter().copied()),
        ))
        .field(FieldSpec::required(
            "value",
            Constraint::array(Constraint::one_of(vec![
                Constraint::number().into(),
                Constraint::string().non_empty().into(),
            ]))
            .min_items(1)
            .max_items(2),
        ));
    let additional_filter = Schema::strict().field(FieldSpec::required(
        "additional_filters",
        Constraint::enumeration(additional.iter().copied()),
    ));

    let group = Constraint::array(Constraint::one_of(vec![
        Constraint::object(condition),
        Constraint::object(additional_filter),
    ]))
    .min_items(1)
    .max_items(10);

    FieldSpec::optional("complexFilter", Constraint::array(group).min_items(1).max_items(10))
        .describe("Groups of filter conditions; conditions in a group are ANDed")
}

pub fn backlink_search_type() -> FieldSpec {
    FieldSpec::optional(
        "searchType",
        Constraint::enumeration(["domain", "domain_with_subdomains"]),
    )
    .with_default(json!("domain"))
    .describe("Analyze the exact domain or include subdomains")
}
