//! Parameter schemas: constraint primitives, object composition, validation.
//!
//! Tool arguments arrive as loosely-typed JSON. Every tool declares a
//! [`Schema`] once at startup; [`validate`] turns raw arguments into a
//! normalized object (declared fields only, defaults filled) or a complete
//! list of [`Violation`]s.
//!
//! ```
//! use serpstat_mcp::schema::{Constraint, FieldSpec, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::strict()
//!     .field(FieldSpec::required("keyword", Constraint::string().min_len(1)))
//!     .field(FieldSpec::optional("page", Constraint::integer().min(1.0)).with_default(json!(1)));
//!
//! let params = schema.validate(&json!({"keyword": "seo"})).unwrap();
//! assert_eq!(params["page"], 1);
//! ```

mod constraint;
mod json_schema;
mod object;
mod validate;

pub use constraint::{ArrayConstraint, Constraint, NumberConstraint, Pattern, StringConstraint};
pub use object::{FieldSpec, Refinement, Schema};
pub use validate::{validate, ValidationErrors, Violation};
