//! Account tools (`SerpstatLimitsProcedure`).

use super::category::ToolCategory;
use super::handler::ToolDefinition;
use crate::schema::Schema;
use crate::types::Result;

pub(crate) fn definitions() -> Result<Vec<ToolDefinition>> {
    Ok(vec![ToolDefinition::new(
        "get_credits_stats",
        ToolCategory::Account,
        "SerpstatLimitsProcedure.getStats",
        "Remaining API credits and usage for the configured token",
        Schema::strict(),
    )])
}
