//! Tool categories: the unit of enable/disable in configuration.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tool category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Domains,
    Keywords,
    Backlinks,
    Urls,
    Account,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 5] = [
        ToolCategory::Domains,
        ToolCategory::Keywords,
        ToolCategory::Backlinks,
        ToolCategory::Urls,
        ToolCategory::Account,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolCategory::Domains => "domains",
            ToolCategory::Keywords => "keywords",
            ToolCategory::Backlinks => "backlinks",
            ToolCategory::Urls => "urls",
            ToolCategory::Account => "account",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ToolCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown tool category '{}', expected one of: \
                     domains, keywords, backlinks, urls, account",
                    s
                ))
            })
    }
}
