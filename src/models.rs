use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One row as returned by a GCIS query.
pub type RawRecord = Map<String, Value>;

/// Registered entity category. "No data" is not a variant; the category
/// resolver reports it as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Company,
    Branch,
    Business,
}

impl Category {
    /// Order in which the category-search endpoint reports existence flags.
    pub const PROBE_ORDER: [Category; 3] =
        [Category::Company, Category::Branch, Category::Business];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Company => "Company",
            Category::Branch => "Branch",
            Category::Business => "Business",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized registry record, identical in shape for every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcisRecord {
    pub category: Category,
    /// Unified business number, exactly as supplied by the caller.
    pub uni: String,
    /// For branches: `<parent company name>-<branch name>`.
    pub name: String,
    pub address: String,
    /// Always `None` for branches.
    pub register_funds: Option<i64>,
    pub responsible_name: String,
    pub status_code: String,
    pub status_name: String,
    pub business_item_code: Option<Vec<String>>,
    pub business_item_name: Option<Vec<String>>,

    // Company only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_status_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_status_name: Option<String>,

    // Branch only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_uni: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

/// Business activity items as encoded upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessItems {
    Absent,
    /// Legacy encoding: one free-text description without a code.
    Legacy(String),
    /// `(code, description)` pairs in upstream order.
    Itemized(Vec<BusinessItem>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessItem {
    #[serde(rename = "Business_Item")]
    pub code: String,
    #[serde(rename = "Business_Item_Desc")]
    pub description: String,
}
