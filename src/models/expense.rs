use serde::{Deserialize, Serialize};

use super::de;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "de::amount")]
    pub amount: f64,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}
