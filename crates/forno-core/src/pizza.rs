//! Pizza entity

use serde::{Deserialize, Serialize};

/// A pizza. Read-only through the API; rows come from seeding.
/// Ingredients keep their seeded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pizza {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<String>,
}
