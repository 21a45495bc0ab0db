//! Display names and colors for category references.
//!
//! Transactions and budgets point at categories by id, and those ids may be
//! missing or dangling (categories are deleted without cascading). Resolution
//! never fails: anything unknown is labelled "Uncategorized" and gets a
//! palette color picked by the item's position in its list.

use std::collections::HashMap;

use crate::domain::models::Category;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Colors handed out to unresolved categories, indexed by list position
pub const FALLBACK_PALETTE: [&str; 10] = [
    "#8884d8", "#83a6ed", "#8dd1e1", "#82ca9d", "#a4de6c",
    "#d0ed57", "#ffc658", "#ff8042", "#ff6361", "#bc5090",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCategory<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

/// Lookup from category id to display name and color
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    by_id: HashMap<String, (String, String)>,
}

impl CategoryResolver {
    pub fn new(categories: &[Category]) -> Self {
        let by_id = categories
            .iter()
            .map(|category| {
                (
                    category.id.clone(),
                    (category.name.clone(), category.color.clone()),
                )
            })
            .collect();
        Self { by_id }
    }

    /// Resolve the category of the item at `position` in its containing list
    pub fn resolve(&self, category_id: Option<&str>, position: usize) -> ResolvedCategory<'_> {
        match category_id.and_then(|id| self.by_id.get(id)) {
            Some((name, color)) => ResolvedCategory { name, color },
            None => ResolvedCategory {
                name: UNCATEGORIZED,
                color: FALLBACK_PALETTE[position % FALLBACK_PALETTE.len()],
            },
        }
    }

    /// Display name only; unknown or absent ids are "Uncategorized"
    pub fn name_of(&self, category_id: Option<&str>) -> &str {
        category_id
            .and_then(|id| self.by_id.get(id))
            .map(|(name, _)| name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }
}
