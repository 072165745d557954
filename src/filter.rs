//! Category filtering.
//!
//! The visible set is always a subsequence of the catalog in catalog order.
//! Filtering is a pure function: no state, no side effects, and an unknown
//! tag simply yields nothing.

use std::fmt;

use crate::catalog::PhotoRecord;

/// Tag of the unfiltered view.
pub const ALL_TAG: &str = "all";

/// The active category selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Category(String),
}

impl Filter {
    /// `"all"` is the unfiltered sentinel, anything else a category tag.
    pub fn parse(tag: &str) -> Self {
        if tag == ALL_TAG {
            Filter::All
        } else {
            Filter::Category(tag.to_string())
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Filter::All => ALL_TAG,
            Filter::Category(tag) => tag,
        }
    }

    pub fn matches(&self, record: &PhotoRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(tag) => record.category == *tag,
        }
    }

    /// Path segment used for this filter's pages.
    pub fn slug(&self) -> String {
        match self {
            Filter::All => ALL_TAG.to_string(),
            Filter::Category(tag) => slugify(tag),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<&str> for Filter {
    fn from(tag: &str) -> Self {
        Filter::parse(tag)
    }
}

/// Records matching `filter`, in catalog order.
pub fn apply<'a>(catalog: &'a [PhotoRecord], filter: &Filter) -> Vec<&'a PhotoRecord> {
    catalog.iter().filter(|r| filter.matches(r)).collect()
}

/// Catalog positions of the records matching `filter`, ascending.
pub fn apply_indices(catalog: &[PhotoRecord], filter: &Filter) -> Vec<usize> {
    catalog
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Lowercase, alphanumerics kept, every other run of characters collapsed
/// into a single dash.
pub fn slugify(tag: &str) -> String {
    let mut slug = String::with_capacity(tag.len());
    let mut pending_dash = false;
    for c in tag.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "category".to_string()
    } else {
        slug
    }
}
