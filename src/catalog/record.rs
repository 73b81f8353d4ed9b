use std::collections::HashSet;

use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Other,
}

impl Visibility {
    pub fn from_label(label: &str) -> Self {
        match label {
            "public" => Self::Public,
            "private" => Self::Private,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub views: u64,
    pub likes: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub stats: Stats,
    pub site_id: Option<String>,
}

impl Item {
    pub const UNTITLED: &'static str = "Untitled Project";
    pub const PROJECT_BASE_URL: &'static str = "https://websim.ai/p/";

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(Self::UNTITLED)
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn project_url(&self) -> String {
        format!("{}{}", Self::PROJECT_BASE_URL, self.id)
    }

    /// Footer line naming the hosting site, when the record carries one.
    pub fn site_label(&self) -> Option<String> {
        self.site_id
            .as_deref()
            .filter(|site| !site.is_empty())
            .map(|site| format!("site {site}"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CatalogTotals {
    pub items: usize,
    pub views: u64,
    pub likes: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub source: String,
    pub items: Vec<Item>,
}

impl Catalog {
    /// Keeps the first record for every id; later duplicates are dropped.
    pub fn from_items(source: impl Into<String>, items: Vec<Item>) -> Self {
        let source = source.into();
        let mut seen = HashSet::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());

        for item in items {
            if seen.insert(item.id.clone()) {
                unique.push(item);
            } else {
                warn!(item_id = %item.id, %source, "dropping duplicate catalog record");
            }
        }

        Self {
            source,
            items: unique,
        }
    }

    pub fn totals(&self) -> CatalogTotals {
        self.items.iter().fold(
            CatalogTotals {
                items: self.items.len(),
                ..CatalogTotals::default()
            },
            |mut totals, item| {
                totals.views = totals.views.saturating_add(item.stats.views);
                totals.likes = totals.likes.saturating_add(item.stats.likes);
                totals
            },
        )
    }
}
