use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::record::{Item, Stats, Visibility};

#[derive(Clone, Debug, Default, Deserialize)]
struct RawStats {
    #[serde(default)]
    views: u64,
    #[serde(default)]
    likes: u64,
}

#[derive(Clone, Debug, Deserialize)]
struct RawProject {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    stats: RawStats,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawSite {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawEntry {
    project: RawProject,
    #[serde(default)]
    site: Option<RawSite>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawMeta {
    #[serde(default)]
    has_next_page: bool,
    #[serde(default)]
    end_cursor: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawPageData {
    #[serde(default)]
    data: Vec<RawEntry>,
    #[serde(default)]
    meta: RawMeta,
}

#[derive(Clone, Debug, Deserialize)]
struct RawPage {
    projects: RawPageData,
}

#[derive(Debug, Default)]
pub(super) struct ParsedCatalog {
    pub(super) items: Vec<Item>,
    /// Cursor of the last page when it still reported a following page.
    pub(super) dangling_cursor: Option<String>,
}

impl RawEntry {
    fn into_item(self) -> Item {
        let RawProject {
            id,
            title,
            description,
            visibility,
            stats,
        } = self.project;

        Item {
            id,
            title,
            description,
            visibility: visibility
                .as_deref()
                .map(Visibility::from_label)
                .unwrap_or(Visibility::Other),
            stats: Stats {
                views: stats.views,
                likes: stats.likes,
            },
            site_id: self.site.and_then(|site| site.id),
        }
    }
}

fn collect_pages(pages: Vec<RawPage>) -> ParsedCatalog {
    let mut parsed = ParsedCatalog::default();

    for page in pages {
        let RawPageData { data, meta } = page.projects;
        parsed
            .items
            .extend(data.into_iter().map(RawEntry::into_item));

        if !meta.has_next_page {
            parsed.dangling_cursor = None;
            return parsed;
        }
        parsed.dangling_cursor = Some(meta.end_cursor.unwrap_or_default());
    }

    parsed
}

pub(super) fn parse_catalog_output(raw: &str) -> Result<ParsedCatalog> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in catalog")?;

    if parsed.get("projects").is_some() {
        let page = RawPage::deserialize(parsed).context("invalid project page in catalog")?;
        return Ok(collect_pages(vec![page]));
    }

    match parsed {
        Value::Array(values) => {
            let Some(first) = values.first() else {
                return Ok(ParsedCatalog::default());
            };

            if first.get("projects").is_some() {
                let pages = values
                    .into_iter()
                    .enumerate()
                    .map(|(index, value)| {
                        RawPage::deserialize(value)
                            .with_context(|| format!("invalid project page at index {index}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                return Ok(collect_pages(pages));
            }

            let wrapped = first.get("project").is_some();
            let items = values
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    let entry = if wrapped {
                        RawEntry::deserialize(value)
                    } else {
                        RawProject::deserialize(value).map(|project| RawEntry {
                            project,
                            site: None,
                        })
                    };
                    entry
                        .map(RawEntry::into_item)
                        .with_context(|| format!("invalid project record at index {index}"))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(ParsedCatalog {
                items,
                dangling_cursor: None,
            })
        }
        _ => Err(anyhow!(
            "unexpected catalog JSON; expected a project page or an array"
        )),
    }
}
