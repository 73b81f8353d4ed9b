use crate::catalog::{Item, Visibility};

pub const UNTAGGED: &str = "untagged";
pub const PRIVATE: &str = "Private";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub title: String,
}

impl Category {
    fn new(title: &str) -> Self {
        Self {
            id: title.to_owned(),
            title: title.to_owned(),
        }
    }
}

/// Indices into the item slice of items without any tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UntaggedBuckets {
    pub public: Vec<usize>,
    pub private: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryAssignment {
    pub categories: Vec<Category>,
    pub untagged: UntaggedBuckets,
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Bracketed tags in first-seen order, trimmed and deduplicated. A tag
/// never spans a line break and ends at the first `]`.
pub fn extract_tags(description: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut rest = description;

    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(|c: char| c == ']' || is_line_terminator(c)) {
            Some(close) if after[close..].starts_with(']') => {
                let tag = after[..close].trim();
                if !tag.is_empty() && !tags.iter().any(|seen| seen == tag) {
                    tags.push(tag.to_owned());
                }
                rest = &after[close + 1..];
            }
            _ => rest = after,
        }
    }

    tags
}

/// Case-insensitive literal match of `[category_id]` in the description.
///
/// Creation keeps tags case-sensitive and trimmed while this match does
/// neither trimming nor case folding on the creation side, so `[ UI ]`
/// creates `UI` without being listed under it.
pub fn has_tag(description: &str, category_id: &str) -> bool {
    let needle = format!("[{}]", category_id.to_lowercase());
    description.to_lowercase().contains(&needle)
}

pub fn assign_categories(items: &[Item]) -> CategoryAssignment {
    let mut assignment = CategoryAssignment::default();

    for (index, item) in items.iter().enumerate() {
        let tags = extract_tags(item.description_text());
        if tags.is_empty() {
            match item.visibility {
                Visibility::Public => assignment.untagged.public.push(index),
                Visibility::Private => assignment.untagged.private.push(index),
                Visibility::Other => {}
            }
            continue;
        }

        for tag in tags {
            assignment.push_category(&tag);
        }
    }

    if !assignment.untagged.public.is_empty() {
        assignment.push_category(UNTAGGED);
    }
    if !assignment.untagged.private.is_empty() {
        assignment.push_category(PRIVATE);
    }

    assignment
}

impl CategoryAssignment {
    fn push_category(&mut self, title: &str) {
        if !self.contains(title) {
            self.categories.push(Category::new(title));
        }
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.categories
            .iter()
            .any(|category| category.id == category_id)
    }

    /// Indices of the items listed under `category_id`, in item order.
    pub fn items_in(&self, items: &[Item], category_id: &str) -> Vec<usize> {
        match category_id {
            UNTAGGED => self.untagged.public.clone(),
            PRIVATE => self.untagged.private.clone(),
            _ => items
                .iter()
                .enumerate()
                .filter(|(_, item)| has_tag(item.description_text(), category_id))
                .map(|(index, _)| index)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Stats;

    fn item(id: &str, description: &str, visibility: Visibility) -> Item {
        Item {
            id: id.to_owned(),
            title: Some(id.to_owned()),
            description: Some(description.to_owned()),
            visibility,
            stats: Stats::default(),
            site_id: None,
        }
    }

    fn titles(assignment: &CategoryAssignment) -> Vec<&str> {
        assignment
            .categories
            .iter()
            .map(|category| category.title.as_str())
            .collect()
    }

    #[test]
    fn repeated_tag_in_one_item_counts_once() {
        assert_eq!(extract_tags("[UI][UI] text"), ["UI"]);

        let assignment = assign_categories(&[item("a", "[UI][UI] text", Visibility::Public)]);
        assert_eq!(titles(&assignment), ["UI"]);
    }

    #[test]
    fn tags_are_trimmed_and_empty_tags_ignored() {
        assert_eq!(extract_tags("[ Games ] [] [   ] [Tools]"), ["Games", "Tools"]);
    }

    #[test]
    fn tags_stop_at_first_close_and_never_cross_lines() {
        assert_eq!(extract_tags("[[x]]"), ["[x"]);
        assert_eq!(extract_tags("[broken\nline] [ok]"), ["ok"]);
        assert_eq!(extract_tags("no tags [here"), Vec::<String>::new());
    }

    #[test]
    fn tags_are_case_sensitive_at_creation() {
        let assignment = assign_categories(&[
            item("a", "[ui]", Visibility::Public),
            item("b", "[UI]", Visibility::Public),
        ]);
        assert_eq!(titles(&assignment), ["ui", "UI"]);
    }

    #[test]
    fn synthetic_categories_come_last_private_after_untagged() {
        let items = [
            item("p", "secret", Visibility::Private),
            item("a", "[Zeta]", Visibility::Public),
            item("u", "plain", Visibility::Public),
            item("b", "[Alpha] [Zeta]", Visibility::Private),
            item("x", "unlisted", Visibility::Other),
        ];
        let assignment = assign_categories(&items);

        assert_eq!(titles(&assignment), ["Zeta", "Alpha", UNTAGGED, PRIVATE]);
        assert_eq!(assignment.untagged.public, [2]);
        assert_eq!(assignment.untagged.private, [0]);
    }

    #[test]
    fn synthetic_categories_only_when_bucket_non_empty() {
        let assignment = assign_categories(&[item("a", "[One]", Visibility::Public)]);
        assert_eq!(titles(&assignment), ["One"]);
        assert!(assign_categories(&[]).categories.is_empty());
    }

    #[test]
    fn filtering_matches_case_insensitively() {
        let items = [
            item("a", "[ui] lower", Visibility::Public),
            item("b", "[UI] upper", Visibility::Public),
            item("c", "[ UI ] padded", Visibility::Public),
            item("d", "[Tools]", Visibility::Public),
        ];
        let assignment = assign_categories(&items);

        assert_eq!(assignment.items_in(&items, "UI"), [0, 1]);
        assert_eq!(assignment.items_in(&items, "ui"), [0, 1]);
        assert_eq!(assignment.items_in(&items, "Tools"), [3]);
    }

    #[test]
    fn synthetic_ids_resolve_to_buckets() {
        let items = [
            item("u", "plain", Visibility::Public),
            item("p", "hidden", Visibility::Private),
        ];
        let assignment = assign_categories(&items);

        assert_eq!(assignment.items_in(&items, UNTAGGED), [0]);
        assert_eq!(assignment.items_in(&items, PRIVATE), [1]);
    }

    #[test]
    fn category_ids_are_matched_literally() {
        let items = [item("a", "[c++] lang", Visibility::Public)];
        let assignment = assign_categories(&items);
        assert_eq!(assignment.items_in(&items, "c++"), [0]);
        assert!(assignment.items_in(&items, "c").is_empty());
    }
}
