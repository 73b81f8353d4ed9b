use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::parse::parse_catalog_output;
use super::record::Catalog;

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;

    let parsed = parse_catalog_output(&raw)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;

    if let Some(cursor) = &parsed.dangling_cursor {
        warn!(
            path = %path.display(),
            cursor = %cursor,
            "catalog ends on a page that reports more results; later pages are not loaded"
        );
    }

    let catalog = Catalog::from_items(path.display().to_string(), parsed.items);
    info!(
        path = %path.display(),
        items = catalog.items.len(),
        "catalog loaded"
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let error = load_catalog(Path::new("/definitely/not/here/projects.json"))
            .expect_err("missing file must fail");
        assert!(format!("{error:#}").contains("/definitely/not/here/projects.json"));
    }

    #[test]
    fn loads_records_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "project-orbit-load-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"[{"id": "a"}, {"id": "a"}, {"id": "b"}]"#).expect("write fixture");

        let catalog = load_catalog(&path).expect("fixture loads");
        let _ = fs::remove_file(&path);

        assert_eq!(catalog.items.len(), 2);
        assert_eq!(catalog.source, path.display().to_string());
    }
}
