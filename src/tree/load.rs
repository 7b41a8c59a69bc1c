use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::document::DocumentTree;
use super::parse::parse_tree_json;

pub fn load_tree(path: &Path) -> Result<DocumentTree> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read document tree from {}", path.display()))?;

    let tree = parse_tree_json(&raw)
        .with_context(|| format!("failed to parse document tree {}", path.display()))?;

    log::info!(
        "loaded {} documents ({} roots, {} links, {} appearances) from {}",
        tree.document_count(),
        tree.roots.len(),
        tree.link_count(),
        tree.outline.appearance_count(),
        path.display()
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_tree_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"documents": [{{"id": "x", "name": "X", "doctype": "Tool"}}]}}"#
        )
        .unwrap();

        let tree = load_tree(file.path()).unwrap();
        assert_eq!(tree.document_count(), 1);
        assert_eq!(tree.roots, vec!["x".to_owned()]);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let error = load_tree(&path).unwrap_err();
        assert!(format!("{error:#}").contains("absent.json"));
    }
}
