use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::document::{Document, DocumentTree, DocumentType, Link, LinkType};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawDocument {
    #[serde(default)]
    pub(super) id: String,
    #[serde(default)]
    pub(super) name: String,
    #[serde(default, alias = "type")]
    pub(super) doctype: String,
    #[serde(default)]
    pub(super) links: Vec<RawLink>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawLink {
    #[serde(default, alias = "type")]
    pub(super) ltype: String,
    #[serde(default)]
    pub(super) document: Option<RawDocument>,
    #[serde(default, rename = "ref")]
    pub(super) reference: Option<String>,
}

pub(crate) fn parse_tree_json(raw: &str) -> Result<DocumentTree> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in document tree")?;

    let documents = match &parsed {
        Value::Array(items) => items,
        Value::Object(object) => object
            .get("documents")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("document tree object has no `documents` array"))?,
        _ => return Err(anyhow!("unexpected JSON type for document tree")),
    };

    let mut tree = DocumentTree::default();
    for (index, value) in documents.iter().enumerate() {
        let raw = RawDocument::deserialize(value)
            .with_context(|| format!("invalid root document at index {index}"))?;
        if let Some((root_id, entry)) = register(&mut tree, raw) {
            tree.outline.add_root(entry);
            if !tree.roots.contains(&root_id) {
                tree.roots.push(root_id);
            }
        }
    }

    if tree.documents.is_empty() {
        Err(anyhow!("document tree contains no documents"))
    } else {
        Ok(tree)
    }
}

/// Registers a document and everything embedded under it; returns its identity and outline entry.
fn register(tree: &mut DocumentTree, raw: RawDocument) -> Option<(String, usize)> {
    let id = normalize_identity(&raw.id);
    if id.is_empty() {
        log::debug!("skipping document without identity (name {:?})", raw.name);
        return None;
    }
    let entry = tree.outline.push(id.clone());

    let mut links = Vec::with_capacity(raw.links.len());
    for raw_link in raw.links {
        let Some(ltype) = LinkType::parse(&raw_link.ltype) else {
            log::warn!("skipping link of unknown type {:?} on {id}", raw_link.ltype);
            continue;
        };

        let target = match (raw_link.document, raw_link.reference) {
            (Some(embedded), _) => register(tree, embedded).map(|(target, child)| {
                tree.outline.attach(entry, child);
                target
            }),
            (None, Some(reference)) => Some(normalize_identity(&reference)),
            (None, None) => None,
        };

        match target {
            Some(target) if !target.is_empty() => links.push(Link { ltype, target }),
            _ => log::debug!("skipping {ltype} link without target on {id}"),
        }
    }

    let name = if raw.name.trim().is_empty() {
        id.clone()
    } else {
        raw.name.trim().to_owned()
    };

    let mut document = Document::new(id.clone(), name, DocumentType::from_tag(&raw.doctype));
    document.links = links;
    tree.insert(document);
    Some((id, entry))
}

fn normalize_identity(value: &str) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeSource;

    #[test]
    fn parses_nested_documents_and_references() {
        let raw = r#"{
            "documents": [
                {
                    "id": "CRE:1", "name": "Auth", "doctype": "CRE",
                    "links": [
                        { "ltype": "Linked To", "document": {
                            "id": "ASVS:V1.1", "name": "ASVS V1.1", "doctype": "Standard",
                            "links": [ { "ltype": "Related", "ref": "CRE:1" } ]
                        } },
                        { "ltype": "Contains", "ref": "CRE:2" }
                    ]
                },
                { "id": "CRE:2", "name": "Session", "doctype": "CRE" }
            ]
        }"#;

        let tree = parse_tree_json(raw).unwrap();
        assert_eq!(tree.roots(), ["CRE:1".to_owned(), "CRE:2".to_owned()]);
        assert_eq!(tree.document_count(), 3);

        let root = tree.document("CRE:1").unwrap();
        assert_eq!(root.links[0].ltype, LinkType::LinkedTo);
        assert_eq!(root.links[0].target, "ASVS:V1.1");
        assert_eq!(root.links[1].target, "CRE:2");

        let standard = tree.document("ASVS:V1.1").unwrap();
        assert_eq!(standard.doctype, DocumentType::Standard);
        assert_eq!(standard.links[0].target, "CRE:1");

        // Only the embedded standard nests; references stay out of the outline.
        let outline = tree.outline();
        assert_eq!(outline.roots().len(), 2);
        let first = outline.entry(outline.roots()[0]).unwrap();
        assert_eq!(first.id, "CRE:1");
        assert_eq!(first.children.len(), 1);
        assert_eq!(outline.entry(first.children[0]).unwrap().id, "ASVS:V1.1");
        assert!(outline.entry(outline.roots()[1]).unwrap().children.is_empty());
    }

    #[test]
    fn accepts_bare_array_and_skips_unknown_link_types() {
        let raw = r#"[
            { "id": "a", "doctype": "Tool", "links": [
                { "ltype": "Teleports", "ref": "b" },
                { "ltype": "same", "ref": "b" }
            ] }
        ]"#;

        let tree = parse_tree_json(raw).unwrap();
        let doc = tree.document("a").unwrap();
        assert_eq!(doc.name, "a");
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.links[0].ltype, LinkType::Same);
    }

    #[test]
    fn rejects_empty_and_malformed_input() {
        assert!(parse_tree_json("{\"documents\": []}").is_err());
        assert!(parse_tree_json("42").is_err());
        assert!(parse_tree_json("{\"nodes\": []}").is_err());
        assert!(parse_tree_json("not json").is_err());
    }
}
