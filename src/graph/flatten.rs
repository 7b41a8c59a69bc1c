use std::collections::{BTreeMap, HashMap, HashSet};

use crate::tree::{Document, DocumentType, OutlineEntry, TreeSource};
use crate::util::{base_name, group_identity};

use super::taxonomy::TaxonomyEntry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandardGroup {
    pub base: String,
    pub id: String,
    /// Distinct member identities in first-collected order.
    pub members: Vec<String>,
    /// How many times members appear in the nested source.
    pub occurrences: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Flattened {
    pub groups: Vec<StandardGroup>,
    pub group_of: HashMap<String, String>,
    pub taxonomy: Vec<TaxonomyEntry>,
    group_index: HashMap<String, usize>,
}

impl Flattened {
    pub fn group_identity_of(&self, document_id: &str) -> Option<&str> {
        self.group_of.get(document_id).map(String::as_str)
    }

    pub fn group(&self, group_id: &str) -> Option<&StandardGroup> {
        self.group_index.get(group_id).map(|&index| &self.groups[index])
    }
}

struct Frame<'a> {
    entry: &'a OutlineEntry,
    key: String,
    next_child: usize,
}

/// Collects every linked standard in the nested source, one entry per appearance.
///
/// The walk follows the outline rather than the merged store, so each appearance is
/// visited at most once. A document already on the current branch is not re-entered,
/// while a standard written out under two branches is still collected twice.
pub fn collect_standards<S: TreeSource + ?Sized>(source: &S) -> Vec<String> {
    let outline = source.outline();
    let mut collected = Vec::new();

    for &root in outline.roots() {
        let Some((entry, document)) = appearance(source, root) else {
            continue;
        };

        let key = source.stable_key(document);
        let mut on_path = HashSet::from([key.clone()]);
        collect_if_standard(source, document, &mut collected);
        let mut stack = vec![Frame {
            entry,
            key,
            next_child: 0,
        }];

        loop {
            let (entry, index) = match stack.last_mut() {
                Some(frame) => {
                    let index = frame.next_child;
                    frame.next_child += 1;
                    (frame.entry, index)
                }
                None => break,
            };

            let Some(&child) = entry.children.get(index) else {
                if let Some(frame) = stack.pop() {
                    on_path.remove(&frame.key);
                }
                continue;
            };

            let Some((child_entry, document)) = appearance(source, child) else {
                continue;
            };
            let key = source.stable_key(document);
            if !on_path.insert(key.clone()) {
                continue;
            }

            collect_if_standard(source, document, &mut collected);
            stack.push(Frame {
                entry: child_entry,
                key,
                next_child: 0,
            });
        }
    }

    collected
}

fn appearance<'a, S: TreeSource + ?Sized>(
    source: &'a S,
    index: usize,
) -> Option<(&'a OutlineEntry, &'a Document)> {
    let entry = source.outline().entry(index)?;
    match source.document(&entry.id) {
        Some(document) => Some((entry, document)),
        None => {
            log::debug!("outline entry {} is not in the store", entry.id);
            None
        }
    }
}

fn collect_if_standard<S: TreeSource + ?Sized>(
    source: &S,
    document: &Document,
    collected: &mut Vec<String>,
) {
    if document.doctype == DocumentType::Standard && !document.links.is_empty() {
        collected.push(source.stable_key(document));
    }
}

pub fn flatten_tree<S: TreeSource + ?Sized>(source: &S) -> Flattened {
    let raw_standards = collect_standards(source);

    let mut families: BTreeMap<&str, (Vec<String>, HashSet<&str>, usize)> = BTreeMap::new();
    for id in &raw_standards {
        let (members, distinct, occurrences) = families.entry(base_name(id)).or_default();
        *occurrences += 1;
        if distinct.insert(id.as_str()) {
            members.push(id.clone());
        }
    }

    let mut groups = Vec::new();
    let mut group_of = HashMap::new();
    let mut group_index = HashMap::new();
    let mut taxonomy = Vec::new();

    for (base, (members, _, occurrences)) in families {
        if members.len() < 2 {
            continue;
        }

        let id = group_identity(base);
        for member in &members {
            group_of.insert(member.clone(), id.clone());
        }
        taxonomy.push(TaxonomyEntry {
            value: id.clone(),
            label: format!("{base} ({})", members.len()),
        });
        group_index.insert(id.clone(), groups.len());
        groups.push(StandardGroup {
            base: base.to_owned(),
            id,
            members,
            occurrences,
        });
    }

    log::debug!(
        "flattened {} standard occurrences into {} groups",
        raw_standards.len(),
        groups.len()
    );

    Flattened {
        groups,
        group_of,
        taxonomy,
        group_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DocumentTree, LinkType};

    fn standard(id: &str) -> Document {
        Document::new(id, id, DocumentType::Standard)
    }

    fn sample_tree() -> DocumentTree {
        DocumentTree::from_documents(
            &["CRE:1", "CRE:2"],
            vec![
                Document::new("CRE:1", "Auth", DocumentType::Cre)
                    .with_link(LinkType::LinkedTo, "ASVS:V1")
                    .with_link(LinkType::LinkedTo, "ASVS:V2"),
                Document::new("CRE:2", "Session", DocumentType::Cre)
                    .with_link(LinkType::LinkedTo, "ASVS:V1")
                    .with_link(LinkType::LinkedTo, "NIST:AC-1"),
                standard("ASVS:V1").with_link(LinkType::Related, "CRE:1"),
                standard("ASVS:V2").with_link(LinkType::Related, "CRE:1"),
                standard("NIST:AC-1").with_link(LinkType::Related, "CRE:2"),
                standard("NIST:AC-2"),
            ],
        )
    }

    #[test]
    fn shared_standard_is_collected_once_per_path() {
        let raw = collect_standards(&sample_tree());
        let v1 = raw.iter().filter(|id| *id == "ASVS:V1").count();
        assert_eq!(v1, 2);
    }

    #[test]
    fn cycles_terminate() {
        let tree = DocumentTree::from_documents(
            &["a:1"],
            vec![
                standard("a:1").with_link(LinkType::Related, "a:2"),
                standard("a:2").with_link(LinkType::Related, "a:1"),
            ],
        );
        assert_eq!(collect_standards(&tree), vec!["a:1", "a:2"]);
    }

    #[test]
    fn standards_without_links_are_not_collected() {
        let tree = DocumentTree::from_documents(
            &["CRE:9"],
            vec![
                Document::new("CRE:9", "x", DocumentType::Cre)
                    .with_link(LinkType::LinkedTo, "NIST:AC-2"),
                standard("NIST:AC-2"),
            ],
        );
        assert!(collect_standards(&tree).is_empty());
    }

    #[test]
    fn groups_hold_distinct_members() {
        let flattened = flatten_tree(&sample_tree());

        let asvs = flattened.group("group:ASVS").unwrap();
        assert_eq!(asvs.members, vec!["ASVS:V1", "ASVS:V2"]);
        assert!(asvs.occurrences > asvs.members.len());
        assert_eq!(flattened.group_identity_of("ASVS:V2"), Some("group:ASVS"));

        // NIST has a single linked member, so it stays ungrouped.
        assert!(flattened.group("group:NIST").is_none());
        assert_eq!(flattened.group_identity_of("NIST:AC-1"), None);

        assert_eq!(
            flattened.taxonomy,
            vec![TaxonomyEntry {
                value: "group:ASVS".into(),
                label: "ASVS (2)".into(),
            }]
        );
    }

    #[test]
    fn densely_cross_linked_tree_is_walked_once_per_appearance() {
        use serde_json::json;

        // Every CRE embeds every standard and every standard links back to every CRE,
        // so the merged store is a complete bipartite graph in both directions.
        let n = 12;
        let back_links = (0..n)
            .map(|k| json!({ "ltype": "Related", "ref": format!("CRE:{k}") }))
            .collect::<Vec<_>>();
        let roots = (0..n)
            .map(|i| {
                let standards = (0..n)
                    .map(|j| {
                        json!({ "ltype": "Linked To", "document": {
                            "id": format!("STD:{j}"),
                            "doctype": "Standard",
                            "links": back_links,
                        } })
                    })
                    .collect::<Vec<_>>();
                json!({ "id": format!("CRE:{i}"), "doctype": "CRE", "links": standards })
            })
            .collect::<Vec<_>>();
        let tree = crate::tree::parse_tree_json(&json!(roots).to_string()).unwrap();

        let raw = collect_standards(&tree);
        assert_eq!(raw.len(), n * n);

        let flattened = flatten_tree(&tree);
        let group = flattened.group("group:STD").unwrap();
        assert_eq!(group.members.len(), n);
        assert_eq!(group.occurrences, n * n);
    }
}
