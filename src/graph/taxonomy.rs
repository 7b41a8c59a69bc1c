use std::collections::BTreeMap;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::tree::{DocumentType, TreeSource};

use super::flatten::Flattened;
use super::selector::ALL_OF_TYPE_PREFIX;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonomyEntry {
    /// Selector string understood by `EndpointSelector::parse`.
    pub value: String,
    pub label: String,
}

/// Dropdown contents for the two endpoint selectors, always built from the unfiltered store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Taxonomies {
    pub by_type: Vec<TaxonomyEntry>,
    pub grouped: Vec<TaxonomyEntry>,
}

pub fn build_taxonomies<S: TreeSource + ?Sized>(source: &S, flattened: &Flattened) -> Taxonomies {
    let mut type_counts: BTreeMap<DocumentType, usize> = BTreeMap::new();
    let mut individual = Vec::new();

    for document in source.documents() {
        *type_counts.entry(document.doctype).or_default() += 1;

        let key = source.stable_key(document);
        if flattened.group_identity_of(&key).is_none() {
            individual.push((document.doctype, document.name.clone(), key));
        }
    }
    individual.sort();

    let mut by_type = type_counts
        .iter()
        .map(|(doctype, count)| TaxonomyEntry {
            value: format!("{ALL_OF_TYPE_PREFIX}{}", doctype.as_str()),
            label: format!("All {} ({count})", doctype.label()),
        })
        .collect::<Vec<_>>();
    by_type.extend(individual.iter().map(|(doctype, name, key)| TaxonomyEntry {
        value: key.clone(),
        label: format!("{}: {name}", doctype.label()),
    }));

    let mut grouped = flattened.taxonomy.clone();
    grouped.extend(
        individual
            .iter()
            .filter(|(doctype, _, _)| *doctype == DocumentType::Standard)
            .map(|(_, name, key)| TaxonomyEntry {
                value: key.clone(),
                label: name.clone(),
            }),
    );

    Taxonomies { by_type, grouped }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Entries whose label or value fuzzy-matches `query`, best first; all entries for an empty query.
pub fn fuzzy_filter<'a>(
    entries: &'a [TaxonomyEntry],
    query: &str,
    limit: usize,
) -> Vec<&'a TaxonomyEntry> {
    let query = query.trim();
    if query.is_empty() {
        return entries.iter().take(limit).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let score = fuzzy_match_score(&matcher, &entry.label, query)
                .max(fuzzy_match_score(&matcher, &entry.value, query))?;
            Some((score, index, entry))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.truncate(limit);
    scored.into_iter().map(|(_, _, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::flatten::flatten_tree;
    use crate::tree::{Document, DocumentTree, LinkType};

    fn tree() -> DocumentTree {
        DocumentTree::from_documents(
            &["CRE:1"],
            vec![
                Document::new("CRE:1", "Authentication", DocumentType::Cre)
                    .with_link(LinkType::LinkedTo, "ASVS:V1")
                    .with_link(LinkType::LinkedTo, "ASVS:V2")
                    .with_link(LinkType::LinkedTo, "ZAP:1"),
                Document::new("ASVS:V1", "ASVS V1", DocumentType::Standard)
                    .with_link(LinkType::Related, "CRE:1"),
                Document::new("ASVS:V2", "ASVS V2", DocumentType::Standard)
                    .with_link(LinkType::Related, "CRE:1"),
                Document::new("ZAP:1", "ZAP scanner", DocumentType::Tool),
                Document::new("NIST:AC-1", "NIST AC-1", DocumentType::Standard),
            ],
        )
    }

    #[test]
    fn taxonomies_cover_types_groups_and_individuals() {
        let tree = tree();
        let flattened = flatten_tree(&tree);
        let taxonomies = build_taxonomies(&tree, &flattened);

        let type_values = taxonomies
            .by_type
            .iter()
            .map(|entry| entry.value.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            type_values,
            vec!["all:standard", "all:cre", "all:tool", "NIST:AC-1", "CRE:1", "ZAP:1"]
        );
        assert_eq!(taxonomies.by_type[0].label, "All Standard (3)");

        let grouped_values = taxonomies
            .grouped
            .iter()
            .map(|entry| entry.value.as_str())
            .collect::<Vec<_>>();
        assert_eq!(grouped_values, vec!["group:ASVS", "NIST:AC-1"]);
    }

    #[test]
    fn fuzzy_filter_ranks_matches() {
        let tree = tree();
        let taxonomies = build_taxonomies(&tree, &flatten_tree(&tree));

        let hits = fuzzy_filter(&taxonomies.by_type, "zap", 10);
        assert_eq!(hits.first().map(|entry| entry.value.as_str()), Some("ZAP:1"));
        assert!(fuzzy_filter(&taxonomies.by_type, "qqqq", 10).is_empty());
        assert_eq!(fuzzy_filter(&taxonomies.by_type, "  ", 2).len(), 2);
    }
}
