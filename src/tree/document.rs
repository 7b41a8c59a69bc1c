use std::collections::HashMap;
use std::fmt;

use super::outline::Outline;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentType {
    Standard,
    Cre,
    Tool,
    Unknown,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Cre => "cre",
            Self::Tool => "tool",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Cre => "CRE",
            Self::Tool => "Tool",
            Self::Unknown => "Unknown",
        }
    }

    /// Strict parse used by endpoint selectors; `None` for anything unrecognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "cre" => Some(Self::Cre),
            "tool" => Some(Self::Tool),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn from_tag(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkType {
    Contains,
    Related,
    LinkedTo,
    Same,
    Extensible,
}

impl LinkType {
    pub const ALL: [LinkType; 5] = [
        Self::Contains,
        Self::Related,
        Self::LinkedTo,
        Self::Same,
        Self::Extensible,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Related => "related",
            Self::LinkedTo => "linked-to",
            Self::Same => "same",
            Self::Extensible => "extensible",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Contains => "Contains",
            Self::Related => "Related",
            Self::LinkedTo => "Linked To",
            Self::Same => "Same",
            Self::Extensible => "Extensible",
        }
    }

    /// Accepts the display label as well as kebab/snake variants ("Linked To", "linked_to").
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '_'], "-");
        match normalized.as_str() {
            "contains" => Some(Self::Contains),
            "related" => Some(Self::Related),
            "linked-to" | "linkedto" => Some(Self::LinkedTo),
            "same" | "same-as" => Some(Self::Same),
            "extensible" | "extensible-by" => Some(Self::Extensible),
            _ => None,
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            Self::Contains => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub ltype: LinkType,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub doctype: DocumentType,
    pub links: Vec<Link>,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>, doctype: DocumentType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            doctype,
            links: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_link(mut self, ltype: LinkType, target: impl Into<String>) -> Self {
        self.links.push(Link {
            ltype,
            target: target.into(),
        });
        self
    }
}

/// Read-only view of a linked document store, walked by the flattener and the builder.
pub trait TreeSource {
    fn roots(&self) -> &[String];

    fn document(&self, id: &str) -> Option<&Document>;

    fn documents(&self) -> Box<dyn Iterator<Item = &Document> + '_>;

    /// Nesting of the source, one entry per appearance of a document.
    fn outline(&self) -> &Outline;

    /// Identity used to detect revisits; also the node identity of ungrouped documents.
    fn stable_key(&self, document: &Document) -> String {
        document.id.clone()
    }
}

impl<T: TreeSource + ?Sized> TreeSource for &T {
    fn roots(&self) -> &[String] {
        (**self).roots()
    }

    fn document(&self, id: &str) -> Option<&Document> {
        (**self).document(id)
    }

    fn documents(&self) -> Box<dyn Iterator<Item = &Document> + '_> {
        (**self).documents()
    }

    fn outline(&self) -> &Outline {
        (**self).outline()
    }

    fn stable_key(&self, document: &Document) -> String {
        (**self).stable_key(document)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DocumentTree {
    pub roots: Vec<String>,
    pub order: Vec<String>,
    pub documents: HashMap<String, Document>,
    pub outline: Outline,
}

impl DocumentTree {
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn link_count(&self) -> usize {
        self.documents.values().map(|doc| doc.links.len()).sum()
    }

    /// Registers a document, keeping the first definition but letting a later one supply links.
    pub fn insert(&mut self, document: Document) {
        match self.documents.get_mut(&document.id) {
            Some(existing) => {
                if existing.links.is_empty() && !document.links.is_empty() {
                    existing.links = document.links;
                }
            }
            None => {
                self.order.push(document.id.clone());
                self.documents.insert(document.id.clone(), document);
            }
        }
    }

    #[cfg(test)]
    pub fn from_documents(roots: &[&str], documents: Vec<Document>) -> Self {
        let mut tree = Self::default();
        for document in documents {
            tree.insert(document);
        }
        tree.roots = roots.iter().map(|root| (*root).to_owned()).collect();
        tree.outline = tree.nest_links();
        tree
    }

    /// Outline for a hand-built store: every link is written out inline below its source,
    /// except targets already on the current branch.
    #[cfg(test)]
    fn nest_links(&self) -> Outline {
        fn nest(tree: &DocumentTree, id: &str, outline: &mut Outline, branch: &mut Vec<String>) -> Option<usize> {
            let document = tree.documents.get(id)?;
            let entry = outline.push(id);
            branch.push(id.to_owned());
            for link in &document.links {
                if branch.contains(&link.target) {
                    continue;
                }
                if let Some(child) = nest(tree, &link.target, outline, branch) {
                    outline.attach(entry, child);
                }
            }
            branch.pop();
            Some(entry)
        }

        let mut outline = Outline::default();
        for root in &self.roots {
            if let Some(entry) = nest(self, root, &mut outline, &mut Vec::new()) {
                outline.add_root(entry);
            }
        }
        outline
    }
}

impl TreeSource for DocumentTree {
    fn roots(&self) -> &[String] {
        &self.roots
    }

    fn document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    fn documents(&self) -> Box<dyn Iterator<Item = &Document> + '_> {
        Box::new(self.order.iter().filter_map(|id| self.documents.get(id)))
    }

    fn outline(&self) -> &Outline {
        &self.outline
    }
}
