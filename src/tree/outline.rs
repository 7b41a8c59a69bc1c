/// One appearance of a document in the nested source; documents embedded under it are children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    pub id: String,
    pub children: Vec<usize>,
}

/// Nesting of the source exactly as written, one entry per appearance.
///
/// Every entry has at most one parent, so the outline stays a forest even when the
/// merged store is densely cross-linked.
#[derive(Clone, Debug, Default)]
pub struct Outline {
    entries: Vec<OutlineEntry>,
    roots: Vec<usize>,
}

impl Outline {
    pub fn push(&mut self, id: impl Into<String>) -> usize {
        self.entries.push(OutlineEntry {
            id: id.into(),
            children: Vec::new(),
        });
        self.entries.len() - 1
    }

    pub fn attach(&mut self, parent: usize, child: usize) {
        if let Some(entry) = self.entries.get_mut(parent) {
            entry.children.push(child);
        }
    }

    pub fn add_root(&mut self, entry: usize) {
        self.roots.push(entry);
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn entry(&self, index: usize) -> Option<&OutlineEntry> {
        self.entries.get(index)
    }

    pub fn appearance_count(&self) -> usize {
        self.entries.len()
    }
}
