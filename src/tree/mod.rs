mod document;
mod load;
mod outline;
mod parse;

pub use document::{Document, DocumentTree, DocumentType, LinkType, TreeSource};
pub use load::load_tree;
pub use outline::OutlineEntry;
#[cfg(test)]
pub(crate) use parse::parse_tree_json;
