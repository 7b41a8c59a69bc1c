mod adjacency;
mod build;
mod components;
mod flatten;
mod selector;
mod taxonomy;
mod types;

pub use adjacency::AdjacencyIndex;
pub use build::{BuildOptions, GraphBuilder};
pub use components::largest_component;
pub use selector::EndpointSelector;
pub use taxonomy::{TaxonomyEntry, fuzzy_filter};
pub use types::{Edge, EdgeKey, Graph, Node, Position};
