mod hierarchy;
mod parse;
mod reformat;
mod source;

pub use hierarchy::{Hierarchy, HierarchyNode, StructureError};
pub use reformat::FlatRecord;
pub use source::DocumentSource;
