mod catalog;
mod source;

pub use catalog::{Catalog, Layers};
pub use source::{DiskStore, MemStore, Store};
