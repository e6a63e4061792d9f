pub mod catalog;
pub mod entry;
pub mod ops;

pub use catalog::Catalog;
pub use entry::Entry;
