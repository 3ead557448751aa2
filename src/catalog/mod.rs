mod book;
#[allow(clippy::module_inception)]
mod catalog;

pub use book::{BookRecord, PopularEntry};
pub use catalog::{CacheStats, Catalog, DEFAULT_LOOKUP_CACHE_CAPACITY};
