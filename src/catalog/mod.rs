// Remote media catalog: fetch, enrich, filter, publish

pub mod fetcher;
pub mod filter;
pub mod store;

pub use fetcher::{CatalogFetcher, CatalogSnapshot};
pub use filter::{category_options, filter_by_category, CategoryOption};
pub use store::{CatalogStore, CatalogView};
