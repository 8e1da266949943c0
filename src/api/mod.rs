mod catalog;

pub use catalog::{HttpCatalog, Product, ProductSearch, SearchError, StaticCatalog};
