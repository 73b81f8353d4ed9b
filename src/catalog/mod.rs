mod load;
mod parse;
mod record;

pub use load::load_catalog;
pub use record::{Catalog, CatalogTotals, Item, Stats, Visibility};
