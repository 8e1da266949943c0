mod location;
mod search;

pub use location::{Location, SearchSync};
pub use search::{FilterUpdate, SearchFilters, SearchState, SearchStore};
