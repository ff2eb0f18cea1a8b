//! Catalog pipeline crate.
//!
//! Merges local annotations into the fetched wine list, filters and sorts
//! it for display, and manages the user's ratings and notes.

pub mod annotations;
pub mod catalog;
pub mod engine;
pub mod enrich;
pub mod links;
pub mod paginate;

pub use annotations::{AnnotationStore, AnnotationUpdate};
pub use catalog::{Catalog, CatalogView};
pub use engine::{parse_leading_float, process, SortKey, ViewState};
pub use enrich::enrich;
pub use links::detail_url;
pub use paginate::{paginate, Page};
