//! Faculty search: query building and the debounced request session.

pub mod query;
pub mod scheduler;

pub use query::{build_query, FacultyFilters, Pagination, QueryParams};
pub use scheduler::{FacultySearch, FacultySource};
