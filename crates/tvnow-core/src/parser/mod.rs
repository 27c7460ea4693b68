//! JSON parsers for the TV NOW API
//!
//! Contains modules for parsing the catalog listing and program detail
//! documents, plus the lenient field parsers they share.

pub mod catalog;
pub mod fields;
pub mod program;

pub use catalog::{CatalogPage, Pagination, parse_catalog_page};
pub use fields::{parse_duration, parse_publish_date};
pub use program::{extract_movie, parse_program};
