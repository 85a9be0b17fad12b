//! Typo-tolerant product search
//!
//! Keyword generation and edit-distance scoring feed a matcher that ranks the
//! products of the searchable categories against a short user query.

pub mod keywords;
pub mod matcher;
pub mod similarity;


pub use matcher::{Matcher, SearchMatch};
