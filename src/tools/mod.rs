//! Storefront operations shared by the CLI and the HTTP server

pub mod catalog;
pub mod order;
pub mod products;
pub mod search;
