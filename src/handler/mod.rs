//! Request handler module
//!
//! Routing dispatch plus the page and API handlers behind it.

pub mod api;
pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::{handle_request, ROUTES};
