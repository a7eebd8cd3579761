//! HTTP server module for the patch planner backend.
//!
//! Thin axum layer over the planner: request parsing and validation, JSON
//! serialization, CORS, compression and error mapping. All algorithmic work
//! lives in [`crate::planner`]; handlers only validate input, call the
//! engine against the shared read-only catalog, and shape the response.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
