//! SmartAudit HTTP API Module
//! REST API for contract probing, verified source retrieval, and AI analysis

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use routes::create_router;
pub use types::*;
