//! HTTP API for the ballot service.
//!
//! Provides endpoints for:
//! - Candidate listing, creation, and deletion
//! - Vote casting
//! - The caller's own voter record
//! - Per-race results and the tally audit
//! - Health and Prometheus metrics
//!
//! Identity is asserted upstream and forwarded in request headers; see
//! [`auth`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod pagination;
pub mod server;

pub use auth::{Admin, Caller, VOTER_ID_HEADER, VOTER_ROLE_HEADER};
pub use error::RpcError;
pub use metrics::ApiMetrics;
pub use server::{router, AppState, RpcServer, StoreBackend};
