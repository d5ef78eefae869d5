//! Axum adapter for the chatgate gateway.
//!
//! Two thin protocol front ends, a legacy REST endpoint and a GraphQL
//! endpoint, share the validation and upstream-completion functions from
//! `chatgate-core`. There is no middleware chain: routing is exact
//! path/method dispatch, CORS is handled by dedicated handlers, and each
//! request is independent of every other.

pub mod cors;
pub mod graphql;
pub mod rest;
pub mod routes;
pub mod server;
pub mod state;
pub mod transport;

pub use routes::create_router;
pub use server::serve;
pub use state::AppState;
pub use transport::HttpTransport;
