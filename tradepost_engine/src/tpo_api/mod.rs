//! The public API objects of the engine.
//!
//! Each API object wraps a backend implementing the relevant trait and exposes the operations the server calls.
//! They are generic over the backend, so the server's endpoint tests can swap in mocks.
pub mod auth_api;
pub mod catalog_api;
pub mod order_flow_api;
