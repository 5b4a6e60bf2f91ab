pub mod abort;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;

// Domain data shapes shared across layers
pub mod domain;

// Use cases and the ports they depend on
pub mod app;

// Concrete adapters: content store, session storage, address, share targets
pub mod infra;

pub mod observability;
pub mod render;
