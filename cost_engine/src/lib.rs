//! Cost Engine library crate.
//!
//! This crate exposes the employment cost comparison engine behind the
//! outstaffing calculator: four cost models (staff, civil contract,
//! self-employed, outstaffing), the savings comparison between them,
//! presentation helpers and an HTTP API.  Callers may use
//! `engine::compare_models` directly or embed the API via
//! `api::build_router`.

pub mod api;
pub mod engine;
pub mod error;
pub mod format;
pub mod models;
pub mod normalize;
pub mod tax;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global tracing subscriber.  The filter comes from
/// `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
