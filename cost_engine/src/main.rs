//! Entry point for the Cost Engine binary.
//!
//! Running this binary starts an HTTP server that exposes the cost
//! comparison API.  A JSON rate table may be supplied via the
//! `COST_ENGINE_RATES_FILE` environment variable; if unset the built-in
//! rates are used.  The bind address comes from `COST_ENGINE_BIND_ADDR`
//! and log filtering from `RUST_LOG`.

use anyhow::{Context, Result};
use cost_engine::tax::RateTable;
use std::path::PathBuf;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    cost_engine::init_tracing();

    let rates = load_rates()?;
    let addr =
        std::env::var("COST_ENGINE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    cost_engine::api::serve(&addr, rates).await
}

fn load_rates() -> Result<RateTable> {
    let Ok(path) = std::env::var("COST_ENGINE_RATES_FILE") else {
        info!("using built-in rate table");
        return Ok(RateTable::default());
    };
    let path = PathBuf::from(path);
    if !path.is_file() {
        warn!(path = %path.display(), "rate table not found, using built-in rates");
        return Ok(RateTable::default());
    }
    let rates = RateTable::load(&path)
        .with_context(|| format!("loading rate table {}", path.display()))?;
    info!(path = %path.display(), "loaded rate table");
    Ok(rates)
}
