//! Command-line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::middleware::Latency;

/// Serve todo-lists stored as JSON files.
#[derive(Debug, Parser)]
#[command(name = "todostore", version, about)]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Address to bind to.
    #[arg(long, env = "TODOSTORE_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Directory holding one `<id>.json` file per list. Created if missing.
    #[arg(long, env = "TODOSTORE_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Delay every response to emulate a slow backend.
    #[arg(long, env = "TODOSTORE_SIMULATE_LATENCY")]
    pub simulate_latency: bool,

    /// Fixed part of the simulated delay, in milliseconds.
    #[arg(long, env = "TODOSTORE_LATENCY_BASE_MS", default_value_t = 500)]
    pub latency_base_ms: u64,

    /// Upper bound of the random part of the simulated delay, in milliseconds.
    #[arg(long, env = "TODOSTORE_LATENCY_SPREAD_MS", default_value_t = 1000)]
    pub latency_spread_ms: u64,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The latency layer, if enabled.
    pub fn latency(&self) -> Option<Latency> {
        self.simulate_latency.then(|| {
            Latency::new(
                Duration::from_millis(self.latency_base_ms),
                Duration::from_millis(self.latency_spread_ms),
            )
        })
    }
}
