//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ZEUS_*` environment variables, and config
//! files, in OrthoConfig's usual precedence.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;

fn default_bind_addr() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

/// Runtime settings for the user administration server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ZEUS")]
pub struct ServerSettings {
    /// Listen address override.
    pub bind_addr: Option<SocketAddr>,
    /// Acknowledge single-user edits that change no rows.
    #[ortho_config(default = false)]
    pub lenient_edits: bool,
    /// Preload demo users and grants into the in-memory store.
    #[ortho_config(default = true)]
    pub seed_demo_users: bool,
}

impl ServerSettings {
    /// Return the configured listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or_else(default_bind_addr)
    }
}
