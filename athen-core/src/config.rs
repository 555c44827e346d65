//! Host configuration types
//!
//! This module defines the configuration the host needs once it has been
//! read from disk. Locating and parsing `Athen.toml` is handled by the
//! application layer.

use crate::types::{AthenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port used when the configuration does not set one
pub const DEFAULT_PORT: u16 = 8000;

/// Configuration for a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Address to bind
    pub ip: IpAddr,

    /// Port to bind (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Serve requests one at a time on the accept thread (default: true)
    #[serde(default = "default_true")]
    pub safe_async: bool,

    /// Documents to mount, in mount order
    #[serde(default)]
    pub documents: Vec<DocumentBinding>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            safe_async: true,
            documents: Vec::new(),
        }
    }
}

/// Route name to catalog entry binding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentBinding {
    /// Route name, served under `/<route>`
    pub route: String,
    /// Catalog key of the installer
    pub entry: String,
}

impl DocumentBinding {
    pub fn new(route: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            entry: entry.into(),
        }
    }
}

impl HostConfig {
    /// Create a new host configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set bind address and port
    pub fn with_address(mut self, ip: IpAddr, port: u16) -> Self {
        self.ip = ip;
        self.port = port;
        self
    }

    /// Builder method: choose sequential or threaded request handling
    pub fn with_safe_async(mut self, enabled: bool) -> Self {
        self.safe_async = enabled;
        self
    }

    /// Builder method: mount catalog entry `entry` at `/<route>`
    pub fn add_document(mut self, route: impl Into<String>, entry: impl Into<String>) -> Self {
        self.documents.push(DocumentBinding::new(route, entry));
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    /// Check route names: non-empty, a single path segment, unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for binding in &self.documents {
            let route = binding.route.as_str();
            if route.is_empty() || route.contains('/') {
                return Err(AthenError::InvalidConfig(format!(
                    "document route must be a single non-empty path segment, got {:?}",
                    route
                )));
            }
            if !seen.insert(route) {
                return Err(AthenError::DuplicateDocument(route.to_string()));
            }
        }
        Ok(())
    }
}
