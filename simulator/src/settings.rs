//! Simulator settings read from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use log::warn;

/// Address the config page listens on.
pub const HTTP_ADDR_VAR: &str = "GAUGE_HTTP_ADDR";
/// File holding the persisted configuration snapshot.
pub const STORE_PATH_VAR: &str = "GAUGE_STORE_PATH";

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_STORE_PATH: &str = "gauge_cfg.bin";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub http_addr: SocketAddr,
    pub store_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self { Self::from_lookup(|name| env::var(name).ok()) }

    /// Build settings from any variable lookup. Unparsable addresses fall
    /// back to the default.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let default_addr = default_http_addr();
        let http_addr = match lookup(HTTP_ADDR_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("{HTTP_ADDR_VAR}={raw} is not a socket address, using {default_addr}");
                default_addr
            }),
            None => default_addr,
        };
        let store_path = lookup(STORE_PATH_VAR).map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);
        Self { http_addr, store_path }
    }
}

fn default_http_addr() -> SocketAddr { SocketAddr::from(([127, 0, 0, 1], 8080)) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.http_addr.to_string(), DEFAULT_HTTP_ADDR);
        assert_eq!(settings.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(|name| match name {
            HTTP_ADDR_VAR => Some("0.0.0.0:9000".into()),
            STORE_PATH_VAR => Some("/tmp/cfg.bin".into()),
            _ => None,
        });
        assert_eq!(settings.http_addr.port(), 9000);
        assert_eq!(settings.store_path, PathBuf::from("/tmp/cfg.bin"));
    }

    #[test]
    fn test_bad_address_falls_back() {
        let settings = Settings::from_lookup(|name| (name == HTTP_ADDR_VAR).then(|| "not an address".into()));
        assert_eq!(settings.http_addr.to_string(), DEFAULT_HTTP_ADDR);
    }
}
