use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024;
pub const DEFAULT_OUTBOUND_QUEUE: usize = 64;
pub const DEFAULT_LOG_FILTER: &str = "pairchat=debug,tower_http=debug,axum=info,warn";
pub const DEFAULT_JAEGER_ENDPOINT: &str = "http://jaeger:14268/api/traces";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub max_frame_bytes: usize,
    /// Frames buffered per connection before further sends are dropped.
    pub outbound_queue: usize,
    pub log_filter: String,
    pub enable_telemetry: bool,
    pub jaeger_endpoint: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            outbound_queue: DEFAULT_OUTBOUND_QUEUE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            enable_telemetry: false,
            jaeger_endpoint: DEFAULT_JAEGER_ENDPOINT.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Missing or unparseable
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::new();

        let host = lookup("PAIRCHAT_HOST")
            .and_then(|v| v.parse::<IpAddr>().ok())
            .unwrap_or(defaults.bind_address.ip());
        let port = lookup("PAIRCHAT_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.bind_address.port());

        Self {
            bind_address: SocketAddr::new(host, port),
            max_frame_bytes: lookup("PAIRCHAT_MAX_FRAME_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_frame_bytes),
            outbound_queue: lookup("PAIRCHAT_OUTBOUND_QUEUE")
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.outbound_queue),
            log_filter: lookup("PAIRCHAT_LOG").unwrap_or(defaults.log_filter),
            enable_telemetry: lookup("ENABLE_TELEMETRY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_telemetry),
            jaeger_endpoint: lookup("JAEGER_ENDPOINT").unwrap_or(defaults.jaeger_endpoint),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address.port(), 4000);
        assert!(!config.enable_telemetry);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("PAIRCHAT_HOST", "127.0.0.1"),
            ("PAIRCHAT_PORT", "9000"),
            ("PAIRCHAT_MAX_FRAME_BYTES", "1024"),
            ("PAIRCHAT_OUTBOUND_QUEUE", "8"),
            ("PAIRCHAT_LOG", "info"),
            ("ENABLE_TELEMETRY", "true"),
            ("JAEGER_ENDPOINT", "http://localhost:14268/api/traces"),
        ]));

        assert_eq!(config.bind_address, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.max_frame_bytes, 1024);
        assert_eq!(config.outbound_queue, 8);
        assert_eq!(config.log_filter, "info");
        assert!(config.enable_telemetry);
        assert_eq!(config.jaeger_endpoint, "http://localhost:14268/api/traces");
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PAIRCHAT_HOST", "not-an-ip"),
            ("PAIRCHAT_PORT", "99999"),
            ("ENABLE_TELEMETRY", "yes"),
            ("PAIRCHAT_OUTBOUND_QUEUE", "0"),
        ]));

        assert_eq!(config.bind_address, Config::new().bind_address);
        assert_eq!(config.outbound_queue, DEFAULT_OUTBOUND_QUEUE);
        assert!(!config.enable_telemetry);
    }
}
