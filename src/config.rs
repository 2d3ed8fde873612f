//! Startup configuration read from environment variables.
//!
//! | Variable                 | Default                |
//! |--------------------------|------------------------|
//! | `STACKS`                 | `all`                  |
//! | `BIND_ADDRESS`           | `0.0.0.0`              |
//! | `PORT`                   | `9091`                 |
//! | `POLL_INTERVAL_SECONDS`  | `30`                   |
//! | `MAX_CONCURRENT_FETCHES` | `32`                   |
//! | `DOCKER_SOCKET`          | `/var/run/docker.sock` |
//!
//! `STACKS` selects the exported containers, see [`NameFilter`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::collector::DEFAULT_MAX_CONCURRENT_FETCHES;
use crate::container::NameFilter;
use crate::docker::DEFAULT_SOCKET_PATH;
use crate::snapshot::DEFAULT_POLL_INTERVAL;

pub const STACKS: &str = "STACKS";
pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
pub const PORT: &str = "PORT";
pub const POLL_INTERVAL_SECONDS: &str = "POLL_INTERVAL_SECONDS";
pub const MAX_CONCURRENT_FETCHES: &str = "MAX_CONCURRENT_FETCHES";
pub const DOCKER_SOCKET: &str = "DOCKER_SOCKET";

const DEFAULT_BIND_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 9091;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid address in `{variable}`: {value:?}: {source}")]
    InvalidAddress {
        variable: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid number in `{variable}`: {value:?}: {source}")]
    InvalidNumber {
        variable: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("`{variable}` must be greater than zero")]
    Zero { variable: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub filter: NameFilter,
    pub bind_address: IpAddr,
    pub port: u16,
    pub poll_interval: Duration,
    pub max_concurrent_fetches: usize,
    pub docker_socket: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: NameFilter::All,
            bind_address: DEFAULT_BIND_ADDRESS,
            port: DEFAULT_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            docker_socket: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, using the defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that cannot be parsed, or if the poll
    /// interval or the concurrency bound is zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(stacks) = lookup(STACKS) {
            config.filter = match NameFilter::from_str(&stacks) {
                Ok(filter) => filter,
                Err(never) => match never {},
            };
        }
        if let Some(value) = lookup(BIND_ADDRESS) {
            config.bind_address =
                value
                    .trim()
                    .parse()
                    .map_err(|source| Error::InvalidAddress {
                        variable: BIND_ADDRESS,
                        value,
                        source,
                    })?;
        }
        if let Some(value) = lookup(PORT) {
            config.port = parse_number(PORT, value)?;
        }
        if let Some(value) = lookup(POLL_INTERVAL_SECONDS) {
            let seconds: u64 = parse_number(POLL_INTERVAL_SECONDS, value)?;
            if seconds == 0 {
                return Err(Error::Zero {
                    variable: POLL_INTERVAL_SECONDS,
                });
            }
            config.poll_interval = Duration::from_secs(seconds);
        }
        if let Some(value) = lookup(MAX_CONCURRENT_FETCHES) {
            config.max_concurrent_fetches = parse_number(MAX_CONCURRENT_FETCHES, value)?;
            if config.max_concurrent_fetches == 0 {
                return Err(Error::Zero {
                    variable: MAX_CONCURRENT_FETCHES,
                });
            }
        }
        if let Some(value) = lookup(DOCKER_SOCKET).filter(|value| !value.trim().is_empty()) {
            config.docker_socket = PathBuf::from(value);
        }

        Ok(config)
    }

    /// Address the metrics endpoint listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

fn parse_number<T>(variable: &'static str, value: String) -> Result<T>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    match value.trim().parse() {
        Ok(number) => Ok(number),
        Err(source) => Err(Error::InvalidNumber {
            variable,
            value,
            source,
        }),
    }
}
