use crate::backend::BackendConfig;
use std::{collections::HashMap, net::SocketAddr, str::FromStr};
use thiserror::Error;

pub const ADDR_VAR: &str = "MPRIS_REMOTE_ADDR";
pub const BACKEND_VAR: &str = "MPRIS_REMOTE_BACKEND";
pub const PLAYER_VAR: &str = "MPRIS_REMOTE_PLAYER";
pub const USERS_VAR: &str = "MPRIS_REMOTE_USERS";

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BACKEND: &str = "dbus";
const DEFAULT_PLAYER: &str = "spotify";

pub type Users = HashMap<String, String>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid MPRIS_REMOTE_ADDR {0:?}: {1}")]
    InvalidAddr(String, std::net::AddrParseError),
    #[error("invalid entry {0:?} in MPRIS_REMOTE_USERS, expected user:password")]
    InvalidUser(String),
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub backend: String,
    pub backend_config: BackendConfig,
    /// `None` disables authentication.
    pub users: Option<Users>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_owned());
        let addr = SocketAddr::from_str(&addr).map_err(|e| ConfigError::InvalidAddr(addr, e))?;
        let backend = lookup(BACKEND_VAR).unwrap_or_else(|| {
            tracing::info!("{BACKEND_VAR} not provided, defaulting to {DEFAULT_BACKEND}");
            DEFAULT_BACKEND.to_owned()
        });
        let player = lookup(PLAYER_VAR).unwrap_or_else(|| DEFAULT_PLAYER.to_owned());
        let users = lookup(USERS_VAR)
            .map(|users| parse_users(&users))
            .transpose()?
            .filter(|users| !users.is_empty());
        Ok(Self {
            addr,
            backend,
            backend_config: BackendConfig { player },
            users,
        })
    }
}

/// Parses `user:password` pairs separated by commas. The password may itself
/// contain colons.
pub fn parse_users(value: &str) -> Result<Users, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((user, password)) if !user.is_empty() => {
                Ok((user.to_owned(), password.to_owned()))
            }
            _ => Err(ConfigError::InvalidUser(entry.to_owned())),
        })
        .collect()
}
