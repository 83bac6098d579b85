//! Run settings read from the process environment.

use std::env;
use std::str::FromStr;

use tracing::info;
use url::Url;
use user_migration_pipeline::{GroupMatchKey, NicknameLookupPolicy, ReconcilerConfig};
use user_migration_repository::MySqlSourceConfig;

use crate::MigrationError;

const DEFAULT_POSTGRES_USER: &str = "resonate_test_user";
const DEFAULT_POSTGRES_PASSWORD: &str = "password";
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: u16 = 5432;
const DEFAULT_POSTGRES_NAME: &str = "resonate_test";

const DEFAULT_MYSQL_USER: &str = "resonate_is";
const DEFAULT_MYSQL_PASSWORD: &str = "";
const DEFAULT_MYSQL_HOST: &str = "localhost";
const DEFAULT_MYSQL_PORT: u16 = 3307;
const DEFAULT_MYSQL_NAME: &str = "resonate_is";

const DEFAULT_REMOTE_HOST: &str = "resonate.is";
const DEFAULT_REMOTE_USER: &str = "resonate_is";
const DEFAULT_TUNNEL_LOCAL_PORT: u16 = 3307;
const DEFAULT_TUNNEL_REMOTE_PORT: u16 = 3306;

const DEFAULT_TABLE_PREFIX: &str = "wp_";
const DEFAULT_NATIVE_EMAIL_DOMAIN: &str = "resonate.is";

/// Connection parameters of one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl DatabaseSettings {
    /// Builds a connection URL for `scheme`, percent-encoding the credentials.
    pub fn url(&self, scheme: &str) -> Result<String, MigrationError> {
        let base = format!("{scheme}://{}:{}/{}", self.host, self.port, self.name);
        let mut url = Url::parse(&base)
            .map_err(|e| MigrationError::config(format!("Invalid {scheme} address: {e}")))?;

        url.set_username(&self.user)
            .map_err(|_| MigrationError::config(format!("Cannot set {scheme} user")))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| MigrationError::config(format!("Cannot set {scheme} password")))?;
        }

        Ok(url.into())
    }
}

/// Port forward to the legacy database host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelSettings {
    pub remote_host: String,
    pub remote_user: String,
    pub local_port: u16,
    pub remote_port: u16,
}

/// Everything a migration run needs to know before connecting anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationSettings {
    pub postgres: DatabaseSettings,
    pub mysql: DatabaseSettings,
    /// `None` when `SSH_TUNNEL_ENABLED=false`.
    pub tunnel: Option<TunnelSettings>,
    pub source: MySqlSourceConfig,
    pub reconciler: ReconcilerConfig,
}

impl MigrationSettings {
    /// Reads the settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `POSTGRES_DB_USER` / `_PASSWORD` / `_HOST` / `_PORT` / `_NAME`
    /// - `MYSQL_DB_USER` / `_PASSWORD` / `_HOST` / `_PORT` / `_NAME`
    /// - `RESONATE_REMOTE_HOST`, `RESONATE_REMOTE_USER`: ssh destination
    /// - `SSH_TUNNEL_ENABLED` (default: true)
    /// - `SSH_TUNNEL_LOCAL_PORT` (default: 3307), `SSH_TUNNEL_REMOTE_PORT` (default: 3306)
    /// - `WP_TABLE_PREFIX` (default: wp_)
    /// - `NATIVE_EMAIL_DOMAIN` (default: resonate.is)
    /// - `GROUP_MATCH_KEY`: "display-name" or "owner" (default: display-name)
    /// - `NICKNAME_LOOKUP_FAILURE`: "fatal" or "skip" (default: fatal)
    ///
    /// Empty variables count as unset.
    pub fn from_env() -> Result<Self, MigrationError> {
        let settings = Self::from_lookup(|key| env::var(key).ok())?;

        info!(
            postgres_host = %settings.postgres.host,
            postgres_db = %settings.postgres.name,
            mysql_host = %settings.mysql.host,
            mysql_port = settings.mysql.port,
            tunnel = settings.tunnel.is_some(),
            table_prefix = %settings.source.table_prefix,
            group_match_key = ?settings.reconciler.group_match_key,
            nickname_lookup_failure = ?settings.reconciler.nickname_lookup_failure,
            "Loaded migration settings"
        );

        Ok(settings)
    }

    /// Reads the settings through `lookup`, which returns a variable's value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MigrationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let postgres = DatabaseSettings {
            user: vars.string("POSTGRES_DB_USER", DEFAULT_POSTGRES_USER),
            password: vars.string("POSTGRES_DB_PASSWORD", DEFAULT_POSTGRES_PASSWORD),
            host: vars.string("POSTGRES_DB_HOST", DEFAULT_POSTGRES_HOST),
            port: vars.parse("POSTGRES_DB_PORT", DEFAULT_POSTGRES_PORT)?,
            name: vars.string("POSTGRES_DB_NAME", DEFAULT_POSTGRES_NAME),
        };

        let mysql = DatabaseSettings {
            user: vars.string("MYSQL_DB_USER", DEFAULT_MYSQL_USER),
            password: vars.string("MYSQL_DB_PASSWORD", DEFAULT_MYSQL_PASSWORD),
            host: vars.string("MYSQL_DB_HOST", DEFAULT_MYSQL_HOST),
            port: vars.parse("MYSQL_DB_PORT", DEFAULT_MYSQL_PORT)?,
            name: vars.string("MYSQL_DB_NAME", DEFAULT_MYSQL_NAME),
        };

        let tunnel = if vars.flag("SSH_TUNNEL_ENABLED", true)? {
            Some(TunnelSettings {
                remote_host: vars.string("RESONATE_REMOTE_HOST", DEFAULT_REMOTE_HOST),
                remote_user: vars.string("RESONATE_REMOTE_USER", DEFAULT_REMOTE_USER),
                local_port: vars.parse("SSH_TUNNEL_LOCAL_PORT", DEFAULT_TUNNEL_LOCAL_PORT)?,
                remote_port: vars.parse("SSH_TUNNEL_REMOTE_PORT", DEFAULT_TUNNEL_REMOTE_PORT)?,
            })
        } else {
            None
        };

        let source = MySqlSourceConfig {
            table_prefix: vars.string("WP_TABLE_PREFIX", DEFAULT_TABLE_PREFIX),
            native_email_domain: vars.string("NATIVE_EMAIL_DOMAIN", DEFAULT_NATIVE_EMAIL_DOMAIN),
        };

        let reconciler = ReconcilerConfig {
            group_match_key: vars.parse("GROUP_MATCH_KEY", GroupMatchKey::default())?,
            nickname_lookup_failure: vars
                .parse("NICKNAME_LOOKUP_FAILURE", NicknameLookupPolicy::default())?,
        };

        Ok(Self {
            postgres,
            mysql,
            tunnel,
            source,
            reconciler,
        })
    }

    pub fn postgres_url(&self) -> Result<String, MigrationError> {
        self.postgres.url("postgres")
    }

    pub fn mysql_url(&self) -> Result<String, MigrationError> {
        self.mysql.url("mysql")
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, key: &str, default: T) -> Result<T, MigrationError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|e| MigrationError::config(format!("{key}: {e}"))),
            None => Ok(default),
        }
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, MigrationError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };

        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(MigrationError::config(format!(
                "{key}: expected true or false, got {other}"
            ))),
        }
    }
}
