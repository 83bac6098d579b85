use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::debug;
use user_migration_shared::LegacyUser;

use crate::errors::LegacySourceError;
use crate::interfaces::{LegacySource, QUALIFYING_TRACK_STATUSES};

/// Settings for reading the legacy schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlSourceConfig {
    /// Prefix of the WordPress tables, e.g. `wp_`.
    pub table_prefix: String,
    /// Accounts whose email ends in `@{native_email_domain}` are not migrated.
    pub native_email_domain: String,
}

impl Default for MySqlSourceConfig {
    fn default() -> Self {
        Self {
            table_prefix: "wp_".to_string(),
            native_email_domain: "resonate.is".to_string(),
        }
    }
}

/// MySQL-backed legacy source.
///
/// All queries are built once at construction; only values are bound per call.
pub struct MySqlLegacySource {
    pool: MySqlPool,
    native_email_pattern: String,
    users_query: String,
    meta_query: String,
    activity_query: String,
}

impl MySqlLegacySource {
    /// Creates a legacy source over an existing pool.
    ///
    /// # Returns
    ///
    /// * `Ok(MySqlLegacySource)` - Ready-to-use source
    /// * `Err(LegacySourceError::InvalidTablePrefix)` - The prefix contains characters
    ///   other than ASCII alphanumerics and `_`
    pub fn new(pool: MySqlPool, config: MySqlSourceConfig) -> Result<Self, LegacySourceError> {
        let prefix = &config.table_prefix;
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(LegacySourceError::InvalidTablePrefix(prefix.clone()));
        }

        let statuses = QUALIFYING_TRACK_STATUSES
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            pool,
            native_email_pattern: native_email_pattern(&config.native_email_domain),
            users_query: format!(
                "SELECT ID, user_email, user_pass FROM {prefix}users WHERE user_email NOT LIKE ? ESCAPE '!' ORDER BY ID"
            ),
            meta_query: format!(
                "SELECT meta_value FROM {prefix}usermeta WHERE user_id = ? AND meta_key = ? ORDER BY umeta_id LIMIT 1"
            ),
            activity_query: format!(
                "SELECT 1 AS found FROM tracks WHERE uid = ? AND status IN ({statuses}) LIMIT 1"
            ),
        })
    }

    /// Connects to MySQL and creates a legacy source.
    pub async fn connect(url: &str, config: MySqlSourceConfig) -> Result<Self, LegacySourceError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect(url)
            .await?;
        Self::new(pool, config)
    }
}

/// Escape character of the native email `LIKE` pattern. Unlike a backslash it
/// reads the same with or without the `NO_BACKSLASH_ESCAPES` SQL mode.
const LIKE_ESCAPE: char = '!';

/// Builds the `LIKE` pattern matching every address in `domain`.
///
/// `%`, `_` and the escape character in the domain are escaped so they match
/// literally.
fn native_email_pattern(domain: &str) -> String {
    let mut pattern = String::with_capacity(domain.len() + 2);
    pattern.push_str("%@");
    for c in domain.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern
}

#[async_trait]
impl LegacySource for MySqlLegacySource {
    async fn fetch_candidate_users(&self) -> Result<Vec<LegacyUser>, LegacySourceError> {
        let rows = sqlx::query(&self.users_query)
            .bind(&self.native_email_pattern)
            .fetch_all(&self.pool)
            .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(LegacyUser {
                id: row.try_get("ID")?,
                email: row.try_get("user_email")?,
                password: row.try_get("user_pass")?,
            });
        }

        debug!(count = users.len(), "Fetched candidate legacy users");
        Ok(users)
    }

    async fn lookup_meta(
        &self,
        user: &LegacyUser,
        key: &str,
    ) -> Result<Option<String>, LegacySourceError> {
        let row = sqlx::query(&self.meta_query)
            .bind(user.id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_get::<Option<String>, _>("meta_value")?),
            None => Ok(None),
        }
    }

    async fn has_qualifying_activity(&self, user: &LegacyUser) -> Result<bool, LegacySourceError> {
        let row = sqlx::query(&self.activity_query)
            .bind(user.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}
