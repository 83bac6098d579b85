use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use user_migration_shared::{GroupType, NewTargetUser, NewUserGroup, TargetUser, UserGroup};
use uuid::Uuid;

use crate::errors::TargetStoreError;
use crate::interfaces::TargetStore;

const USER_COLUMNS: &str = "id, username, password, role_id, legacy_id, country, tenant_id, member";
const GROUP_COLUMNS: &str = "id, owner_id, display_name, type_id";

/// PostgreSQL-backed target store.
///
/// Every method runs a single statement against the pool, so each write is
/// atomic on its own but a run as a whole is not.
pub struct PostgresTargetStore {
    pool: PgPool,
}

impl PostgresTargetStore {
    /// Creates a new PostgreSQL target store.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the target schema
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to PostgreSQL and creates a target store.
    pub async fn connect(url: &str) -> Result<Self, TargetStoreError> {
        let pool = PgPoolOptions::new().max_connections(2).connect(url).await?;
        Ok(Self::new(pool))
    }
}

fn user_from_row(row: &PgRow) -> Result<TargetUser, sqlx::Error> {
    Ok(TargetUser {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        role_id: row.try_get("role_id")?,
        legacy_id: row.try_get("legacy_id")?,
        country: row.try_get("country")?,
        tenant_id: row.try_get("tenant_id")?,
        member: row.try_get("member")?,
    })
}

fn group_from_row(row: &PgRow) -> Result<UserGroup, sqlx::Error> {
    Ok(UserGroup {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        display_name: row.try_get("display_name")?,
        type_id: row.try_get("type_id")?,
    })
}

#[async_trait]
impl TargetStore for PostgresTargetStore {
    async fn count_users(&self) -> Result<i64, TargetStoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn group_types(&self) -> Result<Vec<GroupType>, TargetStoreError> {
        let rows = sqlx::query("SELECT id, name FROM group_types ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        let mut group_types = Vec::with_capacity(rows.len());
        for row in rows {
            group_types.push(GroupType {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            });
        }
        Ok(group_types)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<TargetUser>, TargetStoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1 LIMIT 1");
        let row = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn insert_user(&self, user: &NewTargetUser) -> Result<Uuid, TargetStoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, password, role_id, legacy_id, country, tenant_id, member)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.role_id)
        .bind(user.legacy_id)
        .bind(&user.country)
        .bind(user.tenant_id)
        .bind(user.member)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_user(&self, user: &NewTargetUser) -> Result<(), TargetStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $2,
                role_id = $3,
                legacy_id = $4,
                country = $5,
                tenant_id = $6,
                member = $7
            WHERE username = $1
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.role_id)
        .bind(user.legacy_id)
        .bind(&user.country)
        .bind(user.tenant_id)
        .bind(user.member)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TargetStoreError::UserNotFound(user.username.clone()));
        }
        Ok(())
    }

    async fn find_group_by_display_name(
        &self,
        display_name: &str,
    ) -> Result<Option<UserGroup>, TargetStoreError> {
        let query =
            format!("SELECT {GROUP_COLUMNS} FROM user_groups WHERE display_name = $1 LIMIT 1");
        let row = sqlx::query(&query)
            .bind(display_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(group_from_row).transpose()?)
    }

    async fn find_group_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<UserGroup>, TargetStoreError> {
        let query = format!("SELECT {GROUP_COLUMNS} FROM user_groups WHERE owner_id = $1 LIMIT 1");
        let row = sqlx::query(&query)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(group_from_row).transpose()?)
    }

    async fn insert_group(&self, group: &NewUserGroup) -> Result<Uuid, TargetStoreError> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO user_groups (owner_id, display_name, type_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(group.owner_id)
        .bind(&group.display_name)
        .bind(group.type_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_group(&self, id: Uuid, group: &NewUserGroup) -> Result<(), TargetStoreError> {
        let result =
            sqlx::query("UPDATE user_groups SET display_name = $2, type_id = $3 WHERE id = $1")
                .bind(id)
                .bind(&group.display_name)
                .bind(group.type_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(TargetStoreError::GroupNotFound(id));
        }
        Ok(())
    }
}
