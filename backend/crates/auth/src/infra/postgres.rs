//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::entity::{
    identity::Identity, reset_grant::ResetGrant, session_token::SessionToken,
};
use crate::domain::repository::{CredentialRepository, SessionTokenRepository};
use crate::domain::value_object::{
    email::Email,
    session_token_value::SessionTokenValue,
    user_id::{ResetTokenId, SessionTokenId, UserId},
    user_password::UserPassword,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential and token store
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn update_password(
        conn: &mut PgConnection,
        user_id: &UserId,
        token: &ResetTokenId,
        new_password: &UserPassword,
    ) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $3, updated_at = now()
            WHERE id = $1
              AND deleted_at IS NULL
              AND reset_token = $2
              AND reset_token_expiry > now()
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(token.as_uuid())
        .bind(new_password.as_phc_string())
        .execute(&mut *conn)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn revoke_tokens(conn: &mut PgConnection, user_id: &UserId) -> AuthResult<u64> {
        let revoked = sqlx::query(
            r#"
            UPDATE session_tokens
            SET deleted_at = now(), updated_at = now()
            WHERE user_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&mut *conn)
        .await?
        .rows_affected();

        Ok(revoked)
    }

    async fn clear_reset_token(conn: &mut PgConnection, user_id: &UserId) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token = NULL, reset_token_expiry = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

/// A taken email surfaces as a unique violation on the partial index
fn map_unique_email(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UserAlreadyExists,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn create_identity(&self, identity: &Identity) -> AuthResult<()> {
        let (reset_token, reset_token_expiry) = grant_columns(identity.reset_grant.as_ref());

        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                email,
                password_hash,
                first_name,
                last_name,
                role,
                wallet_id,
                reset_token,
                reset_token_expiry,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(identity.user_id.as_uuid())
        .bind(identity.email.as_str())
        .bind(identity.password.as_phc_string())
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.role.code())
        .bind(identity.wallet_id.as_deref())
        .bind(reset_token)
        .bind(reset_token_expiry)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_email)?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                first_name,
                last_name,
                role,
                wallet_id,
                reset_token,
                reset_token_expiry,
                created_at,
                updated_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                first_name,
                last_name,
                role,
                wallet_id,
                reset_token,
                reset_token_expiry,
                created_at,
                updated_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn list(&self) -> AuthResult<Vec<Identity>> {
        let rows = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                first_name,
                last_name,
                role,
                wallet_id,
                reset_token,
                reset_token_expiry,
                created_at,
                updated_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_identity()).collect()
    }

    async fn update_identity(
        &self,
        identity: &Identity,
        new_password: Option<&UserPassword>,
    ) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET
                email = $2,
                first_name = $3,
                last_name = $4,
                role = $5,
                wallet_id = $6,
                password_hash = COALESCE($7, password_hash),
                reset_token = CASE WHEN $7 IS NULL THEN reset_token END,
                reset_token_expiry = CASE WHEN $7 IS NULL THEN reset_token_expiry END,
                updated_at = $8
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(identity.user_id.as_uuid())
        .bind(identity.email.as_str())
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.role.code())
        .bind(identity.wallet_id.as_deref())
        .bind(new_password.map(UserPassword::as_phc_string))
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_email)?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn delete_identity(&self, user_id: &UserId) -> AuthResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted != 1 {
            tx.rollback().await?;
            return Ok(None);
        }

        let revoked = Self::revoke_tokens(&mut *tx, user_id).await?;

        tx.commit().await?;

        Ok(Some(revoked))
    }

    async fn set_reset_token(&self, user_id: &UserId, grant: &ResetGrant) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token = $2, reset_token_expiry = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(grant.token.as_uuid())
        .bind(grant.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_reset_token(&self, token: &ResetTokenId) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                first_name,
                last_name,
                role,
                wallet_id,
                reset_token,
                reset_token_expiry,
                created_at,
                updated_at
            FROM users
            WHERE reset_token = $1
              AND reset_token_expiry > now()
              AND deleted_at IS NULL
            "#,
        )
        .bind(token.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn complete_password_reset(
        &self,
        user_id: &UserId,
        token: &ResetTokenId,
        new_password: &UserPassword,
    ) -> AuthResult<bool> {
        let mut tx = self.pool.begin().await?;

        if !Self::update_password(&mut *tx, user_id, token, new_password).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        Self::clear_reset_token(&mut *tx, user_id).await?;

        tx.commit().await?;

        Ok(true)
    }
}

// ============================================================================
// Session Token Repository Implementation
// ============================================================================

impl SessionTokenRepository for PgAuthRepository {
    async fn create(&self, token: &SessionToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_tokens (
                id,
                user_id,
                token,
                expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.token_id.as_uuid())
        .bind(token.user_id.as_uuid())
        .bind(token.token.as_str())
        .bind(token.expires_at)
        .bind(token.created_at)
        .bind(token.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_token_value(
        &self,
        value: &SessionTokenValue,
    ) -> AuthResult<Option<SessionToken>> {
        let row = sqlx::query_as::<_, SessionTokenRow>(
            r#"
            SELECT
                id,
                user_id,
                token,
                expires_at,
                created_at,
                updated_at,
                deleted_at
            FROM session_tokens
            WHERE token = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(value.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionTokenRow::into_session_token))
    }

    async fn purge_expired(&self) -> AuthResult<u64> {
        let purged = sqlx::query(
            r#"
            UPDATE session_tokens
            SET deleted_at = now(), updated_at = now()
            WHERE expires_at <= now() AND deleted_at IS NULL
            "#,
        )
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(tokens_purged = purged, "Purged expired session tokens");

        Ok(purged)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn grant_columns(grant: Option<&ResetGrant>) -> (Option<Uuid>, Option<DateTime<Utc>>) {
    match grant {
        Some(g) => (Some(g.token.into_uuid()), Some(g.expires_at)),
        None => (None, None),
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    role: String,
    wallet_id: Option<String>,
    reset_token: Option<Uuid>,
    reset_token_expiry: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> AuthResult<Identity> {
        Ok(Identity {
            user_id: UserId::from_uuid(self.id),
            email: Email::from_db(self.email),
            password: UserPassword::from_phc_string(self.password_hash)?,
            first_name: self.first_name,
            last_name: self.last_name,
            role: UserRole::from_db(&self.role),
            wallet_id: self.wallet_id,
            reset_grant: ResetGrant::from_columns(self.reset_token, self.reset_token_expiry),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionTokenRow {
    id: Uuid,
    user_id: Uuid,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl SessionTokenRow {
    fn into_session_token(self) -> SessionToken {
        SessionToken {
            token_id: SessionTokenId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            token: SessionTokenValue::from_raw(self.token),
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}
