use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::Role;
use crate::entities::users;

/// An account as the rest of the crate sees it; the hash never leaves this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query users by IDs")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn admin_exists(&self) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Admin))
            .count(&self.conn)
            .await
            .context("Failed to count admin users")?;

        Ok(count > 0)
    }

    /// Insert a user, hashing the password on the blocking pool.
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        role: Role,
        config: &SecurityConfig,
    ) -> Result<User> {
        let password_hash = hash_in_background(password, config).await?;
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            role: Set(role),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(User::from(model))
    }

    /// Returns the user when the password matches. Unknown emails and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(account) = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to look up login email")?
        else {
            return Ok(None);
        };

        let stored = account.password_hash.clone();
        let attempt = password.to_owned();
        let matches = task::spawn_blocking(move || verify_password(&attempt, &stored))
            .await
            .context("Argon2 verify worker failed")??;

        Ok(matches.then(|| account.into()))
    }

    /// Replace a user's password. Returns `false` when the user does not exist.
    pub async fn update_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<bool> {
        let Some(account) = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to load user for password reset")?
        else {
            return Ok(false);
        };

        let hash = hash_in_background(new_password, config).await?;

        let mut active: users::ActiveModel = account.into();
        active.password_hash = Set(hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active
            .update(&self.conn)
            .await
            .context("Failed to store new password hash")?;

        Ok(true)
    }
}

/// Argon2 work is CPU bound; keep it off the async workers.
async fn hash_in_background(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_owned();
    let config = config.clone();
    task::spawn_blocking(move || hash_password(&password, Some(&config)))
        .await
        .context("Argon2 hash worker failed")?
}

fn argon2_for(config: Option<&SecurityConfig>) -> Result<Argon2<'static>> {
    let Some(cfg) = config else {
        return Ok(Argon2::default());
    };

    let params = Params::new(
        cfg.argon2_memory_cost_kib,
        cfg.argon2_time_cost,
        cfg.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Argon2 parameters rejected: {e}"))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// PHC-encoded Argon2id hash with a fresh salt. `None` uses the crate
/// defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    argon2_for(config)?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))
}

/// Check a password against a PHC string. The parameters are read from the
/// hash itself, so hashes made with older settings still verify.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Stored password hash is malformed: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn hashes_verify_only_with_the_right_password() {
        let hash = hash_password("correct horse", Some(&cheap_params())).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same", Some(&cheap_params())).unwrap();
        let b = hash_password("same", Some(&cheap_params())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }
}
