//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::api::types::{LoginDto, UserDto};
use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::{Caller, Role, is_valid_email};
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::credentials::TokenIssuer;

const MIN_PASSWORD_LEN: usize = 8;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenIssuer,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        Self {
            tokens: TokenIssuer::from_config(&security),
            store,
            security,
        }
    }
}

fn check_password_length(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginDto, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required.".to_string(),
            ));
        }

        let user = self
            .store
            .users()
            .verify_credentials(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(user.id, user.role)?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginDto {
            token,
            user: UserDto::from(user),
        })
    }

    async fn authenticate(&self, token: &str) -> Result<Caller, AuthError> {
        self.tokens.verify(token).ok_or(AuthError::InvalidToken)
    }

    async fn me(&self, caller: Caller) -> Result<UserDto, AuthError> {
        let user = self
            .store
            .users()
            .get_by_id(caller.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserDto::from(user))
    }

    async fn create_reviewer(
        &self,
        email: &str,
        password: &str,
        caller: Caller,
    ) -> Result<UserDto, AuthError> {
        caller.require_admin()?;

        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required.".to_string(),
            ));
        }

        if !is_valid_email(email) {
            return Err(AuthError::Validation("Invalid email address.".to_string()));
        }

        check_password_length(password)?;

        let users = self.store.users();
        if users.get_by_email(email).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let user = users
            .create(email, password, Role::Reviewer, &self.security)
            .await?;

        tracing::info!(user_id = user.id, created_by = caller.user_id, "Reviewer created");

        Ok(UserDto::from(user))
    }

    async fn change_password(
        &self,
        user_id: i32,
        new_password: &str,
        caller: Caller,
    ) -> Result<(), AuthError> {
        caller.require_admin()?;
        check_password_length(new_password)?;

        let updated = self
            .store
            .users()
            .update_password(user_id, new_password, &self.security)
            .await?;

        if !updated {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id, changed_by = caller.user_id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        assert!(check_password_length("short").is_err());
        assert!(check_password_length("longenough").is_ok());
        assert!(check_password_length("exactly8").is_ok());
    }
}
