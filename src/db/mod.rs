use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::Role;

pub mod migrator;
pub mod repositories;

pub use repositories::feedback::NewAnswer;
pub use repositories::feedback_request::{NewFeedbackRequest, RequestFilter};
pub use repositories::form::FormFilter;
pub use repositories::question::QuestionFilter;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Connects, creating the SQLite file and its directory when needed,
    /// and brings the schema up to date.
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        prepare_sqlite_file(db_url).await?;

        let mut options = ConnectOptions::new(db_url.to_owned());
        options
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Cannot open database {db_url}"))?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Schema migration failed")?;

        info!(max_connections, min_connections, "Database ready");

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn users(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn questions(&self) -> repositories::question::QuestionRepository {
        repositories::question::QuestionRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn forms(&self) -> repositories::form::FormRepository {
        repositories::form::FormRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn requests(&self) -> repositories::feedback_request::FeedbackRequestRepository {
        repositories::feedback_request::FeedbackRequestRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn feedback(&self) -> repositories::feedback::FeedbackRepository {
        repositories::feedback::FeedbackRepository::new(self.conn.clone())
    }

    /// Create an admin account unless one already exists. Returns the new
    /// user when one was created.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        let users = self.users();
        if users.admin_exists().await? {
            return Ok(None);
        }

        if users.get_by_email(email).await?.is_some() {
            anyhow::bail!("User {email} already exists but is not an admin");
        }

        let user = users.create(email, password, Role::Admin, security).await?;
        info!(user_id = user.id, "Bootstrap admin created");
        Ok(Some(user))
    }
}

async fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url.contains(":memory:") {
        return Ok(());
    }

    let file = db_url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//")
        .split('?')
        .next()
        .unwrap_or_default();
    let file = Path::new(file);

    if let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Cannot create {}", dir.display()))?;
    }

    if !file.exists() {
        tokio::fs::File::create(file)
            .await
            .with_context(|| format!("Cannot create {}", file.display()))?;
    }

    Ok(())
}
