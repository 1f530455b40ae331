use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::notify::NotificationDispatcher;
use crate::services::{
    AuthService, FeedbackService, FormService, QuestionService, RequestService,
    SeaOrmAuthService, SeaOrmFeedbackService, SeaOrmFormService, SeaOrmQuestionService,
    SeaOrmRequestService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub notifications: NotificationDispatcher,

    pub auth_service: Arc<dyn AuthService>,

    pub question_service: Arc<dyn QuestionService>,

    pub form_service: Arc<dyn FormService>,

    pub request_service: Arc<dyn RequestService>,

    pub feedback_service: Arc<dyn FeedbackService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let notifications = NotificationDispatcher::from_config(&config.mail)?;
        Self::with_notifications(config, notifications).await
    }

    /// Builds the state around an existing dispatcher, e.g. one backed by a
    /// recording notifier.
    pub async fn with_notifications(
        config: Config,
        notifications: NotificationDispatcher,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        if let (Some(email), Some(password)) = (
            config.bootstrap.admin_email.as_deref(),
            config.bootstrap.admin_password.as_deref(),
        ) {
            store.ensure_admin(email, password, &config.security).await?;
        }

        let expiry = config.request_expiry();

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let question_service = Arc::new(SeaOrmQuestionService::new(store.clone()))
            as Arc<dyn QuestionService>;

        let form_service = Arc::new(SeaOrmFormService::new(store.clone()))
            as Arc<dyn FormService>;

        let request_service = Arc::new(SeaOrmRequestService::new(
            store.clone(),
            notifications.clone(),
            expiry,
        )) as Arc<dyn RequestService>;

        let feedback_service = Arc::new(SeaOrmFeedbackService::new(store.clone(), expiry))
            as Arc<dyn FeedbackService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            notifications,
            auth_service,
            question_service,
            form_service,
            request_service,
            feedback_service,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
