pub mod answer_validation;
pub mod credentials;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod question_service;
pub mod question_service_impl;
pub use question_service::{NewQuestion, QuestionError, QuestionService, QuestionUpdate};
pub use question_service_impl::SeaOrmQuestionService;

pub mod form_service;
pub mod form_service_impl;
pub use form_service::{FormError, FormService};
pub use form_service_impl::SeaOrmFormService;

pub mod request_service;
pub mod request_service_impl;
pub use request_service::{IssueRequest, RequestError, RequestService};
pub use request_service_impl::SeaOrmRequestService;

pub mod feedback_service;
pub mod feedback_service_impl;
pub use feedback_service::{FeedbackError, FeedbackService};
pub use feedback_service_impl::SeaOrmFeedbackService;
