pub mod feedback;
pub mod feedback_request;
pub mod form;
pub mod question;
pub mod search;
pub mod user;
