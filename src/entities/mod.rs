pub mod prelude;

pub mod answers;
pub mod feedback_requests;
pub mod feedbacks;
pub mod form_questions;
pub mod forms;
pub mod questions;
pub mod users;
