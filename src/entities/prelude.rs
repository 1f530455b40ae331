pub use super::answers::Entity as Answers;
pub use super::feedback_requests::Entity as FeedbackRequests;
pub use super::feedbacks::Entity as Feedbacks;
pub use super::form_questions::Entity as FormQuestions;
pub use super::forms::Entity as Forms;
pub use super::questions::Entity as Questions;
pub use super::users::Entity as Users;
