pub mod answers;
pub mod api_keys;
pub mod grading;
pub(crate) mod guards;
pub mod questions;

pub use answers::AnswerService;
pub use api_keys::ApiKeyService;
pub use grading::GradingService;
pub use questions::QuestionService;
