//! 预导入模块，方便使用

pub use super::api_keys::{
    ActiveModel as ApiKeyActiveModel, Entity as ApiKeys, Model as ApiKeyModel,
};
pub use super::course_students::{
    ActiveModel as CourseStudentActiveModel, Entity as CourseStudents, Model as CourseStudentModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::scoring_feedbacks::{
    ActiveModel as ScoringFeedbackActiveModel, Entity as ScoringFeedbacks,
    Model as ScoringFeedbackModel,
};
pub use super::student_answers::{
    ActiveModel as StudentAnswerActiveModel, Entity as StudentAnswers, Model as StudentAnswerModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
