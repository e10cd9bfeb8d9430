//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 所有时间字段均为毫秒级 Unix 时间戳。

pub mod prelude;

pub mod api_keys;
pub mod course_students;
pub mod courses;
pub mod questions;
pub mod scoring_feedbacks;
pub mod student_answers;
pub mod users;
