pub mod answers;
pub mod api_keys;
pub mod grading;
pub mod questions;

use actix_web::web;

use crate::middlewares;

pub use api_keys::configure_api_keys_routes;

/// 课程试题下的全部路由
///
/// 教师与学生共用同一路径前缀，角色在资源或路由级别区分。
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/questions/{question_id}")
            .wrap(middlewares::RequireJWT)
            .configure(grading::configure_grading_routes)
            .configure(questions::configure_questions_routes)
            .configure(answers::configure_answers_routes),
    );
}
