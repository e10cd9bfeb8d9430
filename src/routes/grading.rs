use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireRole;
use crate::models::feedbacks::requests::FinalizeFeedbackRequest;
use crate::models::grading::requests::BatchGradeRequest;
use crate::services::GradingService;

// 懒加载的全局 GradingService 实例
static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);

// HTTP处理程序
pub async fn batch_grade(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<BatchGradeRequest>,
) -> ActixResult<HttpResponse> {
    let (course_id, question_id) = path.into_inner();
    GRADING_SERVICE
        .batch_grade(&req, course_id, question_id, body.into_inner())
        .await
}

pub async fn list_answers(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, question_id) = path.into_inner();
    GRADING_SERVICE
        .list_answers(&req, course_id, question_id)
        .await
}

pub async fn import_feedback(
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, question_id, answer_id) = path.into_inner();
    GRADING_SERVICE
        .import_feedback(&req, course_id, question_id, answer_id)
        .await
}

pub async fn finalize_feedback(
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
    body: web::Json<FinalizeFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    let (course_id, question_id, answer_id) = path.into_inner();
    GRADING_SERVICE
        .finalize_feedback(&req, course_id, question_id, answer_id, body.into_inner())
        .await
}

// 配置路由（挂载在试题作用域下）
pub fn configure_grading_routes(cfg: &mut web::ServiceConfig) {
    let teacher = RequireRole::teacher;

    let grade = web::post().to(batch_grade).wrap(teacher());
    let overview = web::get().to(list_answers).wrap(teacher());
    let import = web::get().to(import_feedback).wrap(teacher());
    let finalize = web::post().to(finalize_feedback).wrap(teacher());

    cfg.service(web::resource("/ai-grade").route(grade));
    cfg.service(web::resource("/answers").route(overview));
    cfg.service(web::resource("/answers/{answer_id}/feedback/import").route(import));
    cfg.service(web::resource("/answers/{answer_id}/feedback").route(finalize));
}
