use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireRole;
use crate::models::questions::requests::UpdatePromptRequest;
use crate::services::QuestionService;

// 懒加载的全局 QuestionService 实例
static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn toggle_visibility(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, question_id) = path.into_inner();
    QUESTION_SERVICE
        .toggle_visibility(&req, course_id, question_id)
        .await
}

pub async fn update_prompt(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<UpdatePromptRequest>,
) -> ActixResult<HttpResponse> {
    let (course_id, question_id) = path.into_inner();
    QUESTION_SERVICE
        .update_prompt(&req, course_id, question_id, body.into_inner())
        .await
}

pub fn configure_questions_routes(cfg: &mut web::ServiceConfig) {
    let teacher = RequireRole::teacher;

    let toggle = web::patch().to(toggle_visibility).wrap(teacher());
    let prompt = web::put().to(update_prompt).wrap(teacher());

    cfg.service(web::resource("/visibility").route(toggle));
    cfg.service(web::resource("/prompt").route(prompt));
}
