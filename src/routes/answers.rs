use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireRole;
use crate::models::answers::requests::SubmitAnswerRequest;
use crate::services::AnswerService;

// 懒加载的全局 AnswerService 实例
static ANSWER_SERVICE: Lazy<AnswerService> = Lazy::new(AnswerService::new_lazy);

pub async fn submit_answer(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<SubmitAnswerRequest>,
) -> ActixResult<HttpResponse> {
    let (course_id, question_id) = path.into_inner();
    ANSWER_SERVICE
        .submit_answer(&req, course_id, question_id, body.into_inner())
        .await
}

pub async fn get_my_answer(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, question_id) = path.into_inner();
    ANSWER_SERVICE
        .get_my_answer(&req, course_id, question_id)
        .await
}

pub fn configure_answers_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/answer")
            .wrap(RequireRole::student())
            .route(web::get().to(get_my_answer))
            .route(web::put().to(submit_answer)),
    );
}
