use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::models::ApiResponse;
use crate::services::guards;

/// GET /courses/{course_id}/questions/{question_id}/answers
pub async fn list_answers(
    service: &GradingService,
    request: &HttpRequest,
    course_id: i64,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let principal = match guards::load_teacher_principal(&storage, request).await {
        Ok(principal) => principal,
        Err(resp) => return Ok(resp),
    };
    let question =
        match guards::load_owned_question(&storage, &principal, course_id, question_id).await {
            Ok(question) => question,
            Err(resp) => return Ok(resp),
        };

    match storage.list_question_answer_overviews(question.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(items, "查询成功"))),
        Err(e) => Ok(guards::internal_error("查询答案列表失败", e)),
    }
}
