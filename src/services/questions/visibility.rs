use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::guards;

/// PATCH /courses/{course_id}/questions/{question_id}/visibility
pub async fn toggle_visibility(
    service: &QuestionService,
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

    match storage.toggle_question_visibility(question.id).await {
        Ok(Some(question)) => {
            let message = if question.is_open {
                "试题已公开"
            } else {
                "试题已关闭"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(question, message)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "试题不存在",
        ))),
        Err(e) => Ok(guards::internal_error("更新试题状态失败", e)),
    }
}
