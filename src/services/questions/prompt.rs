use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::models::{ApiResponse, ErrorCode, questions::requests::UpdatePromptRequest};
use crate::services::guards;

/// PUT /courses/{course_id}/questions/{question_id}/prompt
pub async fn update_prompt(
    service: &QuestionService,
    request: &HttpRequest,
    course_id: i64,
    question_id: i64,
    body: UpdatePromptRequest,
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

    // 空白提示词视为清除
    let prompt = body.prompt.filter(|p| !p.trim().is_empty());

    match storage.update_question_prompt(question.id, prompt).await {
        Ok(Some(question)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            question,
            "评分提示词已更新",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "试题不存在",
        ))),
        Err(e) => Ok(guards::internal_error("更新评分提示词失败", e)),
    }
}
