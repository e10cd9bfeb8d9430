use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::models::{ApiResponse, ErrorCode, feedbacks::responses::ImportedFeedback};
use crate::services::guards;

/// 导入评价：最新临时评分优先，其次最新最终评分
/// GET /courses/{course_id}/questions/{question_id}/answers/{answer_id}/feedback/import
pub async fn import_feedback(
    service: &GradingService,
    request: &HttpRequest,
    course_id: i64,
    question_id: i64,
    answer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let principal = match guards::load_teacher_principal(&storage, request).await {
        Ok(principal) => principal,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) =
        guards::load_owned_question(&storage, &principal, course_id, question_id).await
    {
        return Ok(resp);
    }
    let answer = match guards::load_question_answer(&storage, question_id, answer_id).await {
        Ok(answer) => answer,
        Err(resp) => return Ok(resp),
    };

    match storage.get_importable_feedback(answer.id).await {
        Ok(Some(feedback)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ImportedFeedback::from(feedback),
            "评价导入成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FeedbackNotFound,
            "未找到可导入的评价",
        ))),
        Err(e) => Ok(guards::internal_error("查询评价失败", e)),
    }
}
