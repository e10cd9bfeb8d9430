use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradingService;
use crate::errors::GraderError;
use crate::models::{
    ApiResponse, ErrorCode,
    feedbacks::{
        entities::{FinalizeOutcome, is_valid_score},
        requests::FinalizeFeedbackRequest,
        responses::FinalizeFeedbackResponse,
    },
};
use crate::services::guards;

/// 确认并发布评价
/// POST /courses/{course_id}/questions/{question_id}/answers/{answer_id}/feedback
pub async fn finalize_feedback(
    service: &GradingService,
    request: &HttpRequest,
    course_id: i64,
    question_id: i64,
    answer_id: i64,
    body: FinalizeFeedbackRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(score) = body.score
        && !is_valid_score(score)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ScoreInvalid,
            "分数必须在 0 到 200 之间",
        )));
    }

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

    match storage
        .finalize_feedback(answer.id, body.score, body.feedback)
        .await
    {
        Ok(outcome) => {
            let created = outcome.is_created();
            info!(
                answer_id = answer.id,
                teacher_id = principal.teacher_id,
                created,
                "评价已确认"
            );
            let message = match outcome {
                FinalizeOutcome::Created(_) => "评价已发布",
                FinalizeOutcome::Updated(_) => "评价已更新并发布",
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                FinalizeFeedbackResponse {
                    feedback: outcome.into_feedback(),
                    created,
                },
                message,
            )))
        }
        Err(GraderError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ScoreInvalid, msg))),
        Err(GraderError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::AnswerNotFound, msg))),
        Err(e) => Ok(guards::internal_error("确认评价失败", e)),
    }
}
