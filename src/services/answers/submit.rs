use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AnswerService;
use crate::models::{
    ApiResponse, ErrorCode,
    answers::{
        entities::SubmitOutcome, requests::SubmitAnswerRequest, responses::SubmitAnswerResponse,
    },
};
use crate::services::guards;

/// PUT /courses/{course_id}/questions/{question_id}/answer
pub async fn submit_answer(
    service: &AnswerService,
    request: &HttpRequest,
    course_id: i64,
    question_id: i64,
    body: SubmitAnswerRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if body.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AnswerContentInvalid,
            "答案内容不能为空",
        )));
    }

    let (student_id, question) =
        match guards::load_enrolled_question(&storage, request, course_id, question_id).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };

    if !question.is_open {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::QuestionClosed,
            "试题未开放作答",
        )));
    }

    match storage
        .submit_answer(question.id, student_id, body.content)
        .await
    {
        Ok((answer, outcome)) => {
            let message = match outcome {
                SubmitOutcome::Created => "答案提交成功",
                SubmitOutcome::Replaced => {
                    info!(
                        answer_id = answer.id,
                        student_id, "答案已覆盖，原有评分已清除"
                    );
                    "答案已更新，原有评分已作废"
                }
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmitAnswerResponse { answer, outcome },
                message,
            )))
        }
        Err(e) => Ok(guards::internal_error("提交答案失败", e)),
    }
}
