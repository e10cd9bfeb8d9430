use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnswerService;
use crate::models::{ApiResponse, answers::responses::StudentAnswerView};
use crate::services::guards;

/// 学生只能看到已确认的最终评价
/// GET /courses/{course_id}/questions/{question_id}/answer
pub async fn get_my_answer(
    service: &AnswerService,
    request: &HttpRequest,
    course_id: i64,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let (student_id, question) =
        match guards::load_enrolled_question(&storage, request, course_id, question_id).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };

    let answer = match storage.get_latest_answer(question.id, student_id).await {
        Ok(answer) => answer,
        Err(e) => return Ok(guards::internal_error("查询答案失败", e)),
    };

    let final_feedback = match &answer {
        Some(answer) => match storage.get_latest_final_feedback(answer.id).await {
            Ok(feedback) => feedback,
            Err(e) => return Ok(guards::internal_error("查询评价失败", e)),
        },
        None => None,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentAnswerView {
            answer,
            final_feedback,
        },
        "查询成功",
    )))
}
