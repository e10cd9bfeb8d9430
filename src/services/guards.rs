//! 服务层公用的身份与归属校验
//!
//! 校验失败时直接返回可以交给客户端的响应。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, answers::entities::StudentAnswer, grading::entities::TeacherPrincipal,
    questions::entities::Question,
};
use crate::storage::Storage;

/// 存储层错误统一转为 500
pub(crate) fn internal_error(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    error!("{context}: {e}");
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {e}"),
    ))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized: missing user id",
    ))
}

/// 当前教师及其名下课程
pub(crate) async fn load_teacher_principal(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<TeacherPrincipal, HttpResponse> {
    let teacher_id = RequireJWT::extract_user_id(request).ok_or_else(unauthorized)?;
    let course_ids = storage
        .list_teacher_course_ids(teacher_id)
        .await
        .map_err(|e| internal_error("查询教师课程失败", e))?;

    Ok(TeacherPrincipal::new(teacher_id, course_ids))
}

/// 教师名下课程中的试题
pub(crate) async fn load_owned_question(
    storage: &Arc<dyn Storage>,
    principal: &TeacherPrincipal,
    course_id: i64,
    question_id: i64,
) -> Result<Question, HttpResponse> {
    if !principal.owns_course(course_id) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "无权管理该课程",
        )));
    }

    match storage.get_question_in_course(course_id, question_id).await {
        Ok(Some(question)) => Ok(question),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "试题不存在",
        ))),
        Err(e) => Err(internal_error("查询试题失败", e)),
    }
}

/// 属于该试题的答案
pub(crate) async fn load_question_answer(
    storage: &Arc<dyn Storage>,
    question_id: i64,
    answer_id: i64,
) -> Result<StudentAnswer, HttpResponse> {
    match storage.get_answer_in_question(question_id, answer_id).await {
        Ok(Some(answer)) => Ok(answer),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnswerNotFound,
            "答案不存在",
        ))),
        Err(e) => Err(internal_error("查询答案失败", e)),
    }
}

/// 学生已选课程中的试题
pub(crate) async fn load_enrolled_question(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    course_id: i64,
    question_id: i64,
) -> Result<(i64, Question), HttpResponse> {
    let student_id = RequireJWT::extract_user_id(request).ok_or_else(unauthorized)?;

    match storage.is_student_enrolled(course_id, student_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CourseNotEnrolled,
                "您未选修该课程",
            )));
        }
        Err(e) => return Err(internal_error("查询选课信息失败", e)),
    }

    match storage.get_question_in_course(course_id, question_id).await {
        Ok(Some(question)) => Ok((student_id, question)),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "试题不存在",
        ))),
        Err(e) => Err(internal_error("查询试题失败", e)),
    }
}
