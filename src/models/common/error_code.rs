use serde::Serialize;
use ts_rs::TS;

/// 业务错误码
///
/// 通过 `ApiResponse.code` 返回给前端，`0` 表示成功。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,

    // 课程
    CourseNotFound = 2001,
    CoursePermissionDenied = 2002,
    CourseNotEnrolled = 2003,

    // 试题
    QuestionNotFound = 3001,
    QuestionClosed = 3002,

    // 答案
    AnswerNotFound = 4001,
    AnswerContentInvalid = 4002,

    // 评分反馈
    FeedbackNotFound = 5001,
    ScoreInvalid = 5002,

    // API Key 与批量评分
    ApiKeyNotSelected = 6001,
    ApiKeyNotFound = 6002,
    ApiKeyInvalid = 6003,
    BatchGradeFailed = 6004,
}
