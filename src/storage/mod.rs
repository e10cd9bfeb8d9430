use std::sync::Arc;

use crate::models::{
    answers::entities::{StudentAnswer, SubmitOutcome},
    api_keys::{
        entities::ApiKey,
        requests::{CreateApiKeyRequest, UpdateApiKeyRequest},
    },
    courses::entities::{Course, CreateCourseRequest},
    feedbacks::{
        entities::{FinalizeOutcome, NewFeedback, ScoringFeedback},
        responses::AnswerFeedbackOverview,
    },
    questions::{entities::Question, requests::CreateQuestionRequest},
    users::entities::{CreateUserRequest, User},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 课程管理方法
    // 创建课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 列出教师名下的全部课程ID
    async fn list_teacher_course_ids(&self, teacher_id: i64) -> Result<Vec<i64>>;
    // 学生选课
    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<()>;
    // 学生是否选修了该课程
    async fn is_student_enrolled(&self, course_id: i64, student_id: i64) -> Result<bool>;

    /// 试题管理方法
    // 创建试题
    async fn create_question(
        &self,
        course_id: i64,
        question: CreateQuestionRequest,
    ) -> Result<Question>;
    // 获取课程下的试题
    async fn get_question_in_course(
        &self,
        course_id: i64,
        question_id: i64,
    ) -> Result<Option<Question>>;
    // 切换试题公开状态
    async fn toggle_question_visibility(&self, question_id: i64) -> Result<Option<Question>>;
    // 修改评分提示词
    async fn update_question_prompt(
        &self,
        question_id: i64,
        prompt: Option<String>,
    ) -> Result<Option<Question>>;

    /// 答案管理方法
    // 获取学生对某题的最新答案
    async fn get_latest_answer(
        &self,
        question_id: i64,
        student_id: i64,
    ) -> Result<Option<StudentAnswer>>;
    // 获取属于某题的答案
    async fn get_answer_in_question(
        &self,
        question_id: i64,
        answer_id: i64,
    ) -> Result<Option<StudentAnswer>>;
    // 提交答案：首次提交新建，否则覆盖原内容
    async fn submit_answer(
        &self,
        question_id: i64,
        student_id: i64,
        content: String,
    ) -> Result<(StudentAnswer, SubmitOutcome)>;
    // 覆盖答案内容并删除该答案的全部评分
    async fn replace_answer_content(
        &self,
        answer_id: i64,
        content: String,
    ) -> Result<Option<StudentAnswer>>;
    // 列出某题全部答案及其评分概况
    async fn list_question_answer_overviews(
        &self,
        question_id: i64,
    ) -> Result<Vec<AnswerFeedbackOverview>>;

    /// 评分反馈方法
    // 在同一事务中追加多条临时评分
    async fn record_provisional_feedbacks(&self, feedbacks: Vec<NewFeedback>) -> Result<u64>;
    // 确认评分：更新最新记录或新建最终记录
    async fn finalize_feedback(
        &self,
        answer_id: i64,
        score: Option<f64>,
        feedback: Option<String>,
    ) -> Result<FinalizeOutcome>;
    // 列出答案的全部评分，按时间倒序
    async fn list_feedbacks(&self, answer_id: i64) -> Result<Vec<ScoringFeedback>>;
    // 可导入的评分：最新临时评分，否则最新最终评分
    async fn get_importable_feedback(&self, answer_id: i64) -> Result<Option<ScoringFeedback>>;
    // 最新的最终评分
    async fn get_latest_final_feedback(&self, answer_id: i64) -> Result<Option<ScoringFeedback>>;

    /// API Key 管理方法
    // 创建 API Key
    async fn create_api_key(&self, req: CreateApiKeyRequest) -> Result<ApiKey>;
    // 通过ID获取 API Key
    async fn get_api_key_by_id(&self, key_id: i64) -> Result<Option<ApiKey>>;
    // 列出全部 API Key
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>>;
    // 列出教师可用的 API Key
    async fn list_teacher_enabled_api_keys(&self, teacher_id: i64) -> Result<Vec<ApiKey>>;
    // 解析批量评分使用的 API Key：必须属于该教师且处于启用状态
    async fn resolve_api_key(&self, key_id: i64, teacher_id: i64) -> Result<Option<ApiKey>>;
    // 更新 API Key
    async fn update_api_key(
        &self,
        key_id: i64,
        update: UpdateApiKeyRequest,
    ) -> Result<Option<ApiKey>>;
    // 切换 API Key 启用状态
    async fn toggle_api_key_status(&self, key_id: i64) -> Result<Option<ApiKey>>;
    // 批量删除 API Key
    async fn delete_api_keys(&self, ids: &[i64]) -> Result<u64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
