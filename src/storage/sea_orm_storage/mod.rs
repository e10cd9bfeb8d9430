//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod answers;
mod api_keys;
mod courses;
mod feedbacks;
mod questions;
mod users;

use crate::config::AppConfig;
use crate::errors::{GraderError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 基于已有连接创建存储实例，并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| GraderError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GraderError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GraderError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| GraderError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GraderError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持 sqlite/postgres/mysql 或 .db 文件"
            )))
        }
    }
}

/// 当前毫秒时间戳
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_teacher_course_ids(&self, teacher_id: i64) -> Result<Vec<i64>> {
        self.list_teacher_course_ids_impl(teacher_id).await
    }

    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<()> {
        self.enroll_student_impl(course_id, student_id).await
    }

    async fn is_student_enrolled(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.is_student_enrolled_impl(course_id, student_id).await
    }

    // 试题模块
    async fn create_question(
        &self,
        course_id: i64,
        question: CreateQuestionRequest,
    ) -> Result<Question> {
        self.create_question_impl(course_id, question).await
    }

    async fn get_question_in_course(
        &self,
        course_id: i64,
        question_id: i64,
    ) -> Result<Option<Question>> {
        self.get_question_in_course_impl(course_id, question_id)
            .await
    }

    async fn toggle_question_visibility(&self, question_id: i64) -> Result<Option<Question>> {
        self.toggle_question_visibility_impl(question_id).await
    }

    async fn update_question_prompt(
        &self,
        question_id: i64,
        prompt: Option<String>,
    ) -> Result<Option<Question>> {
        self.update_question_prompt_impl(question_id, prompt).await
    }

    // 答案模块
    async fn get_latest_answer(
        &self,
        question_id: i64,
        student_id: i64,
    ) -> Result<Option<StudentAnswer>> {
        self.get_latest_answer_impl(question_id, student_id).await
    }

    async fn get_answer_in_question(
        &self,
        question_id: i64,
        answer_id: i64,
    ) -> Result<Option<StudentAnswer>> {
        self.get_answer_in_question_impl(question_id, answer_id)
            .await
    }

    async fn submit_answer(
        &self,
        question_id: i64,
        student_id: i64,
        content: String,
    ) -> Result<(StudentAnswer, SubmitOutcome)> {
        self.submit_answer_impl(question_id, student_id, content)
            .await
    }

    async fn replace_answer_content(
        &self,
        answer_id: i64,
        content: String,
    ) -> Result<Option<StudentAnswer>> {
        self.replace_answer_content_impl(answer_id, content).await
    }

    async fn list_question_answer_overviews(
        &self,
        question_id: i64,
    ) -> Result<Vec<AnswerFeedbackOverview>> {
        self.list_question_answer_overviews_impl(question_id).await
    }

    // 评分反馈模块
    async fn record_provisional_feedbacks(&self, feedbacks: Vec<NewFeedback>) -> Result<u64> {
        self.record_provisional_feedbacks_impl(feedbacks).await
    }

    async fn finalize_feedback(
        &self,
        answer_id: i64,
        score: Option<f64>,
        feedback: Option<String>,
    ) -> Result<FinalizeOutcome> {
        self.finalize_feedback_impl(answer_id, score, feedback)
            .await
    }

    async fn list_feedbacks(&self, answer_id: i64) -> Result<Vec<ScoringFeedback>> {
        self.list_feedbacks_impl(answer_id).await
    }

    async fn get_importable_feedback(&self, answer_id: i64) -> Result<Option<ScoringFeedback>> {
        self.get_importable_feedback_impl(answer_id).await
    }

    async fn get_latest_final_feedback(&self, answer_id: i64) -> Result<Option<ScoringFeedback>> {
        self.get_latest_final_feedback_impl(answer_id).await
    }

    // API Key 模块
    async fn create_api_key(&self, req: CreateApiKeyRequest) -> Result<ApiKey> {
        self.create_api_key_impl(req).await
    }

    async fn get_api_key_by_id(&self, key_id: i64) -> Result<Option<ApiKey>> {
        self.get_api_key_by_id_impl(key_id).await
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>> {
        self.list_api_keys_impl().await
    }

    async fn list_teacher_enabled_api_keys(&self, teacher_id: i64) -> Result<Vec<ApiKey>> {
        self.list_teacher_enabled_api_keys_impl(teacher_id).await
    }

    async fn resolve_api_key(&self, key_id: i64, teacher_id: i64) -> Result<Option<ApiKey>> {
        self.resolve_api_key_impl(key_id, teacher_id).await
    }

    async fn update_api_key(
        &self,
        key_id: i64,
        update: UpdateApiKeyRequest,
    ) -> Result<Option<ApiKey>> {
        self.update_api_key_impl(key_id, update).await
    }

    async fn toggle_api_key_status(&self, key_id: i64) -> Result<Option<ApiKey>> {
        self.toggle_api_key_status_impl(key_id).await
    }

    async fn delete_api_keys(&self, ids: &[i64]) -> Result<u64> {
        self.delete_api_keys_impl(ids).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 存储层测试辅助：内存 SQLite + 真实迁移

    use super::SeaOrmStorage;
    use crate::models::{
        courses::entities::CreateCourseRequest,
        feedbacks::entities::NewFeedback,
        questions::requests::CreateQuestionRequest,
        users::entities::{CreateUserRequest, UserRole},
    };
    use crate::storage::Storage;
    use sea_orm::Database;

    pub async fn setup_storage() -> SeaOrmStorage {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory db");
        SeaOrmStorage::from_connection(db)
            .await
            .expect("Failed to run migrations")
    }

    /// 基础数据：一名教师、一门课程、一道公开试题
    pub struct Fixture {
        pub teacher_id: i64,
        pub course_id: i64,
        pub question_id: i64,
    }

    pub async fn seed_course(storage: &SeaOrmStorage, tag: &str) -> Fixture {
        let teacher = storage
            .create_user(CreateUserRequest {
                username: format!("teacher_{tag}"),
                email: None,
                role: UserRole::Teacher,
            })
            .await
            .unwrap();
        let course = storage
            .create_course(CreateCourseRequest {
                teacher_id: teacher.id,
                name: format!("课程 {tag}"),
                description: None,
            })
            .await
            .unwrap();
        let question = storage
            .create_question(
                course.id,
                CreateQuestionRequest {
                    title: "简答题".into(),
                    content: "解释所有权".into(),
                    scoring_criteria: None,
                    prompt: Some("请按 JSON 返回 score 与 reason".into()),
                },
            )
            .await
            .unwrap();
        storage
            .toggle_question_visibility(question.id)
            .await
            .unwrap();

        Fixture {
            teacher_id: teacher.id,
            course_id: course.id,
            question_id: question.id,
        }
    }

    pub async fn seed_student(storage: &SeaOrmStorage, name: &str, course_id: i64) -> i64 {
        let student = storage
            .create_user(CreateUserRequest {
                username: name.into(),
                email: None,
                role: UserRole::Student,
            })
            .await
            .unwrap();
        storage.enroll_student(course_id, student.id).await.unwrap();
        student.id
    }

    /// 追加一条临时评分
    pub async fn add_provisional(storage: &SeaOrmStorage, answer_id: i64, score: f64, text: &str) {
        storage
            .record_provisional_feedbacks(vec![NewFeedback::new(answer_id, score, text)])
            .await
            .unwrap();
    }
}
