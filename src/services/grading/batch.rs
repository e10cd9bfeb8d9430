//! 批量智能评分
//!
//! 在一次请求内按顺序逐个调用评分适配器。单个答案的任何失败只影响它自己的结果，
//! 所有评分记录在全部调用结束后于同一事务中写入。

use std::collections::{BTreeMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use futures_util::FutureExt;
use tracing::{debug, error, info, warn};

use super::GradingService;
use crate::errors::GraderError;
use crate::judge::{JudgeAdapter, JudgeError, JudgeRegistry, JudgeRequest};
use crate::models::{
    ApiResponse, ErrorCode,
    api_keys::entities::ApiKey,
    feedbacks::entities::NewFeedback,
    grading::{
        entities::TeacherPrincipal,
        requests::BatchGradeRequest,
        responses::{BatchGradeResponse, BatchItemResult},
    },
    questions::entities::Question,
};
use crate::services::guards;
use crate::storage::Storage;

pub const MSG_GRADED: &str = "评分完成。";
pub const MSG_JUDGE_FAILED: &str = "AI评分失败。";
pub const MSG_UNREADABLE: &str = "无法读取答案内容。";
pub const MSG_ANSWER_MISSING: &str = "答案不存在";
pub const MSG_UNEXPECTED: &str = "AI评分过程中发生错误。";

/// 整批拒绝的原因，出现时不会产生任何单项结果，也不会写入任何评分
#[derive(thiserror::Error, Debug)]
pub enum BatchGradeError {
    #[error("无权批改该课程的试题")]
    PermissionDenied,

    #[error("试题不存在")]
    QuestionNotFound,

    #[error("请选择一个大模型进行评分。")]
    ApiKeyNotSelected,

    #[error("未找到指定的有效 API Key。")]
    ApiKeyNotFound,

    #[error(transparent)]
    Storage(#[from] GraderError),
}

impl BatchGradeError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            Self::PermissionDenied => (StatusCode::FORBIDDEN, ErrorCode::CoursePermissionDenied),
            Self::QuestionNotFound => (StatusCode::NOT_FOUND, ErrorCode::QuestionNotFound),
            Self::ApiKeyNotSelected => (StatusCode::BAD_REQUEST, ErrorCode::ApiKeyNotSelected),
            Self::ApiKeyNotFound => (StatusCode::BAD_REQUEST, ErrorCode::ApiKeyInvalid),
            Self::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::BatchGradeFailed,
            ),
        }
    }

    fn into_response(self) -> HttpResponse {
        let (status, code) = self.status_and_code();
        let message = match &self {
            Self::Storage(e) => {
                error!("批量评分存储失败: {e}");
                format!("批量评分失败: {}", e.message())
            }
            other => other.to_string(),
        };
        HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
    }
}

/// 按首次出现的顺序去重
fn dedup_ids(ids: Vec<i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// 批量评分
///
/// 授权与 API Key 校验失败时整批拒绝；之后每个答案独立处理，
/// 返回的结果覆盖请求中的每一个答案 ID。
pub async fn run_batch(
    storage: &dyn Storage,
    registry: &JudgeRegistry,
    principal: &TeacherPrincipal,
    course_id: i64,
    question_id: i64,
    request: BatchGradeRequest,
) -> Result<BatchGradeResponse, BatchGradeError> {
    if !principal.owns_course(course_id) {
        return Err(BatchGradeError::PermissionDenied);
    }
    let question = storage
        .get_question_in_course(course_id, question_id)
        .await?
        .ok_or(BatchGradeError::QuestionNotFound)?;

    let key_id = request
        .api_key_id
        .ok_or(BatchGradeError::ApiKeyNotSelected)?;
    let api_key = storage
        .resolve_api_key(key_id, principal.teacher_id)
        .await?
        .ok_or(BatchGradeError::ApiKeyNotFound)?;

    let adapter = registry.adapter_for(&api_key.model);
    let answer_ids = dedup_ids(request.answer_ids);
    info!(
        teacher_id = principal.teacher_id,
        question_id,
        model = %api_key.model,
        version = %api_key.version,
        count = answer_ids.len(),
        "开始批量评分"
    );

    let mut results = BTreeMap::new();
    let mut pending = Vec::with_capacity(answer_ids.len());

    for answer_id in answer_ids {
        let item = grade_one(storage, adapter.as_ref(), &question, &api_key, answer_id);
        let (result, feedback) = match AssertUnwindSafe(item).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(answer_id, "评分过程中发生 panic");
                (
                    BatchItemResult::error(MSG_UNEXPECTED),
                    Some(NewFeedback::new(answer_id, 0.0, MSG_UNEXPECTED)),
                )
            }
        };

        debug!(answer_id, status = ?result.status, message = %result.message, "答案评分结束");
        pending.extend(feedback);
        results.insert(answer_id, result);
    }

    storage.record_provisional_feedbacks(pending).await?;

    let response = BatchGradeResponse { results };
    info!(
        question_id,
        success = response.success_count(),
        failed = response.error_count(),
        "批量评分完成"
    );
    Ok(response)
}

/// 处理单个答案，返回单项结果与待写入的评分
async fn grade_one(
    storage: &dyn Storage,
    adapter: Result<&Arc<dyn JudgeAdapter>, &JudgeError>,
    question: &Question,
    api_key: &ApiKey,
    answer_id: i64,
) -> (BatchItemResult, Option<NewFeedback>) {
    let answer = match storage.get_answer_in_question(question.id, answer_id).await {
        Ok(Some(answer)) => answer,
        Ok(None) => return (BatchItemResult::error(MSG_ANSWER_MISSING), None),
        Err(e) => {
            warn!(answer_id, "查询答案失败: {e}");
            return (BatchItemResult::error(MSG_UNEXPECTED), None);
        }
    };

    // 空答案不送交评分
    let Some(content) = answer.readable_content() else {
        return (
            BatchItemResult::error(MSG_UNREADABLE),
            Some(NewFeedback::new(answer.id, 0.0, MSG_UNREADABLE)),
        );
    };

    let adapter = match adapter {
        Ok(adapter) => adapter,
        Err(e) => {
            let reason = e.to_string();
            return (
                BatchItemResult::error(reason.clone()),
                Some(NewFeedback::new(answer.id, 0.0, reason)),
            );
        }
    };

    let judge_request = JudgeRequest {
        answer: content,
        prompt: question.grading_prompt(),
        secret: &api_key.key_value,
        version: &api_key.version,
    };

    match adapter.judge(&judge_request).await {
        Ok(verdict) => (
            BatchItemResult::success(MSG_GRADED),
            Some(NewFeedback::new(answer.id, verdict.score, verdict.reason)),
        ),
        Err(JudgeError::Unexpected(detail)) => {
            error!(
                answer_id,
                adapter = adapter.name(),
                "评分适配器意外错误: {detail}"
            );
            (
                BatchItemResult::error(MSG_UNEXPECTED),
                Some(NewFeedback::new(answer.id, 0.0, MSG_UNEXPECTED)),
            )
        }
        Err(e) => {
            info!(answer_id, adapter = adapter.name(), "AI评分失败: {e}");
            (
                BatchItemResult::error(MSG_JUDGE_FAILED),
                Some(NewFeedback::new(answer.id, 0.0, e.to_string())),
            )
        }
    }
}

/// POST /courses/{course_id}/questions/{question_id}/ai-grade
pub async fn batch_grade(
    service: &GradingService,
    request: &HttpRequest,
    course_id: i64,
    question_id: i64,
    body: BatchGradeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let registry = service.get_registry(request);

    let principal = match guards::load_teacher_principal(&storage, request).await {
        Ok(principal) => principal,
        Err(resp) => return Ok(resp),
    };

    match run_batch(
        storage.as_ref(),
        registry.as_ref(),
        &principal,
        course_id,
        question_id,
        body,
    )
    .await
    {
        Ok(response) => {
            let message = format!(
                "批量评分完成：成功 {} 个，失败 {} 个",
                response.success_count(),
                response.error_count()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, message)))
        }
        Err(e) => Ok(e.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sea_orm::EntityTrait;

    use super::*;
    use crate::entity::student_answers::Entity as StudentAnswers;
    use crate::judge::{JudgeVerdict, ModelFamily};
    use crate::models::api_keys::requests::CreateApiKeyRequest;
    use crate::storage::sea_orm_storage::{
        SeaOrmStorage,
        test_support::{Fixture, seed_course, seed_student, setup_storage},
    };

    type Script = Box<dyn Fn(&str) -> Result<JudgeVerdict, JudgeError> + Send + Sync>;

    /// 按答案内容给出预设结果的评分器
    struct ScriptedJudge {
        calls: Arc<AtomicUsize>,
        script: Script,
    }

    #[async_trait::async_trait]
    impl JudgeAdapter for ScriptedJudge {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn judge(&self, request: &JudgeRequest<'_>) -> Result<JudgeVerdict, JudgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.script)(request.answer)
        }
    }

    struct PanickingJudge;

    #[async_trait::async_trait]
    impl JudgeAdapter for PanickingJudge {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn judge(&self, _request: &JudgeRequest<'_>) -> Result<JudgeVerdict, JudgeError> {
            panic!("adapter bug")
        }
    }

    /// 给出评分前删除触发内容对应的答案，使提交时外键约束失败
    struct DeletingJudge {
        storage: SeaOrmStorage,
        victim: i64,
        trigger: &'static str,
    }

    #[async_trait::async_trait]
    impl JudgeAdapter for DeletingJudge {
        fn name(&self) -> &'static str {
            "deleting"
        }

        async fn judge(&self, request: &JudgeRequest<'_>) -> Result<JudgeVerdict, JudgeError> {
            if request.answer == self.trigger {
                StudentAnswers::delete_by_id(self.victim)
                    .exec(&self.storage.db)
                    .await
                    .map_err(|e| JudgeError::Unexpected(e.to_string()))?;
            }
            Ok(JudgeVerdict {
                score: 60.0,
                reason: "及格".into(),
            })
        }
    }

    fn scripted_registry(script: Script) -> (JudgeRegistry, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let judge: Arc<dyn JudgeAdapter> = Arc::new(ScriptedJudge {
            calls: calls.clone(),
            script,
        });
        let registry = JudgeRegistry::new()
            .with_adapter(ModelFamily::Gpt, judge.clone())
            .with_adapter(ModelFamily::Qwen, judge);
        (registry, calls)
    }

    fn always_pass() -> Script {
        Box::new(|_| {
            Ok(JudgeVerdict {
                score: 88.0,
                reason: "回答完整".into(),
            })
        })
    }

    struct Scene {
        storage: SeaOrmStorage,
        fx: Fixture,
        principal: TeacherPrincipal,
        key_id: i64,
    }

    async fn scene(tag: &str, model: &str, enabled: bool) -> Scene {
        let storage = setup_storage().await;
        let fx = seed_course(&storage, tag).await;
        let key = storage
            .create_api_key(CreateApiKeyRequest {
                teacher_id: fx.teacher_id,
                model: model.into(),
                version: format!("{model}-test"),
                key_value: "sk-test-key".into(),
                status: Some(enabled),
            })
            .await
            .unwrap();
        let principal = TeacherPrincipal::new(fx.teacher_id, [fx.course_id]);
        Scene {
            storage,
            fx,
            principal,
            key_id: key.id,
        }
    }

    async fn answer(scene: &Scene, student: &str, content: &str) -> i64 {
        let student_id = seed_student(&scene.storage, student, scene.fx.course_id).await;
        let (answer, _) = scene
            .storage
            .submit_answer(scene.fx.question_id, student_id, content.into())
            .await
            .unwrap();
        answer.id
    }

    async fn grade(
        scene: &Scene,
        registry: &JudgeRegistry,
        answer_ids: Vec<i64>,
        api_key_id: Option<i64>,
    ) -> Result<BatchGradeResponse, BatchGradeError> {
        run_batch(
            &scene.storage,
            registry,
            &scene.principal,
            scene.fx.course_id,
            scene.fx.question_id,
            BatchGradeRequest {
                answer_ids,
                api_key_id,
            },
        )
        .await
    }

    #[tokio::test]
    async fn test_successful_batch_records_provisional_rows() {
        let scene = scene("ok", "gpt", true).await;
        let a = answer(&scene, "stu_ok", "所有权唯一").await;
        let (registry, calls) = scripted_registry(always_pass());

        let response = grade(&scene, &registry, vec![a], Some(scene.key_id))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.results[&a], BatchItemResult::success(MSG_GRADED));

        let rows = scene.storage.list_feedbacks(a).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, 88.0);
        assert_eq!(rows[0].feedback.as_deref(), Some("回答完整"));
        assert!(!rows[0].is_final);
    }

    #[tokio::test]
    async fn test_empty_content_short_circuits() {
        let scene = scene("empty", "gpt", true).await;
        let a = answer(&scene, "stu_empty", "").await;
        let (registry, calls) = scripted_registry(always_pass());

        let response = grade(&scene, &registry, vec![a], Some(scene.key_id))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(response.results[&a], BatchItemResult::error(MSG_UNREADABLE));

        let rows = scene.storage.list_feedbacks(a).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, 0.0);
        assert_eq!(rows[0].feedback.as_deref(), Some(MSG_UNREADABLE));
    }

    #[tokio::test]
    async fn test_unknown_model_family_makes_no_calls() {
        let scene = scene("llama", "llama", true).await;
        let a = answer(&scene, "stu_l1", "答案一").await;
        let b = answer(&scene, "stu_l2", "答案二").await;
        let (registry, calls) = scripted_registry(always_pass());

        let response = grade(&scene, &registry, vec![a, b], Some(scene.key_id))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(response.results.len(), 2);
        for result in response.results.values() {
            assert!(!result.is_success());
            assert!(result.message.contains("仅支持GPT和Qwen"));
        }
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        let scene = scene("partial", "qwen", true).await;
        let a = answer(&scene, "stu_pa", "答案 A").await;
        let b = answer(&scene, "stu_pb", "   ").await;
        let c = answer(&scene, "stu_pc", "答案 C").await;
        let (registry, calls) = scripted_registry(Box::new(|text| {
            if text.ends_with('C') {
                Err(JudgeError::JsonDecode)
            } else {
                Ok(JudgeVerdict {
                    score: 75.0,
                    reason: "尚可".into(),
                })
            }
        }));

        let response = grade(&scene, &registry, vec![a, b, c], Some(scene.key_id))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.results[&a], BatchItemResult::success(MSG_GRADED));
        assert_eq!(response.results[&b], BatchItemResult::error(MSG_UNREADABLE));
        assert_eq!(
            response.results[&c],
            BatchItemResult::error(MSG_JUDGE_FAILED)
        );
        assert_eq!(response.success_count(), 1);

        let c_rows = scene.storage.list_feedbacks(c).await.unwrap();
        assert_eq!(c_rows.len(), 1);
        assert_eq!(c_rows[0].score, 0.0);
        let reason = c_rows[0].feedback.as_deref().unwrap();
        assert!(reason.contains("JSON解析错误"));
    }

    #[tokio::test]
    async fn test_disabled_key_aborts_without_writes() {
        let scene = scene("disabled", "gpt", false).await;
        let a = answer(&scene, "stu_d", "答案").await;
        let (registry, calls) = scripted_registry(always_pass());

        let err = grade(&scene, &registry, vec![a], Some(scene.key_id))
            .await
            .unwrap_err();

        assert!(matches!(err, BatchGradeError::ApiKeyNotFound));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(scene.storage.list_feedbacks(a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_selection_aborts() {
        let scene = scene("nokey", "gpt", true).await;
        let a = answer(&scene, "stu_n", "答案").await;
        let (registry, _) = scripted_registry(always_pass());

        let err = grade(&scene, &registry, vec![a], None).await.unwrap_err();
        assert_eq!(err.to_string(), "请选择一个大模型进行评分。");
        assert!(scene.storage.list_feedbacks(a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_course_is_denied() {
        let scene = scene("foreign", "gpt", true).await;
        let (registry, _) = scripted_registry(always_pass());
        let outsider = TeacherPrincipal::new(scene.fx.teacher_id + 100, []);

        let err = run_batch(
            &scene.storage,
            &registry,
            &outsider,
            scene.fx.course_id,
            scene.fx.question_id,
            BatchGradeRequest {
                answer_ids: vec![],
                api_key_id: Some(scene.key_id),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BatchGradeError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_unknown_and_duplicate_answer_ids() {
        let scene = scene("dup", "gpt", true).await;
        let a = answer(&scene, "stu_dup", "答案").await;
        let (registry, calls) = scripted_registry(always_pass());

        let response = grade(&scene, &registry, vec![a, 9999, a], Some(scene.key_id))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.results.len(), 2);
        assert_eq!(
            response.results[&9999],
            BatchItemResult::error(MSG_ANSWER_MISSING)
        );
        assert_eq!(scene.storage.list_feedbacks(a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_panic_is_contained_to_item() {
        let scene = scene("panic", "gpt", true).await;
        let a = answer(&scene, "stu_panic", "答案").await;
        let judge: Arc<dyn JudgeAdapter> = Arc::new(PanickingJudge);
        let registry = JudgeRegistry::new().with_adapter(ModelFamily::Gpt, judge);

        let response = grade(&scene, &registry, vec![a], Some(scene.key_id))
            .await
            .unwrap();

        assert_eq!(response.results[&a], BatchItemResult::error(MSG_UNEXPECTED));
        let rows = scene.storage.list_feedbacks(a).await.unwrap();
        assert_eq!(rows[0].feedback.as_deref(), Some(MSG_UNEXPECTED));
    }

    #[tokio::test]
    async fn test_commit_failure_returns_storage_error() {
        let scene = scene("commit", "gpt", true).await;
        let kept = answer(&scene, "stu_kept", "答案一").await;
        let removed = answer(&scene, "stu_removed", "答案二").await;
        let judge: Arc<dyn JudgeAdapter> = Arc::new(DeletingJudge {
            storage: scene.storage.clone(),
            victim: removed,
            trigger: "答案二",
        });
        let registry = JudgeRegistry::new().with_adapter(ModelFamily::Gpt, judge);

        let err = grade(&scene, &registry, vec![kept, removed], Some(scene.key_id))
            .await
            .unwrap_err();

        assert!(matches!(err, BatchGradeError::Storage(_)));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // 整个事务回滚，先评完的答案也没有记录
        let rows = scene.storage.list_feedbacks(kept).await.unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup_ids(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
