pub mod batch;
pub mod finalize;
pub mod import;
pub mod overview;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::judge::JudgeRegistry;
use crate::models::{
    feedbacks::requests::FinalizeFeedbackRequest, grading::requests::BatchGradeRequest,
};
use crate::storage::Storage;

pub struct GradingService {
    storage: Option<Arc<dyn Storage>>,
    registry: Option<Arc<JudgeRegistry>>,
}

impl GradingService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            registry: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_registry(&self, request: &HttpRequest) -> Arc<JudgeRegistry> {
        if let Some(registry) = &self.registry {
            registry.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<JudgeRegistry>>>()
                .expect("JudgeRegistry not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 批量智能评分
    pub async fn batch_grade(
        &self,
        request: &HttpRequest,
        course_id: i64,
        question_id: i64,
        body: BatchGradeRequest,
    ) -> ActixResult<HttpResponse> {
        batch::batch_grade(self, request, course_id, question_id, body).await
    }

    // 试题下全部答案的批改概况
    pub async fn list_answers(
        &self,
        request: &HttpRequest,
        course_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        overview::list_answers(self, request, course_id, question_id).await
    }

    // 导入评价
    pub async fn import_feedback(
        &self,
        request: &HttpRequest,
        course_id: i64,
        question_id: i64,
        answer_id: i64,
    ) -> ActixResult<HttpResponse> {
        import::import_feedback(self, request, course_id, question_id, answer_id).await
    }

    // 确认并发布评价
    pub async fn finalize_feedback(
        &self,
        request: &HttpRequest,
        course_id: i64,
        question_id: i64,
        answer_id: i64,
        body: FinalizeFeedbackRequest,
    ) -> ActixResult<HttpResponse> {
        finalize::finalize_feedback(self, request, course_id, question_id, answer_id, body).await
    }
}
