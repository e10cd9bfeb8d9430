pub mod prompt;
pub mod visibility;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::questions::requests::UpdatePromptRequest;
use crate::storage::Storage;

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
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

    // 切换试题公开状态
    pub async fn toggle_visibility(
        &self,
        request: &HttpRequest,
        course_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        visibility::toggle_visibility(self, request, course_id, question_id).await
    }

    // 修改评分提示词
    pub async fn update_prompt(
        &self,
        request: &HttpRequest,
        course_id: i64,
        question_id: i64,
        body: UpdatePromptRequest,
    ) -> ActixResult<HttpResponse> {
        prompt::update_prompt(self, request, course_id, question_id, body).await
    }
}
