pub mod submit;
pub mod view;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::answers::requests::SubmitAnswerRequest;
use crate::storage::Storage;

pub struct AnswerService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnswerService {
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

    // 提交或重新提交答案
    pub async fn submit_answer(
        &self,
        request: &HttpRequest,
        course_id: i64,
        question_id: i64,
        body: SubmitAnswerRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_answer(self, request, course_id, question_id, body).await
    }

    // 查看自己的答案与已发布的评价
    pub async fn get_my_answer(
        &self,
        request: &HttpRequest,
        course_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        view::get_my_answer(self, request, course_id, question_id).await
    }
}
