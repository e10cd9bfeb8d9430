pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::api_keys::requests::{
    CreateApiKeyRequest, DeleteApiKeysRequest, UpdateApiKeyRequest,
};
use crate::storage::Storage;

pub struct ApiKeyService {
    storage: Option<Arc<dyn Storage>>,
}

impl ApiKeyService {
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

    // 列出全部 API Key（管理员）
    pub async fn list_api_keys(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_api_keys(self, request).await
    }

    // 当前教师可用的 API Key
    pub async fn list_my_api_keys(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_api_keys(self, request).await
    }

    pub async fn create_api_key(
        &self,
        request: &HttpRequest,
        body: CreateApiKeyRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_api_key(self, request, body).await
    }

    pub async fn update_api_key(
        &self,
        request: &HttpRequest,
        key_id: i64,
        body: UpdateApiKeyRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_api_key(self, request, key_id, body).await
    }

    // 切换启用状态
    pub async fn toggle_api_key(
        &self,
        request: &HttpRequest,
        key_id: i64,
    ) -> ActixResult<HttpResponse> {
        update::toggle_api_key(self, request, key_id).await
    }

    // 批量删除
    pub async fn delete_api_keys(
        &self,
        request: &HttpRequest,
        body: DeleteApiKeysRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_api_keys(self, request, body).await
    }
}
