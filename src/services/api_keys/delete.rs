use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ApiKeyService;
use crate::models::{
    ApiResponse, ErrorCode,
    api_keys::{requests::DeleteApiKeysRequest, responses::DeleteApiKeysResponse},
};
use crate::services::guards;

/// DELETE /api-keys
pub async fn delete_api_keys(
    service: &ApiKeyService,
    request: &HttpRequest,
    body: DeleteApiKeysRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if body.ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "请选择要删除的 API Key",
        )));
    }

    match storage.delete_api_keys(&body.ids).await {
        Ok(deleted) => {
            info!(deleted, "批量删除 API Key");
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                DeleteApiKeysResponse { deleted },
                format!("已删除 {deleted} 个 API Key"),
            )))
        }
        Err(e) => Ok(guards::internal_error("删除 API Key 失败", e)),
    }
}
