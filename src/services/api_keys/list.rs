use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ApiKeyService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, api_keys::responses::ApiKeyInfo};
use crate::services::guards;

/// GET /api-keys
pub async fn list_api_keys(
    service: &ApiKeyService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_api_keys().await {
        Ok(keys) => {
            let items: Vec<ApiKeyInfo> = keys.iter().map(ApiKeyInfo::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items, "查询成功")))
        }
        Err(e) => Ok(guards::internal_error("查询 API Key 列表失败", e)),
    }
}

/// GET /api-keys/mine
pub async fn list_my_api_keys(
    service: &ApiKeyService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    match storage.list_teacher_enabled_api_keys(teacher_id).await {
        Ok(keys) => {
            let items: Vec<ApiKeyInfo> = keys.iter().map(ApiKeyInfo::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items, "查询成功")))
        }
        Err(e) => Ok(guards::internal_error("查询 API Key 列表失败", e)),
    }
}
