use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ApiKeyService;
use super::create::validate_key_fields;
use crate::models::{
    ApiResponse, ErrorCode,
    api_keys::{requests::UpdateApiKeyRequest, responses::ApiKeyInfo},
    users::entities::UserRole,
};
use crate::services::guards;

/// PUT /api-keys/{id}
pub async fn update_api_key(
    service: &ApiKeyService,
    request: &HttpRequest,
    key_id: i64,
    body: UpdateApiKeyRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_key_fields(
        body.model.as_deref(),
        body.version.as_deref(),
        body.key_value.as_deref(),
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    if let Some(teacher_id) = body.teacher_id {
        match storage.get_user_by_id(teacher_id).await {
            Ok(Some(user)) if user.role == UserRole::Teacher => {}
            Ok(_) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "指定的教师不存在",
                )));
            }
            Err(e) => return Ok(guards::internal_error("查询教师失败", e)),
        }
    }

    match storage.update_api_key(key_id, body).await {
        Ok(Some(key)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ApiKeyInfo::from(&key),
            "API Key 更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ApiKeyNotFound,
            "API Key 不存在",
        ))),
        Err(e) => Ok(guards::internal_error("更新 API Key 失败", e)),
    }
}

/// PATCH /api-keys/{id}/status
pub async fn toggle_api_key(
    service: &ApiKeyService,
    request: &HttpRequest,
    key_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.toggle_api_key_status(key_id).await {
        Ok(Some(key)) => {
            info!(key_id, enabled = key.status, "API Key 状态已切换");
            let message = if key.status {
                "API Key 已启用"
            } else {
                "API Key 已停用"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(ApiKeyInfo::from(&key), message)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ApiKeyNotFound,
            "API Key 不存在",
        ))),
        Err(e) => Ok(guards::internal_error("更新 API Key 状态失败", e)),
    }
}
