use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ApiKeyService;
use crate::models::{
    ApiResponse, ErrorCode,
    api_keys::{requests::CreateApiKeyRequest, responses::ApiKeyInfo},
    users::entities::UserRole,
};
use crate::services::guards;

/// 校验 API Key 字段，返回第一条错误信息
pub(crate) fn validate_key_fields(
    model: Option<&str>,
    version: Option<&str>,
    key_value: Option<&str>,
) -> Result<(), &'static str> {
    let blank = |v: Option<&str>| v.is_some_and(|s| s.trim().is_empty());
    let too_long = |v: Option<&str>, max: usize| v.is_some_and(|s| s.chars().count() > max);

    if blank(model) || too_long(model, 50) {
        return Err("模型名称不能为空且不超过 50 个字符");
    }
    if blank(version) || too_long(version, 50) {
        return Err("模型版本不能为空且不超过 50 个字符");
    }
    if blank(key_value) || too_long(key_value, 255) {
        return Err("密钥不能为空且不超过 255 个字符");
    }
    Ok(())
}

/// POST /api-keys
pub async fn create_api_key(
    service: &ApiKeyService,
    request: &HttpRequest,
    body: CreateApiKeyRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_key_fields(
        Some(&body.model),
        Some(&body.version),
        Some(&body.key_value),
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    match storage.get_user_by_id(body.teacher_id).await {
        Ok(Some(user)) if user.role == UserRole::Teacher => {}
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "指定的教师不存在",
            )));
        }
        Err(e) => return Ok(guards::internal_error("查询教师失败", e)),
    }

    match storage.create_api_key(body).await {
        Ok(key) => {
            info!(key_id = key.id, teacher_id = key.teacher_id, model = %key.model, "新增 API Key");
            Ok(HttpResponse::Created().json(ApiResponse::success(
                ApiKeyInfo::from(&key),
                "API Key 创建成功",
            )))
        }
        Err(e) => Ok(guards::internal_error("创建 API Key 失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::validate_key_fields;

    #[test]
    fn test_validate_key_fields() {
        assert!(validate_key_fields(Some("gpt"), Some("gpt-4o"), Some("sk-1")).is_ok());
        // 未提供的字段不参与校验
        assert!(validate_key_fields(None, Some("qwen-plus"), None).is_ok());
        assert!(validate_key_fields(Some("  "), Some("v"), Some("k")).is_err());
        assert!(validate_key_fields(Some("gpt"), Some(&"v".repeat(51)), Some("k")).is_err());
        assert!(validate_key_fields(Some("gpt"), Some("v"), Some("")).is_err());
    }
}
