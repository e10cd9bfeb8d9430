use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::api_keys::requests::{
    CreateApiKeyRequest, DeleteApiKeysRequest, UpdateApiKeyRequest,
};
use crate::services::ApiKeyService;

// 懒加载的全局 ApiKeyService 实例
static API_KEY_SERVICE: Lazy<ApiKeyService> = Lazy::new(ApiKeyService::new_lazy);

pub async fn list_api_keys(req: HttpRequest) -> ActixResult<HttpResponse> {
    API_KEY_SERVICE.list_api_keys(&req).await
}

pub async fn list_my_api_keys(req: HttpRequest) -> ActixResult<HttpResponse> {
    API_KEY_SERVICE.list_my_api_keys(&req).await
}

pub async fn create_api_key(
    req: HttpRequest,
    body: web::Json<CreateApiKeyRequest>,
) -> ActixResult<HttpResponse> {
    API_KEY_SERVICE
        .create_api_key(&req, body.into_inner())
        .await
}

pub async fn update_api_key(
    req: HttpRequest,
    key_id: web::Path<i64>,
    body: web::Json<UpdateApiKeyRequest>,
) -> ActixResult<HttpResponse> {
    API_KEY_SERVICE
        .update_api_key(&req, key_id.into_inner(), body.into_inner())
        .await
}

pub async fn toggle_api_key(req: HttpRequest, key_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    API_KEY_SERVICE
        .toggle_api_key(&req, key_id.into_inner())
        .await
}

pub async fn delete_api_keys(
    req: HttpRequest,
    body: web::Json<DeleteApiKeysRequest>,
) -> ActixResult<HttpResponse> {
    API_KEY_SERVICE
        .delete_api_keys(&req, body.into_inner())
        .await
}

// 配置路由
pub fn configure_api_keys_routes(cfg: &mut web::ServiceConfig) {
    let admin = RequireRole::admin;

    let keys = web::resource("")
        .route(web::get().to(list_api_keys).wrap(admin()))
        .route(web::post().to(create_api_key).wrap(admin()))
        .route(web::delete().to(delete_api_keys).wrap(admin()));
    let mine = web::resource("/mine")
        .wrap(RequireRole::teacher())
        .route(web::get().to(list_my_api_keys));
    let update = web::put().to(update_api_key).wrap(admin());
    let toggle = web::patch().to(toggle_api_key).wrap(admin());

    cfg.service(
        web::scope("/api/v1/api-keys")
            .wrap(RequireJWT)
            .service(keys)
            // 必须先于 /{key_id} 注册
            .service(mine)
            .service(web::resource("/{key_id}").route(update))
            .service(web::resource("/{key_id}/status").route(toggle)),
    );
}
