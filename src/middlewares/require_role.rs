/*!
 * 角色校验中间件
 *
 * 依赖 `RequireJWT` 先把当前用户写入请求扩展，这里只判断角色是否在允许列表内。
 * 课程试题作用域下教师与学生共用路径前缀，因此角色按资源或单条路由挂载：
 *
 * ```rust,ignore
 * web::scope("/api/v1/courses/{course_id}/questions/{question_id}")
 *     .wrap(RequireJWT)
 *     .service(web::resource("/answer").wrap(RequireRole::student()).route(...))
 *     .service(web::resource("/answers").route(get_list.wrap(RequireRole::teacher())))
 * ```
 *
 * `/api/v1/api-keys` 整体要求管理员，`/mine` 单独放行教师。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{
    middlewares::RequireJWT,
    models::{ErrorCode, users::entities::UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Vec<UserRole>,
}

impl RequireRole {
    /// 当前用户拥有任一给定角色即可通过
    pub fn any_of(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|role| (*role).clone()).collect(),
        }
    }

    pub fn teacher() -> Self {
        Self::any_of(UserRole::teacher_roles())
    }

    pub fn student() -> Self {
        Self::any_of(UserRole::student_roles())
    }

    pub fn admin() -> Self {
        Self::any_of(UserRole::admin_roles())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let (status, message) = match RequireJWT::extract_user_role(req.request()) {
                Some(role) if allowed.contains(&role) => {
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
                Some(role) => {
                    info!(path = req.path(), %role, "角色不在允许列表内");
                    (StatusCode::FORBIDDEN, "当前角色无权访问该接口")
                }
                // 未挂载 RequireJWT
                None => (StatusCode::UNAUTHORIZED, "Authentication required"),
            };

            let code = if status == StatusCode::FORBIDDEN {
                ErrorCode::Forbidden
            } else {
                ErrorCode::Unauthorized
            };
            let response = create_error_response(status, code, message);
            Ok(req.into_response(response.map_into_right_body()))
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpMessage, HttpResponse, test, web};

    use super::*;
    use crate::models::users::entities::{User, UserStatus};

    fn user_with(role: UserRole) -> User {
        User {
            id: 7,
            username: "role_check".to_string(),
            email: None,
            role,
            status: UserStatus::Active,
            created_at: chrono::Utc::now(),
        }
    }

    async fn status_for(user: Option<User>) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::resource("/prompt")
                    .wrap(RequireRole::teacher())
                    .wrap_fn(move |req, srv| {
                        if let Some(user) = user.clone() {
                            req.extensions_mut().insert(user);
                        }
                        srv.call(req)
                    })
                    .to(HttpResponse::Ok),
            ),
        )
        .await;
        let req = test::TestRequest::put().uri("/prompt").to_request();
        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_allowed_role_passes() {
        let status = status_for(Some(user_with(UserRole::Teacher))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_other_role_is_forbidden() {
        let status = status_for(Some(user_with(UserRole::Student))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_missing_user_is_unauthorized() {
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }
}
