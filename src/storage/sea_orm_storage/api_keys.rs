//! API Key 存储操作

use super::{SeaOrmStorage, now_millis};
use crate::entity::api_keys::{ActiveModel, Column, Entity as ApiKeys};
use crate::errors::{GraderError, Result};
use crate::models::api_keys::{
    entities::ApiKey,
    requests::{CreateApiKeyRequest, UpdateApiKeyRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建 API Key，默认启用
    pub async fn create_api_key_impl(&self, req: CreateApiKeyRequest) -> Result<ApiKey> {
        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            model: Set(req.model),
            version: Set(req.version),
            key_value: Set(req.key_value),
            status: Set(req.status.unwrap_or(true)),
            created_at: Set(now_millis()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("创建 API Key 失败: {e}")))?;

        Ok(result.into_api_key())
    }

    /// 通过 ID 获取 API Key
    pub async fn get_api_key_by_id_impl(&self, key_id: i64) -> Result<Option<ApiKey>> {
        let result = ApiKeys::find_by_id(key_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询 API Key 失败: {e}")))?;

        Ok(result.map(|m| m.into_api_key()))
    }

    /// 列出全部 API Key
    pub async fn list_api_keys_impl(&self) -> Result<Vec<ApiKey>> {
        let rows = ApiKeys::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询 API Key 列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_api_key()).collect())
    }

    /// 教师名下已启用的 API Key
    pub async fn list_teacher_enabled_api_keys_impl(&self, teacher_id: i64) -> Result<Vec<ApiKey>> {
        let rows = ApiKeys::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::Status.eq(true))
            .order_by_asc(Column::Model)
            .order_by_asc(Column::Version)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询 API Key 列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_api_key()).collect())
    }

    /// 解析评分使用的 API Key
    ///
    /// 只返回属于该教师且处于启用状态的 Key；停用或他人的 Key 一律视为不存在。
    pub async fn resolve_api_key_impl(
        &self,
        key_id: i64,
        teacher_id: i64,
    ) -> Result<Option<ApiKey>> {
        let result = ApiKeys::find_by_id(key_id)
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::Status.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询 API Key 失败: {e}")))?;

        Ok(result.map(|m| m.into_api_key()))
    }

    /// 更新 API Key
    pub async fn update_api_key_impl(
        &self,
        key_id: i64,
        update: UpdateApiKeyRequest,
    ) -> Result<Option<ApiKey>> {
        let Some(existing) = ApiKeys::find_by_id(key_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询 API Key 失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(teacher_id);
        }
        if let Some(name) = update.model {
            model.model = Set(name);
        }
        if let Some(version) = update.version {
            model.version = Set(version);
        }
        if let Some(key_value) = update.key_value {
            model.key_value = Set(key_value);
        }
        if let Some(status) = update.status {
            model.status = Set(status);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("更新 API Key 失败: {e}")))?;

        Ok(Some(result.into_api_key()))
    }

    /// 切换启用状态
    pub async fn toggle_api_key_status_impl(&self, key_id: i64) -> Result<Option<ApiKey>> {
        let Some(existing) = ApiKeys::find_by_id(key_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询 API Key 失败: {e}")))?
        else {
            return Ok(None);
        };

        let status = !existing.status;
        let mut model: ActiveModel = existing.into();
        model.status = Set(status);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("更新 API Key 状态失败: {e}")))?;

        Ok(Some(result.into_api_key()))
    }

    /// 批量删除
    pub async fn delete_api_keys_impl(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = ApiKeys::delete_many()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("删除 API Key 失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
