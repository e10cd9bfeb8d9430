//! 试题存储操作

use super::{SeaOrmStorage, now_millis};
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{GraderError, Result};
use crate::models::questions::{entities::Question, requests::CreateQuestionRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建试题，新试题默认不公开
    pub async fn create_question_impl(
        &self,
        course_id: i64,
        req: CreateQuestionRequest,
    ) -> Result<Question> {
        let model = ActiveModel {
            course_id: Set(course_id),
            title: Set(req.title),
            content: Set(req.content),
            scoring_criteria: Set(req.scoring_criteria),
            prompt: Set(req.prompt),
            is_open: Set(false),
            open_at: Set(None),
            created_at: Set(now_millis()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("创建试题失败: {e}")))?;

        Ok(result.into_question())
    }

    /// 获取指定课程下的试题
    pub async fn get_question_in_course_impl(
        &self,
        course_id: i64,
        question_id: i64,
    ) -> Result<Option<Question>> {
        let result = Questions::find_by_id(question_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询试题失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    /// 切换公开状态
    ///
    /// 公开时若从未记录公开时间则写入当前时间；封闭时清空公开时间。
    pub async fn toggle_question_visibility_impl(
        &self,
        question_id: i64,
    ) -> Result<Option<Question>> {
        let Some(existing) = Questions::find_by_id(question_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询试题失败: {e}")))?
        else {
            return Ok(None);
        };

        let opening = !existing.is_open;
        let open_at = if opening {
            existing.open_at.or(Some(now_millis()))
        } else {
            None
        };

        let mut model: ActiveModel = existing.into();
        model.is_open = Set(opening);
        model.open_at = Set(open_at);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("更新试题状态失败: {e}")))?;

        Ok(Some(result.into_question()))
    }

    /// 修改评分提示词
    pub async fn update_question_prompt_impl(
        &self,
        question_id: i64,
        prompt: Option<String>,
    ) -> Result<Option<Question>> {
        let Some(existing) = Questions::find_by_id(question_id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询试题失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.prompt = Set(prompt);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("更新评分提示词失败: {e}")))?;

        Ok(Some(result.into_question()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_course, setup_storage};

    #[tokio::test]
    async fn test_toggle_visibility_sets_and_clears_open_at() {
        let storage = setup_storage().await;
        // seed_course 已经公开了一次
        let fx = seed_course(&storage, "vis").await;

        let opened = storage
            .get_question_in_course_impl(fx.course_id, fx.question_id)
            .await
            .unwrap()
            .unwrap();
        assert!(opened.is_open);
        assert!(opened.open_at.is_some());

        let closed = storage
            .toggle_question_visibility_impl(fx.question_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!closed.is_open);
        assert!(closed.open_at.is_none());

        let reopened = storage
            .toggle_question_visibility_impl(fx.question_id)
            .await
            .unwrap()
            .unwrap();
        assert!(reopened.is_open);
        assert!(reopened.open_at.is_some());
    }

    #[tokio::test]
    async fn test_question_scoped_to_course() {
        let storage = setup_storage().await;
        let fx = seed_course(&storage, "scope").await;
        let other = seed_course(&storage, "other").await;

        assert!(
            storage
                .get_question_in_course_impl(other.course_id, fx.question_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_prompt() {
        let storage = setup_storage().await;
        let fx = seed_course(&storage, "prompt").await;

        let updated = storage
            .update_question_prompt_impl(fx.question_id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.grading_prompt(), "");
        assert!(
            storage
                .update_question_prompt_impl(9999, Some("x".into()))
                .await
                .unwrap()
                .is_none()
        );
    }
}
