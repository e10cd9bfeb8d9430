//! 学生答案存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, now_millis};
use crate::entity::scoring_feedbacks::{
    Column as FeedbackColumn, Entity as ScoringFeedbacks, Model as FeedbackModel,
};
use crate::entity::student_answers::{ActiveModel, Column, Entity as StudentAnswers};
use crate::errors::{GraderError, Result};
use crate::models::{
    answers::entities::{StudentAnswer, SubmitOutcome},
    feedbacks::responses::AnswerFeedbackOverview,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 学生对某题的最新答案
    pub async fn get_latest_answer_impl(
        &self,
        question_id: i64,
        student_id: i64,
    ) -> Result<Option<StudentAnswer>> {
        let result = StudentAnswers::find()
            .filter(Column::QuestionId.eq(question_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询答案失败: {e}")))?;

        Ok(result.map(|m| m.into_answer()))
    }

    /// 获取属于某题的答案
    pub async fn get_answer_in_question_impl(
        &self,
        question_id: i64,
        answer_id: i64,
    ) -> Result<Option<StudentAnswer>> {
        let result = StudentAnswers::find_by_id(answer_id)
            .filter(Column::QuestionId.eq(question_id))
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询答案失败: {e}")))?;

        Ok(result.map(|m| m.into_answer()))
    }

    /// 提交答案
    pub async fn submit_answer_impl(
        &self,
        question_id: i64,
        student_id: i64,
        content: String,
    ) -> Result<(StudentAnswer, SubmitOutcome)> {
        if let Some(existing) = self.get_latest_answer_impl(question_id, student_id).await? {
            let replaced = self
                .replace_answer_content_impl(existing.id, content)
                .await?
                .ok_or_else(|| GraderError::not_found("答案不存在"))?;
            return Ok((replaced, SubmitOutcome::Replaced));
        }

        let model = ActiveModel {
            question_id: Set(question_id),
            student_id: Set(student_id),
            content: Set(Some(content)),
            submitted_at: Set(now_millis()),
            confirmed_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("提交答案失败: {e}")))?;

        Ok((result.into_answer(), SubmitOutcome::Created))
    }

    /// 覆盖答案内容
    ///
    /// 与内容写入处于同一事务：重置提交时间、清空确认时间、删除该答案的全部评分。
    pub async fn replace_answer_content_impl(
        &self,
        answer_id: i64,
        content: String,
    ) -> Result<Option<StudentAnswer>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GraderError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = StudentAnswers::find_by_id(answer_id)
            .one(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询答案失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.content = Set(Some(content));
        model.submitted_at = Set(now_millis());
        model.confirmed_at = Set(None);

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("更新答案失败: {e}")))?;

        ScoringFeedbacks::delete_many()
            .filter(FeedbackColumn::AnswerId.eq(answer_id))
            .exec(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("清除历史评分失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GraderError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_answer()))
    }

    /// 某题全部答案的评分概况
    pub async fn list_question_answer_overviews_impl(
        &self,
        question_id: i64,
    ) -> Result<Vec<AnswerFeedbackOverview>> {
        let answers = StudentAnswers::find()
            .filter(Column::QuestionId.eq(question_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询答案列表失败: {e}")))?;

        let answer_ids: Vec<i64> = answers.iter().map(|a| a.id).collect();
        let feedbacks = if answer_ids.is_empty() {
            Vec::new()
        } else {
            ScoringFeedbacks::find()
                .filter(FeedbackColumn::AnswerId.is_in(answer_ids))
                .order_by_desc(FeedbackColumn::CreatedAt)
                .order_by_desc(FeedbackColumn::Id)
                .all(&self.db)
                .await
                .map_err(|e| GraderError::database_operation(format!("查询评分列表失败: {e}")))?
        };

        // 已按时间倒序，每组第一条即最新
        let mut grouped: HashMap<i64, Vec<FeedbackModel>> = HashMap::new();
        for feedback in feedbacks {
            grouped
                .entry(feedback.answer_id)
                .or_default()
                .push(feedback);
        }

        let overviews = answers
            .into_iter()
            .map(|answer| {
                let rows = grouped.remove(&answer.id).unwrap_or_default();
                let latest_feedback = rows.first().cloned().map(|m| m.into_feedback());
                let final_feedback = rows
                    .iter()
                    .find(|m| m.is_final)
                    .cloned()
                    .map(|m| m.into_feedback());
                let current_feedback = final_feedback.clone().or_else(|| latest_feedback.clone());

                AnswerFeedbackOverview {
                    answer: answer.into_answer(),
                    has_feedback: latest_feedback.is_some(),
                    latest_feedback,
                    final_feedback,
                    current_feedback,
                }
            })
            .collect();

        Ok(overviews)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{add_provisional, seed_course, seed_student, setup_storage};
    use crate::models::answers::entities::SubmitOutcome;

    #[tokio::test]
    async fn test_replace_content_removes_all_feedback() {
        let storage = setup_storage().await;
        let fx = seed_course(&storage, "replace").await;
        let student = seed_student(&storage, "stu_replace", fx.course_id).await;

        let (answer, outcome) = storage
            .submit_answer_impl(fx.question_id, student, "旧答案".into())
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Created);

        add_provisional(&storage, answer.id, 60.0, "一般").await;
        add_provisional(&storage, answer.id, 70.0, "尚可").await;
        storage
            .finalize_feedback_impl(answer.id, Some(75.0), None)
            .await
            .unwrap();
        let feedbacks = storage.list_feedbacks_impl(answer.id).await.unwrap();
        assert_eq!(feedbacks.len(), 2);

        let replaced = storage
            .replace_answer_content_impl(answer.id, "新答案".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.content.as_deref(), Some("新答案"));
        assert!(replaced.confirmed_at.is_none());
        let feedbacks = storage.list_feedbacks_impl(answer.id).await.unwrap();
        assert!(feedbacks.is_empty());
    }

    #[tokio::test]
    async fn test_resubmission_reuses_answer_row() {
        let storage = setup_storage().await;
        let fx = seed_course(&storage, "resubmit").await;
        let student = seed_student(&storage, "stu_resubmit", fx.course_id).await;

        let (first, _) = storage
            .submit_answer_impl(fx.question_id, student, "v1".into())
            .await
            .unwrap();
        add_provisional(&storage, first.id, 10.0, "差").await;

        let (second, outcome) = storage
            .submit_answer_impl(fx.question_id, student, "v2".into())
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Replaced);
        assert_eq!(second.id, first.id);
        assert!(second.submitted_at >= first.submitted_at);
        let feedbacks = storage.list_feedbacks_impl(first.id).await.unwrap();
        assert!(feedbacks.is_empty());

        let latest = storage
            .get_latest_answer_impl(fx.question_id, student)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.content.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_replace_missing_answer() {
        let storage = setup_storage().await;
        assert!(
            storage
                .replace_answer_content_impl(404, "x".into())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_answer_overview_prefers_final_feedback() {
        let storage = setup_storage().await;
        let fx = seed_course(&storage, "overview").await;
        let s1 = seed_student(&storage, "stu_o1", fx.course_id).await;
        let s2 = seed_student(&storage, "stu_o2", fx.course_id).await;

        let (a1, _) = storage
            .submit_answer_impl(fx.question_id, s1, "答案一".into())
            .await
            .unwrap();
        storage
            .submit_answer_impl(fx.question_id, s2, "答案二".into())
            .await
            .unwrap();

        storage
            .finalize_feedback_impl(a1.id, Some(90.0), Some("很好".into()))
            .await
            .unwrap();
        add_provisional(&storage, a1.id, 40.0, "重新评分").await;

        let overviews = storage
            .list_question_answer_overviews_impl(fx.question_id)
            .await
            .unwrap();
        assert_eq!(overviews.len(), 2);

        let first = overviews.iter().find(|o| o.answer.id == a1.id).unwrap();
        assert!(first.has_feedback);
        assert_eq!(first.latest_feedback.as_ref().unwrap().score, 40.0);
        assert_eq!(first.final_feedback.as_ref().unwrap().score, 90.0);
        assert_eq!(first.current_feedback.as_ref().unwrap().score, 90.0);

        let second = overviews.iter().find(|o| o.answer.id != a1.id).unwrap();
        assert!(!second.has_feedback);
        assert!(second.current_feedback.is_none());
    }
}
