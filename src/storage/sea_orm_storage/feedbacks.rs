//! 评分反馈存储操作

use super::{SeaOrmStorage, now_millis};
use crate::entity::scoring_feedbacks::{ActiveModel, Column, Entity as ScoringFeedbacks};
use crate::entity::student_answers::{ActiveModel as AnswerActiveModel, Entity as StudentAnswers};
use crate::errors::{GraderError, Result};
use crate::models::feedbacks::entities::{
    FinalizeOutcome, NewFeedback, ScoringFeedback, is_valid_score,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

fn provisional_model(feedback: NewFeedback, created_at: i64) -> ActiveModel {
    ActiveModel {
        answer_id: Set(feedback.answer_id),
        score: Set(feedback.score),
        feedback: Set(Some(feedback.feedback)),
        created_at: Set(created_at),
        is_final: Set(false),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 在同一事务中追加多条临时评分，任一失败则全部回滚
    pub async fn record_provisional_feedbacks_impl(
        &self,
        feedbacks: Vec<NewFeedback>,
    ) -> Result<u64> {
        if feedbacks.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GraderError::database_operation(format!("开启事务失败: {e}")))?;

        let mut written = 0u64;
        for feedback in feedbacks {
            // 逐条取时间，保证同一批次内的顺序与迭代顺序一致
            provisional_model(feedback, now_millis())
                .insert(&txn)
                .await
                .map_err(|e| GraderError::database_operation(format!("写入评分失败: {e}")))?;
            written += 1;
        }

        txn.commit()
            .await
            .map_err(|e| GraderError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(written)
    }

    /// 确认评分
    ///
    /// 已有评分时把最新一条原地改为最终评分（未提供的字段保持不变）；
    /// 没有任何评分时新建一条最终评分，此时必须提供分数。
    /// 事务内先写答案的确认时间，使同一答案的并发确认串行执行。
    pub async fn finalize_feedback_impl(
        &self,
        answer_id: i64,
        score: Option<f64>,
        feedback: Option<String>,
    ) -> Result<FinalizeOutcome> {
        if let Some(score) = score
            && !is_valid_score(score)
        {
            return Err(GraderError::validation(format!(
                "分数必须在 0 到 200 之间: {score}"
            )));
        }
        let feedback = feedback.filter(|f| !f.trim().is_empty());

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GraderError::database_operation(format!("开启事务失败: {e}")))?;

        let answer = StudentAnswers::find_by_id(answer_id)
            .one(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询答案失败: {e}")))?
            .ok_or_else(|| GraderError::not_found(format!("答案不存在: {answer_id}")))?;

        let now = now_millis();
        let mut answer_model: AnswerActiveModel = answer.into();
        answer_model.confirmed_at = Set(Some(now));
        answer_model
            .update(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("更新确认时间失败: {e}")))?;

        let latest = ScoringFeedbacks::find()
            .filter(Column::AnswerId.eq(answer_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&txn)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询评分失败: {e}")))?;

        let outcome = match latest {
            Some(existing) => {
                let mut model: ActiveModel = existing.into();
                if let Some(score) = score {
                    model.score = Set(score);
                }
                if let Some(feedback) = feedback {
                    model.feedback = Set(Some(feedback));
                }
                model.is_final = Set(true);
                model.created_at = Set(now);

                let updated = model
                    .update(&txn)
                    .await
                    .map_err(|e| GraderError::database_operation(format!("更新评分失败: {e}")))?;
                FinalizeOutcome::Updated(updated.into_feedback())
            }
            None => {
                let score = score.ok_or_else(|| {
                    GraderError::validation("该答案尚无评分记录，确认评分时必须提供分数")
                })?;
                let model = ActiveModel {
                    answer_id: Set(answer_id),
                    score: Set(score),
                    feedback: Set(feedback),
                    created_at: Set(now),
                    is_final: Set(true),
                    ..Default::default()
                };

                let created = model
                    .insert(&txn)
                    .await
                    .map_err(|e| GraderError::database_operation(format!("写入评分失败: {e}")))?;
                FinalizeOutcome::Created(created.into_feedback())
            }
        };

        txn.commit()
            .await
            .map_err(|e| GraderError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(outcome)
    }

    /// 答案的全部评分，按时间倒序
    pub async fn list_feedbacks_impl(&self, answer_id: i64) -> Result<Vec<ScoringFeedback>> {
        let rows = ScoringFeedbacks::find()
            .filter(Column::AnswerId.eq(answer_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_feedback()).collect())
    }

    async fn latest_feedback_by_kind(
        &self,
        answer_id: i64,
        is_final: bool,
    ) -> Result<Option<ScoringFeedback>> {
        let result = ScoringFeedbacks::find()
            .filter(Column::AnswerId.eq(answer_id))
            .filter(Column::IsFinal.eq(is_final))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| GraderError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_feedback()))
    }

    /// 可导入的评分：优先最新临时评分，其次最新最终评分
    pub async fn get_importable_feedback_impl(
        &self,
        answer_id: i64,
    ) -> Result<Option<ScoringFeedback>> {
        if let Some(provisional) = self.latest_feedback_by_kind(answer_id, false).await? {
            return Ok(Some(provisional));
        }
        self.latest_feedback_by_kind(answer_id, true).await
    }

    /// 最新的最终评分
    pub async fn get_latest_final_feedback_impl(
        &self,
        answer_id: i64,
    ) -> Result<Option<ScoringFeedback>> {
        self.latest_feedback_by_kind(answer_id, true).await
    }
}
