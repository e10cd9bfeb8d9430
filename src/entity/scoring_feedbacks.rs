//! 评分反馈实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scoring_feedbacks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub answer_id: i64,
    pub score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub created_at: i64,
    pub is_final: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_answers::Entity",
        from = "Column::AnswerId",
        to = "super::student_answers::Column::Id"
    )]
    Answer,
}

impl Related<super::student_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_feedback(self) -> crate::models::feedbacks::entities::ScoringFeedback {
        crate::models::feedbacks::entities::ScoringFeedback {
            id: self.id,
            answer_id: self.answer_id,
            score: self.score,
            feedback: self.feedback,
            created_at: crate::models::from_millis(self.created_at),
            is_final: self.is_final,
        }
    }
}
