//! 学生答案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub question_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub submitted_at: i64,
    pub confirmed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::scoring_feedbacks::Entity")]
    ScoringFeedbacks,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::scoring_feedbacks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScoringFeedbacks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::models::answers::entities::StudentAnswer {
        use crate::models::from_millis;

        crate::models::answers::entities::StudentAnswer {
            id: self.id,
            question_id: self.question_id,
            student_id: self.student_id,
            content: self.content,
            submitted_at: from_millis(self.submitted_at),
            confirmed_at: self.confirmed_at.map(from_millis),
        }
    }
}
