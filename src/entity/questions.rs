//! 试题实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub scoring_criteria: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub prompt: Option<String>,
    pub is_open: bool,
    pub open_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::student_answers::Entity")]
    StudentAnswers,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::student_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentAnswers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::questions::entities::Question {
        use crate::models::from_millis;

        crate::models::questions::entities::Question {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            content: self.content,
            scoring_criteria: self.scoring_criteria,
            prompt: self.prompt,
            is_open: self.is_open,
            open_at: self.open_at.map(from_millis),
            created_at: from_millis(self.created_at),
        }
    }
}
