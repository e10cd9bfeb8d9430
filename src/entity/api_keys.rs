//! API Key 实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub model: String,
    pub version: String,
    pub key_value: String,
    pub status: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_api_key(self) -> crate::models::api_keys::entities::ApiKey {
        crate::models::api_keys::entities::ApiKey {
            id: self.id,
            teacher_id: self.teacher_id,
            model: self.model,
            version: self.version,
            key_value: self.key_value,
            status: self.status,
            created_at: crate::models::from_millis(self.created_at),
        }
    }
}
