//! `SeaORM` Entity for superheroes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "superheroes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nickname: String,
    pub real_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub origin_description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub superpowers: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub catch_phrase: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::superhero_images::Entity")]
    SuperheroImages,
}

impl Related<super::superhero_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuperheroImages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
