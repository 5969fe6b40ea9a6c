//! `SeaORM` Entity for superhero_images table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "superhero_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub superhero_id: i32,
    #[sea_orm(column_type = "Text", unique)]
    pub url: String,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::superheroes::Entity",
        from = "Column::SuperheroId",
        to = "super::superheroes::Column::Id",
        on_delete = "Cascade"
    )]
    Superheroes,
}

impl Related<super::superheroes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Superheroes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
