//! Initial database migration.
//!
//! Creates the superheroes table and the ordered superhero_images table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(SUPERHEROES_SQL).await?;
        db.execute_unprepared(SUPERHERO_IMAGES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const SUPERHEROES_SQL: &str = r"
CREATE TABLE superheroes (
    id SERIAL PRIMARY KEY,
    nickname VARCHAR(255) NOT NULL,
    real_name VARCHAR(255),
    origin_description TEXT,
    superpowers TEXT,
    catch_phrase TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_nickname_not_blank CHECK (length(trim(nickname)) > 0)
);
";

const SUPERHERO_IMAGES_SQL: &str = r"
-- One row per stored object; url is the public URL of the object
CREATE TABLE superhero_images (
    id SERIAL PRIMARY KEY,
    superhero_id INTEGER NOT NULL REFERENCES superheroes(id) ON DELETE CASCADE,
    url TEXT NOT NULL UNIQUE,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sort_order_non_negative CHECK (sort_order >= 0)
);

-- Display order lookup (sort_order asc, ties by id)
CREATE INDEX idx_superhero_images_order ON superhero_images(superhero_id, sort_order, id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS superhero_images CASCADE;
DROP TABLE IF EXISTS superheroes CASCADE;
";
