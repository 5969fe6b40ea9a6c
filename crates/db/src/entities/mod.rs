//! `SeaORM` entities.

pub mod superhero_images;
pub mod superheroes;
