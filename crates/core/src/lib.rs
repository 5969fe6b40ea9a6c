//! Core business logic for the superhero service.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The relational store and the object store are reached only through the
//! [`superhero::SuperheroRepository`] and [`storage::ObjectStore`] traits.
//!
//! # Modules
//!
//! - `storage` - Vendor-agnostic object storage on Apache OpenDAL
//! - `superhero` - Superhero records and their ordered image attachments

pub mod storage;
pub mod superhero;
