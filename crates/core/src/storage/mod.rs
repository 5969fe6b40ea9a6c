//! Object storage for superhero images using Apache OpenDAL.
//!
//! Images go to an S3-compatible bucket (Cloudflare R2 in production) and to
//! OpenDAL's in-memory service in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Apache OpenDAL                              │
//! │                   (Unified Storage API)                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ op.write_with("key", data) │ op.stat("key")                     │
//! │ op.delete("key")           │                                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rest of the crate only sees the [`ObjectStore`] trait.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{ObjectStore, StorageService};
