//! AULA Core — domain models, repository traits, and error types shared
//! across all crates.
//!
//! This crate has no I/O: persistence lives behind the traits in
//! [`repository`], implemented by `aula-db`.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{AulaError, AulaResult};
