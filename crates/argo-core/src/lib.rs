//! # argo-core
//!
//! Core types shared across all Argo crates:
//! - [`ResourceKind`], the four addressable resource types and their route names
//! - Stored record structs for agents, collections, objects and terms, plus the
//!   embedded value types (dates, notes, rights statements, references)
//! - Response shapes rendered by the API (list items, detail documents, pages)
//! - Cross-cutting error types

pub mod errors;
pub mod kind;
pub mod records;
pub mod responses;

pub use errors::CoreError;
pub use kind::ResourceKind;
