//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: Argon2id password hashing and JWT bearer tokens
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
pub mod security;
