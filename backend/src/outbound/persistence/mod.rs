//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Business rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Soft delete**: every read filters `deleted_at IS NULL`.
//! - **Strongly typed errors**: Diesel and pool failures map onto each
//!   port's error enum; known unique indexes map onto domain variants.
//!
//! # Example
//!
//! ```no_run
//! use booking_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/doctor_booking")).await?;
//! let users = DieselUserRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_appointment_repository;
mod diesel_doctor_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_doctor_repository::DieselDoctorRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
