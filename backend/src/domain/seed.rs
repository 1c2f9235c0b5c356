//! Demo account seeding.
//!
//! Creates the administrator and a handful of sample doctors through the same
//! repository and hasher ports registration uses. Accounts whose email is
//! already present are skipped, so reruns are harmless.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{
    NewAccount, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{
    DoctorDraft, DoctorValidationError, EmailAddress, PersonName, PlainPassword, Role,
    Specialization, UserValidationError,
};

/// Administrator created by the seeder.
pub const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin123";
const DOCTOR_PASSWORD: &str = "doctor123";

struct SampleDoctor {
    name: &'static str,
    email: &'static str,
    specialization: Specialization,
    qualification: &'static str,
    experience_years: i32,
    bio: &'static str,
    consultation_fee: f64,
}

const SAMPLE_DOCTORS: [SampleDoctor; 3] = [
    SampleDoctor {
        name: "Dr. John Smith",
        email: "john.smith@example.com",
        specialization: Specialization::Cardiology,
        qualification: "MD, FACC",
        experience_years: 10,
        bio: "Board-certified cardiologist focused on preventive care.",
        consultation_fee: 150.0,
    },
    SampleDoctor {
        name: "Dr. Sarah Johnson",
        email: "sarah.johnson@example.com",
        specialization: Specialization::Pediatrics,
        qualification: "MD, FAAP",
        experience_years: 8,
        bio: "Pediatrician caring for children from newborns to teens.",
        consultation_fee: 120.0,
    },
    SampleDoctor {
        name: "Dr. Michael Brown",
        email: "michael.brown@example.com",
        specialization: Specialization::Orthopedics,
        qualification: "MD, FAAOS",
        experience_years: 15,
        bio: "Orthopedic surgeon specialising in sports injuries.",
        consultation_fee: 180.0,
    },
];

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A built-in account failed validation.
    #[error("seed account is invalid: {0}")]
    InvalidAccount(#[from] UserValidationError),
    /// A built-in doctor profile failed validation.
    #[error("seed doctor profile is invalid: {0}")]
    InvalidDoctor(#[from] DoctorValidationError),
    /// Hashing a seed password failed.
    #[error("seed password hashing failed: {0}")]
    Hash(#[from] PasswordHashError),
    /// The user repository failed.
    #[error("seed persistence failed: {0}")]
    Persistence(#[from] UserPersistenceError),
}

/// How many seed accounts were created and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    pub created: usize,
    pub skipped: usize,
}

/// Creates the demo accounts.
#[derive(Clone)]
pub struct Seeder<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> Seeder<U, H> {
    /// Create a seeder over the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<U, H> Seeder<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    /// Create every missing demo account.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] when hashing or persistence fails.
    pub async fn run(&self) -> Result<SeedOutcome, SeedError> {
        let mut outcome = SeedOutcome::default();

        let admin = self
            .account("Admin User", ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin, None)
            .await?;
        self.create(admin, &mut outcome).await?;

        for sample in &SAMPLE_DOCTORS {
            let draft = DoctorDraft::new(
                sample.specialization,
                sample.qualification,
                sample.experience_years,
                sample.bio,
                sample.consultation_fee,
            )?;
            let account = self
                .account(
                    sample.name,
                    sample.email,
                    DOCTOR_PASSWORD,
                    Role::Doctor,
                    Some(draft),
                )
                .await?;
            self.create(account, &mut outcome).await?;
        }

        info!(
            created = outcome.created,
            skipped = outcome.skipped,
            "seed data applied"
        );
        Ok(outcome)
    }

    async fn account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        doctor: Option<DoctorDraft>,
    ) -> Result<Option<NewAccount>, SeedError> {
        let email = EmailAddress::new(email)?;
        if self.users.find_by_email(&email).await?.is_some() {
            debug!(%email, "seed account exists");
            return Ok(None);
        }
        let password_hash = self
            .hasher
            .hash(&PlainPassword::unchecked(password))
            .await?;
        Ok(Some(NewAccount {
            name: PersonName::new(name)?,
            email,
            password_hash,
            role,
            doctor,
        }))
    }

    async fn create(
        &self,
        account: Option<NewAccount>,
        outcome: &mut SeedOutcome,
    ) -> Result<(), SeedError> {
        let Some(account) = account else {
            outcome.skipped += 1;
            return Ok(());
        };
        match self.users.create_account(&account).await {
            Ok(created) => {
                debug!(user_id = %created.user.id, role = %created.user.role, "seed account created");
                outcome.created += 1;
                Ok(())
            }
            Err(UserPersistenceError::DuplicateEmail { .. }) => {
                outcome.skipped += 1;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
