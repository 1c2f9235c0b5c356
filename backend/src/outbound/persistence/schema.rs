//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Every table
//! carries a nullable `deleted_at`; rows with it set are soft-deleted and
//! filtered out of every query.

diesel::table! {
    /// User accounts of every role.
    users (id) {
        id -> Int8,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Lowercased email, unique among live rows.
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// One of `patient`, `doctor`, `admin`.
        role -> Varchar,
        active -> Bool,
        last_login_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        /// Last modification timestamp (maintained by trigger).
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Professional profile of a doctor account (one per user).
    doctors (id) {
        id -> Int8,
        user_id -> Int8,
        specialization -> Varchar,
        qualification -> Varchar,
        experience_years -> Int4,
        bio -> Text,
        consultation_fee -> Float8,
        available -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Working windows declared by doctors.
    schedules (id) {
        id -> Int8,
        doctor_id -> Int8,
        date -> Date,
        start_time -> Time,
        end_time -> Time,
        is_available -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Booked consultations.
    ///
    /// `(doctor_id, start_time)` is unique among live rows
    /// (`appointments_doctor_slot_key`).
    appointments (id) {
        id -> Int8,
        patient_id -> Int8,
        doctor_id -> Int8,
        /// UTC calendar day of `start_time`.
        appointment_date -> Date,
        start_time -> Timestamptz,
        end_time -> Timestamptz,
        /// One of `pending`, `confirmed`, `cancelled`, `completed`.
        status -> Varchar,
        reason -> Nullable<Text>,
        notes -> Nullable<Text>,
        cancellation_reason -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(doctors -> users (user_id));
diesel::joinable!(schedules -> doctors (doctor_id));
diesel::joinable!(appointments -> doctors (doctor_id));
diesel::joinable!(appointments -> users (patient_id));

diesel::allow_tables_to_appear_in_same_query!(users, doctors, schedules, appointments);
