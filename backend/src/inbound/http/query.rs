//! Query-string parameters.
//!
//! Every field is a raw optional string; the `parse` methods turn them into
//! domain filters and report the offending parameter on failure.

use chrono::NaiveDate;
use pagination::PageRequest;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::{DoctorListFilter, UserListFilter};
use crate::domain::{AdminAppointmentFilter, AppointmentFilter, Error};

use super::validation::{
    FieldName, parse_optional_bool, parse_optional_date, parse_optional_id, parse_optional_role,
    parse_optional_specialization, parse_optional_status, parse_page,
};

/// Filters for the public doctor directory.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DoctorListQuery {
    /// Exact specialization, case-insensitive.
    pub specialization: Option<String>,
    /// Case-insensitive substring of the doctor's name.
    pub name: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl DoctorListQuery {
    pub(crate) fn parse(self) -> Result<(DoctorListFilter, PageRequest), Error> {
        let page = parse_page(self.page.as_deref(), self.limit.as_deref())?;
        let filter = DoctorListFilter {
            specialization: parse_optional_specialization(
                self.specialization,
                FieldName::new("specialization"),
            )?,
            name: self
                .name
                .map(|raw| raw.trim().to_owned())
                .filter(|raw| !raw.is_empty()),
        };
        Ok((filter, page))
    }
}

/// `?date=YYYY-MM-DD`, defaulting to today.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Calendar day as `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl AvailabilityQuery {
    pub(crate) fn parse(self) -> Result<Option<NaiveDate>, Error> {
        parse_optional_date(self.date, FieldName::new("date"))
    }
}

/// Status and inclusive date-range filters for appointment lists.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentListQuery {
    pub status: Option<String>,
    /// Earliest appointment day, inclusive.
    pub start_date: Option<String>,
    /// Latest appointment day, inclusive.
    pub end_date: Option<String>,
}

impl AppointmentListQuery {
    pub(crate) fn parse(self) -> Result<AppointmentFilter, Error> {
        Ok(AppointmentFilter {
            status: parse_optional_status(self.status, FieldName::new("status"))?,
            from: parse_optional_date(self.start_date, FieldName::new("start_date"))?,
            to: parse_optional_date(self.end_date, FieldName::new("end_date"))?,
        })
    }
}

/// Filters for `GET /admin/users`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminUserQuery {
    pub role: Option<String>,
    pub active: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl AdminUserQuery {
    pub(crate) fn parse(self) -> Result<(UserListFilter, PageRequest), Error> {
        let page = parse_page(self.page.as_deref(), self.limit.as_deref())?;
        let filter = UserListFilter {
            role: parse_optional_role(self.role, FieldName::new("role"))?,
            active: parse_optional_bool(self.active, FieldName::new("active"))?,
        };
        Ok((filter, page))
    }
}

/// Filters for `GET /admin/appointments`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminAppointmentQuery {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub doctor_id: Option<String>,
    pub patient_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl AdminAppointmentQuery {
    pub(crate) fn parse(self) -> Result<(AdminAppointmentFilter, PageRequest), Error> {
        let page = parse_page(self.page.as_deref(), self.limit.as_deref())?;
        let base = AppointmentListQuery {
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
        }
        .parse()?;
        let filter = AdminAppointmentFilter {
            base,
            doctor_id: parse_optional_id(self.doctor_id, FieldName::new("doctor_id"))?,
            patient_id: parse_optional_id(self.patient_id, FieldName::new("patient_id"))?,
        };
        Ok((filter, page))
    }
}
