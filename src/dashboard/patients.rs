//! Patient directory
//!
//! Search, status filtering and CSV export over a patient list.

use crate::dashboard::error::DashboardResult;
use crate::dashboard::types::{Patient, PatientStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

/// Search text and status filter for the patient table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFilter {
    /// Lowercased, trimmed substring of name, id or assigned doctor
    search: Option<String>,
    status: Option<PatientStatus>,
}

impl PatientFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set search text. Blank text matches everything.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
        self
    }

    /// Builder method: restrict to one status
    pub fn status(mut self, status: PatientStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, patient: &Patient) -> bool {
        if let Some(status) = self.status {
            if patient.status != status {
                return false;
            }
        }

        match &self.search {
            Some(needle) => [&patient.name, &patient.id, &patient.assigned_doctor]
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
            None => true,
        }
    }

    /// Patients passing the filter, in their original order
    pub fn apply<'a>(&self, patients: &'a [Patient]) -> Vec<&'a Patient> {
        patients.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Flat CSV row
#[derive(Serialize)]
struct PatientRow<'a> {
    id: &'a str,
    name: &'a str,
    status: PatientStatus,
    last_visit: NaiveDate,
    age: u32,
    assigned_doctor: &'a str,
}

impl<'a> From<&'a Patient> for PatientRow<'a> {
    fn from(p: &'a Patient) -> Self {
        Self {
            id: &p.id,
            name: &p.name,
            status: p.status,
            last_visit: p.last_visit,
            age: p.age,
            assigned_doctor: &p.assigned_doctor,
        }
    }
}

/// Write patients as CSV with a header row
pub fn export_csv<'a, W, I>(patients: I, writer: W) -> DashboardResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Patient>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;

    for patient in patients {
        csv_writer.serialize(PatientRow::from(patient))?;
        written += 1;
    }

    if written == 0 {
        csv_writer.write_record([
            "id",
            "name",
            "status",
            "last_visit",
            "age",
            "assigned_doctor",
        ])?;
    }

    csv_writer.flush()?;
    tracing::debug!(rows = written, "Exported patients as CSV");
    Ok(written)
}
