//! Dashboard data types
//!
//! - `Patient`: one row of the patient directory
//! - `PatientStatus`: care status classification
//! - `DashboardStats`: aggregate counters shown on the summary cards
//! - `DashboardData`: stats plus the recent-patient list

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Care status of a patient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PatientStatus {
    Active,
    Recovered,
    Critical,
}

impl PatientStatus {
    /// Get all statuses for iteration
    pub fn all() -> &'static [PatientStatus] {
        &[
            PatientStatus::Active,
            PatientStatus::Recovered,
            PatientStatus::Critical,
        ]
    }
}

impl std::fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatientStatus::Active => write!(f, "Active"),
            PatientStatus::Recovered => write!(f, "Recovered"),
            PatientStatus::Critical => write!(f, "Critical"),
        }
    }
}

impl std::str::FromStr for PatientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(PatientStatus::Active),
            "recovered" => Ok(PatientStatus::Recovered),
            "critical" => Ok(PatientStatus::Critical),
            _ => Err(format!(
                "Unknown patient status: {} (expected active, recovered or critical)",
                s
            )),
        }
    }
}

/// A patient record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub status: PatientStatus,
    pub last_visit: NaiveDate,
    pub age: u32,
    pub assigned_doctor: String,
}

impl Patient {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: PatientStatus,
        last_visit: NaiveDate,
        age: u32,
        assigned_doctor: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            last_visit,
            age,
            assigned_doctor: assigned_doctor.into(),
        }
    }
}

/// Aggregate counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: u32,
    pub total_doctors: u32,
    pub total_appointments: u32,
    pub active_clinics: u32,
}

/// Everything the dashboard view renders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub recent_patients: Vec<Patient>,
}

impl DashboardData {
    /// Number of patients per status in the recent list
    pub fn status_counts(&self) -> Vec<(PatientStatus, usize)> {
        PatientStatus::all()
            .iter()
            .map(|status| {
                let count = self
                    .recent_patients
                    .iter()
                    .filter(|p| p.status == *status)
                    .count();
                (*status, count)
            })
            .collect()
    }
}

/// Static summary served by the simulated fetch
pub fn mock_dashboard_data() -> DashboardData {
    let visit = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);

    DashboardData {
        stats: DashboardStats {
            total_patients: 1240,
            total_doctors: 85,
            total_appointments: 320,
            active_clinics: 12,
        },
        recent_patients: vec![
            Patient::new("p_1", "Sarah Connor", PatientStatus::Active, visit(2023, 10, 24), 45, "Dr. Silberman"),
            Patient::new("p_2", "John Doe", PatientStatus::Recovered, visit(2023, 10, 22), 32, "Dr. House"),
            Patient::new("p_3", "Jane Smith", PatientStatus::Critical, visit(2023, 10, 25), 28, "Dr. Strange"),
            Patient::new("p_4", "Ellen Ripley", PatientStatus::Active, visit(2023, 10, 20), 35, "Dr. McCoy"),
            Patient::new("p_5", "Bruce Wayne", PatientStatus::Recovered, visit(2023, 10, 18), 40, "Dr. Quinn"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_display() {
        for status in PatientStatus::all() {
            let parsed: PatientStatus = status.to_string().to_uppercase().parse().unwrap();
            assert_eq!(parsed, *status);
        }
        assert!("discharged".parse::<PatientStatus>().is_err());
    }

    #[test]
    fn test_patient_json_shape() {
        let data = mock_dashboard_data();
        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["stats"]["totalPatients"], 1240);
        assert_eq!(json["recentPatients"][0]["lastVisit"], "2023-10-24");
        assert_eq!(json["recentPatients"][0]["assignedDoctor"], "Dr. Silberman");
        assert_eq!(json["recentPatients"][2]["status"], "Critical");
    }

    #[test]
    fn test_status_counts() {
        let counts = mock_dashboard_data().status_counts();
        assert_eq!(
            counts,
            vec![
                (PatientStatus::Active, 2),
                (PatientStatus::Recovered, 2),
                (PatientStatus::Critical, 1),
            ]
        );
    }
}
