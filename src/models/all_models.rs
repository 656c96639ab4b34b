use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Serialize, Deserialize, Display, EnumString, EnumIter, PartialEq, Eq, Hash, Clone, Copy,
)]
//  ROLES & NAVIGATION
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    HeadOfDepartment,
    Doctor,
    Nurse,
    Staff,
    Patient,
}

impl Role {
    /// The dashboard route a user of this role lands on after login.
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Admin => "/dashboard/admin",
            Role::HeadOfDepartment => "/dashboard/department",
            Role::Doctor => "/dashboard/doctor",
            Role::Nurse => "/dashboard/nurse",
            Role::Staff => "/dashboard/staff",
            Role::Patient => "/dashboard/patient",
        }
    }
}

//Navigation Entry
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NavEntry {
    pub label: &'static str,
    pub path: &'static str,
}

impl NavEntry {
    const fn new(label: &'static str, path: &'static str) -> Self {
        NavEntry { label, path }
    }
}

lazy_static! {
    /// Navigation entries permitted per role. Total over the role enumeration.
    pub static ref ROLE_NAVIGATION: HashMap<Role, Vec<NavEntry>> = {
        let mut table = HashMap::new();
        table.insert(
            Role::Admin,
            vec![
                NavEntry::new("Departments", "/departments"),
                NavEntry::new("Workers", "/workers"),
                NavEntry::new("Patients", "/patients"),
                NavEntry::new("Consultations", "/consultations"),
                NavEntry::new("Remissions", "/remissions"),
            ],
        );
        table.insert(
            Role::HeadOfDepartment,
            vec![
                NavEntry::new("Workers", "/workers"),
                NavEntry::new("Medication Stock", "/stock"),
                NavEntry::new("Consultations", "/consultations"),
                NavEntry::new("Remissions", "/remissions"),
            ],
        );
        table.insert(
            Role::Doctor,
            vec![
                NavEntry::new("Patients", "/patients"),
                NavEntry::new("Consultations", "/consultations"),
                NavEntry::new("Remissions", "/remissions"),
            ],
        );
        table.insert(
            Role::Nurse,
            vec![
                NavEntry::new("Patients", "/patients"),
                NavEntry::new("Medication Stock", "/stock"),
            ],
        );
        table.insert(
            Role::Staff,
            vec![
                NavEntry::new("Departments", "/departments"),
                NavEntry::new("Patients", "/patients"),
            ],
        );
        table.insert(
            Role::Patient,
            vec![
                NavEntry::new("My Consultations", "/consultations/mine"),
                NavEntry::new("My Remissions", "/remissions/mine"),
            ],
        );
        table
    };
}

//  DEPARTMENTS & WORKERS

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Department {
    pub department_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub head_name: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Worker {
    pub worker_id: Uuid,
    pub account: String,
    pub display_name: String,
    pub role: Role,
    pub department_name: Option<String>,
    pub email: String,
    pub active: bool,
}

//  PATIENTS

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PatientRecord {
    pub patient_id: Uuid,
    pub account: String,
    pub display_name: String,
    pub dob: NaiveDate,
    pub phone: Option<String>,
    pub assigned_doctor: Option<String>,
}

//  MEDICATION STOCK

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StockItem {
    pub stock_item_id: Uuid,
    pub department_id: Uuid,
    pub medication_name: String,
    pub quantity: i64,
    pub unit: String,
    pub below_threshold: bool,
    pub updated_at: NaiveDateTime,
}

//  CONSULTATIONS

#[derive(Debug, Serialize, Deserialize, Display, EnumString, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConsultationStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Consultation {
    pub consultation_id: Uuid,
    pub patient_name: String,
    pub doctor_name: String,
    pub department_name: String,
    pub scheduled_at: NaiveDateTime,
    pub status: ConsultationStatus,
    pub notes: Option<String>,
}

//  REMISSIONS (REFERRALS)

#[derive(Debug, Serialize, Deserialize, Display, EnumString, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RemissionStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Remission {
    pub remission_id: Uuid,
    pub patient_name: String,
    pub from_department: String,
    pub to_department: String,
    pub reason: String,
    pub status: RemissionStatus,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_role_has_a_home_route() {
        for role in Role::iter() {
            assert!(role.home_route().starts_with("/dashboard/"));
        }
    }

    #[test]
    fn navigation_table_is_total_over_roles() {
        for role in Role::iter() {
            let entries = ROLE_NAVIGATION
                .get(&role)
                .unwrap_or_else(|| panic!("no navigation entries for {}", role));
            assert!(!entries.is_empty());
        }
    }

    #[test]
    fn home_routes_are_unique_per_role() {
        let routes: Vec<&str> = Role::iter().map(|r| r.home_route()).collect();
        let mut deduped = routes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(routes.len(), deduped.len());
    }

    #[test]
    fn role_round_trips_through_wire_form() {
        let json = serde_json::to_string(&Role::HeadOfDepartment).unwrap();
        assert_eq!(json, "\"head_of_department\"");
        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::HeadOfDepartment);
    }

    #[test]
    fn role_display_matches_wire_form() {
        assert_eq!(Role::HeadOfDepartment.to_string(), "head_of_department");
        assert_eq!("nurse".parse::<Role>().unwrap(), Role::Nurse);
    }
}
