use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clinic::DoctorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Caller identity as established by the upstream login gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub role: Role,
    pub doctor_id: Option<DoctorId>,
}

impl Principal {
    pub fn admin() -> Self {
        Self { role: Role::Admin, doctor_id: None }
    }

    pub fn doctor(doctor_id: DoctorId) -> Self {
        Self { role: Role::Doctor, doctor_id: Some(doctor_id) }
    }

    pub fn patient() -> Self {
        Self { role: Role::Patient, doctor_id: None }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True for the doctor owning `doctor_id`.
    pub fn acts_for(&self, doctor_id: DoctorId) -> bool {
        self.role == Role::Doctor && self.doctor_id == Some(doctor_id)
    }
}
