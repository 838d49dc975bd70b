//! Pane naming and the business-role vocabulary derived from it.

use std::fmt;

use crate::error::{EngineError, Result};

/// The business label attached to a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Main,
    Manager,
    Worker,
    Secretary,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Main => "main",
            Role::Manager => "manager",
            Role::Worker => "worker",
            Role::Secretary => "secretary",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaneName {
    value: String,
    role: Role,
}

impl PaneName {
    /// Derives a role from `value` and constructs a `PaneName`, or fails if
    /// no recognized role substring is present.
    ///
    /// The reserved literal `main` maps to `Role::Main`. Substrings
    /// `manager`/`mgr`, `worker`/`work`, `secretary`/`sec` map to their
    /// respective roles (checked in that order, case-insensitively).
    pub fn create(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let role = derive_role(&value).ok_or_else(|| EngineError::ValidationFailed {
            input: value.clone(),
            constraint: "no recognized role substring (main/manager/mgr/worker/work/secretary/sec)"
                .to_string(),
        })?;
        Ok(PaneName { value, role })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl fmt::Display for PaneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

fn derive_role(value: &str) -> Option<Role> {
    let lower = value.to_lowercase();
    if lower == "main" {
        return Some(Role::Main);
    }
    if lower.contains("manager") || lower.contains("mgr") {
        return Some(Role::Manager);
    }
    if lower.contains("worker") || lower.contains("work") {
        return Some(Role::Worker);
    }
    if lower.contains("secretary") || lower.contains("sec") {
        return Some(Role::Secretary);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_literal_maps_to_main_role() {
        assert_eq!(PaneName::create("main").unwrap().role(), Role::Main);
    }

    #[test]
    fn substrings_map_to_roles() {
        assert_eq!(PaneName::create("manager1").unwrap().role(), Role::Manager);
        assert_eq!(PaneName::create("mgr-2").unwrap().role(), Role::Manager);
        assert_eq!(PaneName::create("worker3").unwrap().role(), Role::Worker);
        assert_eq!(PaneName::create("work-queue").unwrap().role(), Role::Worker);
        assert_eq!(PaneName::create("secretary").unwrap().role(), Role::Secretary);
        assert_eq!(PaneName::create("sec-1").unwrap().role(), Role::Secretary);
    }

    #[test]
    fn unrecognized_name_fails() {
        assert!(PaneName::create("bash").is_err());
        assert!(PaneName::create("scratchpad").is_err());
    }

    #[test]
    fn empty_fails() {
        assert_eq!(PaneName::create("").unwrap_err(), EngineError::EmptyInput);
    }
}
