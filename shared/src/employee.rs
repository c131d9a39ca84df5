//! Employee records and role identification.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shift::ShiftId;

/// Role tag identifying the facility leader on duty.
pub const ROLE_LEADER: &str = "LIDER";
/// Role tag identifying a support educator who can back up a leader.
pub const ROLE_SUPPORT: &str = "WYCHOWAWCA";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "allowedShifts", default)]
    pub allowed_shifts: Vec<ShiftId>,
    #[serde(default)]
    pub preferences: HashMap<String, Value>,
    #[serde(rename = "specialRules", default)]
    pub special_rules: HashMap<String, Value>,
}

impl Employee {
    /// Whether this employee is the facility leader. The `LIDER` role tag is
    /// authoritative; the legacy name-substring match only applies when the
    /// employee record carries no role tags at all (spec.md §9).
    pub fn is_leader(&self) -> bool {
        if !self.roles.is_empty() {
            return self.has_role(ROLE_LEADER);
        }
        self.name.contains("Maria") || self.name.contains("Pankowska")
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(name: &str, roles: &[&str]) -> Employee {
        Employee {
            id: "e1".to_string(),
            name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            allowed_shifts: Vec::new(),
            preferences: HashMap::new(),
            special_rules: HashMap::new(),
        }
    }

    #[test]
    fn role_tag_is_authoritative_over_name() {
        let e = employee("Maria Pankowska", &["WYCHOWAWCA"]);
        assert!(!e.is_leader());
    }

    #[test]
    fn name_fallback_only_applies_without_any_role() {
        let e = employee("Maria Pankowska", &[]);
        assert!(e.is_leader());
    }

    #[test]
    fn leader_role_tag_identifies_leader() {
        let e = employee("Jan Kowalski", &["LIDER"]);
        assert!(e.is_leader());
    }
}
