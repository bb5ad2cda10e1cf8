//! Closed enumerations with stable wire representations.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConstantError;

/// Backing type of a constant's wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstantKind {
    String,
    Integer,
    Float,
}

impl ConstantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstantKind::String => "string",
            ConstantKind::Integer => "integer",
            ConstantKind::Float => "float",
        }
    }
}

/// A named member of a constant with its canonical wire value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantMember {
    name: String,
    value: String,
}

impl ConstantMember {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The display name of this member.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical wire value. Total: membership is closed by
    /// construction, so every member has exactly one wire value.
    pub fn wire_value(&self) -> &str {
        &self.value
    }
}

/// A closed set of named values with stable wire representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constant {
    name: String,
    kind: ConstantKind,
    members: Vec<ConstantMember>,
}

impl Constant {
    pub fn new(name: impl Into<String>, kind: ConstantKind) -> Self {
        Self {
            name: name.into(),
            kind,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.members.push(ConstantMember::new(name, value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ConstantKind {
        self.kind
    }

    pub fn members(&self) -> &[ConstantMember] {
        &self.members
    }

    /// Look up the member carrying a wire value.
    ///
    /// # Errors
    ///
    /// Returns `ConstantError::UnknownValue` if no member carries
    /// `wire_value`.
    pub fn resolve(&self, wire_value: &str) -> Result<&ConstantMember, ConstantError> {
        self.members
            .iter()
            .find(|member| member.value == wire_value)
            .ok_or_else(|| ConstantError::UnknownValue {
                constant: self.name.clone(),
                value: wire_value.to_string(),
            })
    }

    /// Structural check: wire values are unique and agree with the
    /// declared kind.
    pub(crate) fn check(&self) -> Result<(), ConstantError> {
        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(member.value.as_str()) {
                return Err(ConstantError::DuplicateValue {
                    constant: self.name.clone(),
                    value: member.value.clone(),
                });
            }
            let valid = match self.kind {
                ConstantKind::String => true,
                ConstantKind::Integer => member.value.parse::<i64>().is_ok(),
                ConstantKind::Float => member.value.parse::<f64>().is_ok(),
            };
            if !valid {
                return Err(ConstantError::InvalidValue {
                    constant: self.name.clone(),
                    value: member.value.clone(),
                    kind: self.kind.as_str(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioning_state() -> Constant {
        Constant::new("ProvisioningStateConstant", ConstantKind::String)
            .with_member("Failed", "failed")
            .with_member("Provisioning", "provisioning")
            .with_member("Succeeded", "succeeded")
    }

    #[test]
    fn resolve_known_value() {
        let constant = provisioning_state();
        let member = constant.resolve("provisioning").unwrap();
        assert_eq!(member.name(), "Provisioning");
    }

    #[test]
    fn resolve_round_trips_every_member() {
        let constant = provisioning_state();
        for member in constant.members() {
            let resolved = constant.resolve(member.wire_value()).unwrap();
            assert_eq!(resolved, member);
        }
    }

    #[test]
    fn resolve_unknown_value_fails() {
        let constant = provisioning_state();
        let result = constant.resolve("Unknown");
        assert!(matches!(
            result,
            Err(ConstantError::UnknownValue { value, .. }) if value == "Unknown"
        ));
    }

    #[test]
    fn check_rejects_duplicate_wire_values() {
        let constant = Constant::new("SchemeConstant", ConstantKind::String)
            .with_member("Http", "http")
            .with_member("Https", "http");
        assert!(matches!(
            constant.check(),
            Err(ConstantError::DuplicateValue { value, .. }) if value == "http"
        ));
    }

    #[test]
    fn check_rejects_non_numeric_integer() {
        let constant = Constant::new("PortConstant", ConstantKind::Integer)
            .with_member("Default", "eighty");
        assert!(matches!(
            constant.check(),
            Err(ConstantError::InvalidValue { kind, .. }) if kind == "integer"
        ));
    }

    #[test]
    fn check_accepts_numeric_kinds() {
        Constant::new("PortConstant", ConstantKind::Integer)
            .with_member("Default", "80")
            .with_member("Alternate", "8080")
            .check()
            .unwrap();
        Constant::new("RatioConstant", ConstantKind::Float)
            .with_member("Half", "0.5")
            .check()
            .unwrap();
    }
}
