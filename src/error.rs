//! Error types for definition validation and identifier handling.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the resource identifier engine.
///
/// `TemplateMismatch` and `DuplicateSegmentKey` are structural and only
/// surface during validation; `MissingValue` and `NoMatch` depend on the
/// caller's input and can occur at any time.
#[derive(Debug, Error)]
pub enum ResourceIdError {
    #[error("identifier {id}: template {template:?} does not match its segments: {reason}")]
    TemplateMismatch {
        id: String,
        template: String,
        reason: String,
    },

    #[error("identifier {id}: duplicate segment key {key:?}")]
    DuplicateSegmentKey { id: String, key: String },

    #[error("identifier {id}: no value supplied for {key:?}")]
    MissingValue { id: String, key: String },

    #[error("identifier {id}: path {path:?} does not match: {reason}")]
    NoMatch {
        id: String,
        path: String,
        reason: String,
    },
}

/// Errors from constant resolution and validation.
#[derive(Debug, Error)]
pub enum ConstantError {
    #[error("constant {constant}: unknown wire value {value:?}")]
    UnknownValue { constant: String, value: String },

    #[error("constant {constant}: duplicate wire value {value:?}")]
    DuplicateValue { constant: String, value: String },

    #[error("constant {constant}: {value:?} is not a valid {kind} value")]
    InvalidValue {
        constant: String,
        value: String,
        kind: &'static str,
    },
}

/// Errors from the model graph.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model {model}: duplicate discriminator value {value:?}")]
    DuplicateDiscriminator { model: String, value: String },

    #[error("model {model}: no variant tagged {value:?}")]
    UnknownVariant { model: String, value: String },

    #[error("model {model} is not polymorphic")]
    NotPolymorphic { model: String },

    #[error("model {model}: variant {variant} must be a plain model, not another polymorphic base")]
    NestedDiscriminator { model: String, variant: String },

    #[error("no model named {model}")]
    UnknownModel { model: String },
}

/// Errors from operation metadata.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("operation {operation}: no response type declared")]
    MissingResponseType { operation: String },

    #[error("operation {operation}: pagination field {field:?}: {reason}")]
    InvalidPaginationField {
        operation: String,
        field: String,
        reason: String,
    },
}

/// A single violation found while validating one resource definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error(transparent)]
    ResourceId(#[from] ResourceIdError),

    #[error(transparent)]
    Constant(#[from] ConstantError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("{owner}: reference to undefined type {reference:?}")]
    DanglingReference { owner: String, reference: String },
}

/// Errors from registry construction and validation.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate definition {name} ({api_version})")]
    DuplicateDefinition { name: String, api_version: String },

    #[error("definition {name} ({api_version}): {source}")]
    InvalidDefinition {
        name: String,
        api_version: String,
        #[source]
        source: DefinitionError,
    },
}

impl RegistryError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Errors while loading definition documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid definition document: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("missing.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidJson {
            source: serde_json::from_str::<serde_json::Value>("not json").unwrap_err(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn registry_error_exit_code() {
        let err = RegistryError::DuplicateDefinition {
            name: "ContainerApps".into(),
            api_version: "2022-03-01".into(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn registry_error_carries_definition_context() {
        let err = RegistryError::InvalidDefinition {
            name: "Charges".into(),
            api_version: "2023-11-01".into(),
            source: DefinitionError::Model(ModelError::DuplicateDiscriminator {
                model: "ChargeSummaryModel".into(),
                value: "legacy".into(),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("Charges"));
        assert!(message.contains("2023-11-01"));
        assert!(message.contains("legacy"));
    }

    #[test]
    fn no_match_display_includes_reason() {
        let err = ResourceIdError::NoMatch {
            id: "ContainerAppId".into(),
            path: "/subscriptions/abc".into(),
            reason: "expected 8 segments, found 2".into(),
        };
        assert!(err.to_string().contains("expected 8 segments"));
    }
}
