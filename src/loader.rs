//! Loading resource definitions from JSON documents.
//!
//! A definition document is one self-contained resource definition,
//! keyed by resource name and API version:
//!
//! ```json
//! {
//!   "name": "ContainerApps",
//!   "apiVersion": "2022-03-01",
//!   "resourceIds": [ ... ],
//!   "constants": [ ... ],
//!   "models": [ ... ],
//!   "operations": [ ... ]
//! }
//! ```
//!
//! Loading performs no structural validation; that happens when the
//! definitions are registered and the registry is built.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::Constant;
use crate::error::LoadError;
use crate::models::Model;
use crate::operations::Operation;
use crate::registry::ResourceDefinition;
use crate::resource_id::ResourceId;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionDocument {
    name: String,
    api_version: String,
    #[serde(default)]
    resource_ids: Vec<ResourceId>,
    #[serde(default)]
    constants: Vec<Constant>,
    #[serde(default)]
    models: Vec<Model>,
    #[serde(default)]
    operations: Vec<Operation>,
}

impl From<DefinitionDocument> for ResourceDefinition {
    fn from(document: DefinitionDocument) -> Self {
        let mut definition = ResourceDefinition::new(document.name, document.api_version);
        for id in document.resource_ids {
            definition = definition.with_resource_id(id);
        }
        for constant in document.constants {
            definition = definition.with_constant(constant);
        }
        for model in document.models {
            definition = definition.with_model(model);
        }
        for operation in document.operations {
            definition = definition.with_operation(operation);
        }
        definition
    }
}

/// Load one definition document from a file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::ReadError` if it can't be read, or
/// `LoadError::InvalidJson` if it isn't a valid definition document.
pub fn load_definition(path: &Path) -> Result<ResourceDefinition, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_definition_str(&content)
}

/// Load one definition document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't a valid
/// definition document.
pub fn load_definition_str(content: &str) -> Result<ResourceDefinition, LoadError> {
    let document: DefinitionDocument =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    Ok(document.into())
}

/// Recursively load every `.json` definition document under a path.
///
/// Files are visited in sorted order so the result does not depend on
/// directory iteration order. A file path loads that single document.
///
/// # Errors
///
/// Returns the first IO or parse error encountered.
pub fn load_directory(path: &Path) -> Result<Vec<ResourceDefinition>, LoadError> {
    let mut files = Vec::new();
    collect_definition_files(path, &mut files)?;
    files.sort();
    files.iter().map(|file| load_definition(file)).collect()
}

fn collect_definition_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_file() {
        files.push(path.to_path_buf());
        return Ok(());
    }

    let entries = std::fs::read_dir(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            collect_definition_files(&entry_path, files)?;
        } else if entry_path.extension().is_some_and(|ext| ext == "json") {
            files.push(entry_path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONTAINER_APPS: &str = r#"{
        "name": "ContainerApps",
        "apiVersion": "2022-03-01",
        "resourceIds": [
            {
                "name": "ContainerAppId",
                "template": "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.App/containerApps/{containerAppName}",
                "segments": [
                    { "kind": "static", "name": "staticSubscriptions", "value": "subscriptions" },
                    { "kind": "subscriptionId", "name": "subscriptionId" },
                    { "kind": "static", "name": "staticResourceGroups", "value": "resourceGroups" },
                    { "kind": "resourceGroup", "name": "resourceGroupName" },
                    { "kind": "static", "name": "staticProviders", "value": "providers" },
                    { "kind": "resourceProvider", "name": "staticMicrosoftApp", "value": "Microsoft.App" },
                    { "kind": "static", "name": "staticContainerApps", "value": "containerApps" },
                    { "kind": "userSpecified", "name": "containerAppName" }
                ]
            }
        ],
        "constants": [
            {
                "name": "ProvisioningStateConstant",
                "kind": "string",
                "members": [
                    { "name": "Failed", "value": "failed" },
                    { "name": "Provisioning", "value": "provisioning" },
                    { "name": "Succeeded", "value": "succeeded" }
                ]
            }
        ],
        "models": [
            {
                "name": "ContainerAppModel",
                "fields": [
                    { "name": "Name", "jsonName": "name", "type": "string", "required": true },
                    { "name": "ProvisioningState", "jsonName": "provisioningState", "type": { "reference": "ProvisioningStateConstant" } },
                    { "name": "Tags", "jsonName": "tags", "type": "tags" }
                ]
            }
        ],
        "operations": [
            {
                "name": "Get",
                "verb": "get",
                "resourceId": "ContainerAppId",
                "responseModel": "ContainerAppModel"
            },
            {
                "name": "List",
                "verb": "list",
                "resourceId": "ContainerAppId",
                "responseModel": "ContainerAppModel",
                "uriSuffix": "/revisions",
                "paginationField": "name"
            }
        ]
    }"#;

    #[test]
    fn load_definition_str_valid() {
        let definition = load_definition_str(CONTAINER_APPS).unwrap();
        assert_eq!(definition.name(), "ContainerApps");
        assert_eq!(definition.api_version(), "2022-03-01");
        assert!(definition.resource_id("ContainerAppId").is_some());
        assert!(definition.constant("ProvisioningStateConstant").is_some());
        assert_eq!(definition.operations().len(), 2);
    }

    #[test]
    fn load_definition_str_invalid() {
        let result = load_definition_str("not json");
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn load_definition_str_missing_required_keys() {
        let result = load_definition_str(r#"{ "name": "ContainerApps" }"#);
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn load_definition_valid_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(CONTAINER_APPS.as_bytes()).unwrap();

        let definition = load_definition(file.path()).unwrap();
        assert_eq!(definition.name(), "ContainerApps");
    }

    #[test]
    fn load_definition_file_not_found() {
        let result = load_definition(Path::new("/nonexistent/definition.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_directory_walks_recursively_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("v2022_03_01");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("container_apps.json"), CONTAINER_APPS).unwrap();
        std::fs::write(
            dir.path().join("jobs.json"),
            r#"{ "name": "Jobs", "apiVersion": "2023-05-01", "operations": [
                { "name": "Delete", "verb": "delete", "resourceId": "JobId" }
            ],
            "resourceIds": [{
                "name": "JobId",
                "template": "/jobs/{jobName}",
                "segments": [
                    { "kind": "static", "name": "staticJobs", "value": "jobs" },
                    { "kind": "userSpecified", "name": "jobName" }
                ]
            }] }"#,
        )
        .unwrap();
        // Non-JSON files are skipped.
        std::fs::write(dir.path().join("README.md"), "notes").unwrap();

        let definitions = load_directory(dir.path()).unwrap();
        let names: Vec<&str> = definitions.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Jobs", "ContainerApps"]);
    }

    #[test]
    fn loaded_identifier_parses_paths() {
        let definition = load_definition_str(CONTAINER_APPS).unwrap();
        let id = definition.resource_id("ContainerAppId").unwrap();
        id.validate().unwrap();
        let values = id
            .parse("/subscriptions/abc/resourceGroups/rg1/providers/Microsoft.App/containerApps/app1")
            .unwrap();
        assert_eq!(values["subscriptionId"], "abc");
    }
}
