//! Resource definitions and the validated registry handed to generators.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::Constant;
use crate::error::{DefinitionError, ModelError, RegistryError};
use crate::models::Model;
use crate::operations::Operation;
use crate::resource_id::ResourceId;

/// A named resource and the operations, constants, models, and resource
/// identifiers it owns for one API version.
///
/// Identical shapes recurring across versions are not unified: each
/// version's definition is an independent, self-contained unit.
#[derive(Debug, Clone)]
pub struct ResourceDefinition {
    name: String,
    api_version: String,
    resource_ids: BTreeMap<String, ResourceId>,
    constants: BTreeMap<String, Constant>,
    models: BTreeMap<String, Model>,
    operations: Vec<Operation>,
}

impl ResourceDefinition {
    pub fn new(name: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_version: api_version.into(),
            resource_ids: BTreeMap::new(),
            constants: BTreeMap::new(),
            models: BTreeMap::new(),
            operations: Vec::new(),
        }
    }

    pub fn with_resource_id(mut self, id: ResourceId) -> Self {
        self.resource_ids.insert(id.name().to_string(), id);
        self
    }

    pub fn with_constant(mut self, constant: Constant) -> Self {
        self.constants.insert(constant.name().to_string(), constant);
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.models.insert(model.name().to_string(), model);
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn resource_id(&self, name: &str) -> Option<&ResourceId> {
        self.resource_ids.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.get(name)
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Owned identifiers in name order.
    pub fn resource_ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.resource_ids.values()
    }

    /// Owned constants in name order.
    pub fn constants(&self) -> impl Iterator<Item = &Constant> {
        self.constants.values()
    }

    /// Owned models in name order.
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Operations in declaration order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Resolve the variant of a polymorphic family for a discriminator
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownModel` if `family` is not owned here,
    /// `ModelError::NotPolymorphic` if it is a flat model, or
    /// `ModelError::UnknownVariant` if no variant carries `value`.
    pub fn resolve_variant(&self, family: &str, value: &str) -> Result<&Model, ModelError> {
        let base = self.model(family).ok_or_else(|| ModelError::UnknownModel {
            model: family.to_string(),
        })?;
        let variant = base.variant_for(value)?;
        self.model(variant.model())
            .ok_or_else(|| ModelError::UnknownModel {
                model: variant.model().to_string(),
            })
    }

    fn check(&self) -> Result<(), DefinitionError> {
        for id in self.resource_ids.values() {
            id.validate()?;
        }
        for constant in self.constants.values() {
            constant.check()?;
        }
        let known_types: BTreeSet<String> = self
            .models
            .keys()
            .chain(self.constants.keys())
            .cloned()
            .collect();
        for model in self.models.values() {
            model.check(&known_types, &self.models)?;
        }
        for operation in &self.operations {
            operation.check(self)?;
        }
        Ok(())
    }
}

/// Accumulates resource definitions during the single build phase.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    definitions: BTreeMap<(String, String), ResourceDefinition>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, keyed by (resource name, API version).
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateDefinition` if the key is
    /// already taken.
    pub fn register(&mut self, definition: ResourceDefinition) -> Result<(), RegistryError> {
        let key = (
            definition.name().to_string(),
            definition.api_version().to_string(),
        );
        if self.definitions.contains_key(&key) {
            return Err(RegistryError::DuplicateDefinition {
                name: key.0,
                api_version: key.1,
            });
        }
        self.definitions.insert(key, definition);
        Ok(())
    }

    /// Validate every registered definition and freeze the registry.
    ///
    /// # Errors
    ///
    /// Fails fast on the first violation, reporting the offending
    /// definition's name, version, and invariant.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let registry = Registry {
            definitions: self.definitions,
        };
        registry.validate()?;
        Ok(registry)
    }
}

/// An immutable, validated snapshot of every resource definition.
///
/// Nothing mutates after [`RegistryBuilder::build`] succeeds, so the
/// snapshot is safe for unrestricted concurrent read-only access.
#[derive(Debug, Clone)]
pub struct Registry {
    definitions: BTreeMap<(String, String), ResourceDefinition>,
}

impl Registry {
    /// The definition registered under (name, API version), if any.
    pub fn get(&self, name: &str, api_version: &str) -> Option<&ResourceDefinition> {
        self.definitions
            .get(&(name.to_string(), api_version.to_string()))
    }

    /// Definitions in deterministic (name, version) order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Re-run every structural validation.
    ///
    /// Pure and idempotent: validating an already-valid snapshot changes
    /// nothing and returns the same result.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for definition in self.definitions.values() {
            definition
                .check()
                .map_err(|source| RegistryError::InvalidDefinition {
                    name: definition.name().to_string(),
                    api_version: definition.api_version().to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}
