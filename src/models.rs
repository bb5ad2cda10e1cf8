//! Named record types and discriminated polymorphic families.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, ModelError};

/// Reference to the type of a field.
///
/// References to other models or constants are by name and resolved
/// lazily against the owning definition, so self-referential and
/// mutually recursive shapes never require a node to exist before its
/// own fields are defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeRef {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    /// An untyped JSON object passed through as-is.
    RawObject,
    /// The provider location custom type.
    Location,
    /// The provider tags custom type (string-keyed string map).
    Tags,
    /// A list of the inner type.
    List(Box<TypeRef>),
    /// A string-keyed dictionary of the inner type.
    Dictionary(Box<TypeRef>),
    /// A comma-separated list rendered as one string on the wire.
    Csv(Box<TypeRef>),
    /// A named reference to a model or constant in the same definition.
    Reference(String),
}

impl TypeRef {
    /// The referenced type name, drilling through containers.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            TypeRef::Reference(name) => Some(name),
            TypeRef::List(inner) | TypeRef::Dictionary(inner) | TypeRef::Csv(inner) => {
                inner.reference_name()
            }
            _ => None,
        }
    }
}

/// One field of a flat model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    name: String,
    json_name: String,
    #[serde(rename = "type")]
    type_ref: TypeRef,
    #[serde(default)]
    required: bool,
}

impl Field {
    /// A new optional field. `json_name` is the wire serialization key.
    pub fn new(
        name: impl Into<String>,
        json_name: impl Into<String>,
        type_ref: TypeRef,
    ) -> Self {
        Self {
            name: name.into(),
            json_name: json_name.into(),
            type_ref,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire serialization key.
    pub fn json_name(&self) -> &str {
        &self.json_name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// One variant of a polymorphic family, tagged with the discriminator
/// value that selects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    value: String,
    model: String,
}

impl Variant {
    pub fn new(value: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            model: model.into(),
        }
    }

    /// The discriminator value selecting this variant.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The name of the model this variant resolves to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelKind {
    /// A polymorphic base: no fields of its own, a discriminator
    /// wire-field name, and a closed set of tagged variants.
    Discriminated {
        discriminator: String,
        variants: Vec<Variant>,
    },
    /// A flat record with ordered fields.
    Object {
        #[serde(default)]
        fields: Vec<Field>,
    },
}

/// A named record type, either flat or polymorphic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    name: String,
    #[serde(flatten)]
    kind: ModelKind,
}

impl Model {
    /// A flat model with no fields yet; add them with [`Model::with_field`].
    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ModelKind::Object { fields: Vec::new() },
        }
    }

    /// A polymorphic base dispatching on the `discriminator` wire field.
    pub fn discriminated(name: impl Into<String>, discriminator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ModelKind::Discriminated {
                discriminator: discriminator.into(),
                variants: Vec::new(),
            },
        }
    }

    /// Append a field to a flat model. Calling this on a polymorphic
    /// base is a programming error.
    pub fn with_field(mut self, field: Field) -> Self {
        debug_assert!(
            matches!(self.kind, ModelKind::Object { .. }),
            "with_field on polymorphic model"
        );
        if let ModelKind::Object { fields } = &mut self.kind {
            fields.push(field);
        }
        self
    }

    /// Register a variant on a polymorphic base. Calling this on a flat
    /// model is a programming error.
    pub fn with_variant(mut self, value: impl Into<String>, model: impl Into<String>) -> Self {
        debug_assert!(
            matches!(self.kind, ModelKind::Discriminated { .. }),
            "with_variant on flat model"
        );
        if let ModelKind::Discriminated { variants, .. } = &mut self.kind {
            variants.push(Variant::new(value, model));
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ModelKind {
        &self.kind
    }

    pub fn is_polymorphic(&self) -> bool {
        matches!(self.kind, ModelKind::Discriminated { .. })
    }

    /// Ordered fields of a flat model; empty for a polymorphic base.
    /// Ordering is significant for deterministic downstream rendering.
    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            ModelKind::Object { fields } => fields,
            ModelKind::Discriminated { .. } => &[],
        }
    }

    /// The field carrying a wire serialization key, if any.
    pub fn field(&self, json_name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.json_name == json_name)
    }

    /// The discriminator wire-field name of a polymorphic base.
    pub fn discriminator(&self) -> Option<&str> {
        match &self.kind {
            ModelKind::Discriminated { discriminator, .. } => Some(discriminator),
            ModelKind::Object { .. } => None,
        }
    }

    /// The tagged variants of a polymorphic base; empty for a flat model.
    pub fn variants(&self) -> &[Variant] {
        match &self.kind {
            ModelKind::Discriminated { variants, .. } => variants,
            ModelKind::Object { .. } => &[],
        }
    }

    /// The variant tagged with `value`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NotPolymorphic` for a flat model, or
    /// `ModelError::UnknownVariant` if no variant carries `value`.
    pub fn variant_for(&self, value: &str) -> Result<&Variant, ModelError> {
        match &self.kind {
            ModelKind::Object { .. } => Err(ModelError::NotPolymorphic {
                model: self.name.clone(),
            }),
            ModelKind::Discriminated { variants, .. } => variants
                .iter()
                .find(|variant| variant.value == value)
                .ok_or_else(|| ModelError::UnknownVariant {
                    model: self.name.clone(),
                    value: value.to_string(),
                }),
        }
    }

    /// Structural check against the owning definition's type names.
    ///
    /// Every node is checked exactly once by name-set membership, so
    /// cycles through named references cannot recurse.
    pub(crate) fn check(
        &self,
        known_types: &BTreeSet<String>,
        models: &BTreeMap<String, Model>,
    ) -> Result<(), DefinitionError> {
        match &self.kind {
            ModelKind::Object { fields } => {
                for field in fields {
                    if let Some(reference) = field.type_ref.reference_name() {
                        if !known_types.contains(reference) {
                            return Err(DefinitionError::DanglingReference {
                                owner: format!("model {} field {}", self.name, field.name),
                                reference: reference.to_string(),
                            });
                        }
                    }
                }
            }
            ModelKind::Discriminated { variants, .. } => {
                let mut seen = HashSet::new();
                for variant in variants {
                    if !seen.insert(variant.value.as_str()) {
                        return Err(ModelError::DuplicateDiscriminator {
                            model: self.name.clone(),
                            value: variant.value.clone(),
                        }
                        .into());
                    }
                    match models.get(&variant.model) {
                        None => {
                            return Err(DefinitionError::DanglingReference {
                                owner: format!(
                                    "model {} variant {:?}",
                                    self.name, variant.value
                                ),
                                reference: variant.model.clone(),
                            });
                        }
                        Some(target) if target.is_polymorphic() => {
                            return Err(ModelError::NestedDiscriminator {
                                model: self.name.clone(),
                                variant: variant.model.clone(),
                            }
                            .into());
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn fields_keep_declaration_order() {
        let model = Model::object("EndpointRangeDescriptionModel")
            .with_field(Field::new("EndPort", "endPort", TypeRef::Integer).required())
            .with_field(Field::new("StartPort", "startPort", TypeRef::Integer).required());
        let names: Vec<&str> = model.fields().iter().map(|f| f.json_name()).collect();
        assert_eq!(names, vec!["endPort", "startPort"]);
    }

    #[test]
    fn field_lookup_uses_wire_name() {
        let model = Model::object("PageModel")
            .with_field(Field::new("NextLink", "nextLink", TypeRef::String));
        assert!(model.field("nextLink").is_some());
        assert!(model.field("NextLink").is_none());
    }

    #[test]
    fn reference_name_drills_through_containers() {
        let type_ref = TypeRef::List(Box::new(TypeRef::Dictionary(Box::new(
            TypeRef::Reference("TrackSelectionModel".into()),
        ))));
        assert_eq!(type_ref.reference_name(), Some("TrackSelectionModel"));
        assert_eq!(TypeRef::List(Box::new(TypeRef::String)).reference_name(), None);
    }

    #[test]
    fn variant_resolution() {
        let base = Model::discriminated("ChargeSummaryModel", "kind")
            .with_variant("legacy", "LegacyChargeSummaryModel")
            .with_variant("modern", "ModernChargeSummaryModel");
        assert_eq!(
            base.variant_for("legacy").unwrap().model(),
            "LegacyChargeSummaryModel"
        );
        assert!(matches!(
            base.variant_for("unknown"),
            Err(ModelError::UnknownVariant { value, .. }) if value == "unknown"
        ));
    }

    #[test]
    fn variant_for_on_flat_model_fails() {
        let model = Model::object("ErrorDetailsModel");
        assert!(matches!(
            model.variant_for("legacy"),
            Err(ModelError::NotPolymorphic { .. })
        ));
    }

    #[test]
    fn check_rejects_duplicate_discriminator() {
        let base = Model::discriminated("ChargeSummaryModel", "kind")
            .with_variant("legacy", "LegacyChargeSummaryModel")
            .with_variant("legacy", "OtherChargeSummaryModel");
        let mut models = BTreeMap::new();
        models.insert(
            "LegacyChargeSummaryModel".to_string(),
            Model::object("LegacyChargeSummaryModel"),
        );
        models.insert(
            "OtherChargeSummaryModel".to_string(),
            Model::object("OtherChargeSummaryModel"),
        );
        let names = known(&["LegacyChargeSummaryModel", "OtherChargeSummaryModel"]);
        assert!(matches!(
            base.check(&names, &models),
            Err(DefinitionError::Model(ModelError::DuplicateDiscriminator { value, .. }))
                if value == "legacy"
        ));
    }

    #[test]
    fn check_rejects_dangling_field_reference() {
        let model = Model::object("CommonEncryptionModel").with_field(Field::new(
            "ClearTracks",
            "clearTracks",
            TypeRef::List(Box::new(TypeRef::Reference("TrackSelectionModel".into()))),
        ));
        let result = model.check(&known(&[]), &BTreeMap::new());
        assert!(matches!(
            result,
            Err(DefinitionError::DanglingReference { reference, .. })
                if reference == "TrackSelectionModel"
        ));
    }

    #[test]
    fn check_accepts_self_reference() {
        // A tree-shaped node referencing itself by name.
        let model = Model::object("ConfigNodeModel").with_field(Field::new(
            "Children",
            "children",
            TypeRef::List(Box::new(TypeRef::Reference("ConfigNodeModel".into()))),
        ));
        let mut models = BTreeMap::new();
        models.insert("ConfigNodeModel".to_string(), model.clone());
        model.check(&known(&["ConfigNodeModel"]), &models).unwrap();
    }

    #[test]
    fn check_rejects_nested_polymorphic_base() {
        let base = Model::discriminated("OuterModel", "kind")
            .with_variant("inner", "InnerModel");
        let mut models = BTreeMap::new();
        models.insert(
            "InnerModel".to_string(),
            Model::discriminated("InnerModel", "kind").with_variant("leaf", "LeafModel"),
        );
        let names = known(&["InnerModel", "LeafModel"]);
        assert!(matches!(
            base.check(&names, &models),
            Err(DefinitionError::Model(ModelError::NestedDiscriminator { .. }))
        ));
    }
}
