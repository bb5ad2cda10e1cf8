//! Resource-manager API definition schema
//!
//! A declarative schema layer describing a cloud provider's REST API
//! surface: resources, their identifiers, the operations exercised on
//! them, and the payload shapes those operations exchange.
//!
//! Definitions are aggregated into a [`Registry`] keyed by resource name
//! and API version. Building the registry proves the whole graph
//! consistent — identifier templates against their segment lists,
//! discriminated model families, cross references, operation metadata —
//! after which the snapshot is immutable and safe to traverse from any
//! number of consumers (e.g. parallel code-emission workers).
//!
//! # Example
//!
//! ```
//! use resman_schema::{
//!     Field, Model, Operation, RegistryBuilder, ResourceDefinition, ResourceId, Segment,
//!     TypeRef, Verb,
//! };
//!
//! let id = ResourceId::new(
//!     "ContainerAppId",
//!     "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.App/containerApps/{containerAppName}",
//!     vec![
//!         Segment::fixed("staticSubscriptions", "subscriptions"),
//!         Segment::subscription_id("subscriptionId"),
//!         Segment::fixed("staticResourceGroups", "resourceGroups"),
//!         Segment::resource_group("resourceGroupName"),
//!         Segment::fixed("staticProviders", "providers"),
//!         Segment::resource_provider("staticMicrosoftApp", "Microsoft.App"),
//!         Segment::fixed("staticContainerApps", "containerApps"),
//!         Segment::user_specified("containerAppName"),
//!     ],
//! );
//!
//! let definition = ResourceDefinition::new("ContainerApps", "2022-03-01")
//!     .with_resource_id(id)
//!     .with_model(
//!         Model::object("ContainerAppModel")
//!             .with_field(Field::new("Name", "name", TypeRef::String).required()),
//!     )
//!     .with_operation(
//!         Operation::new("Get", Verb::Get)
//!             .with_resource_id("ContainerAppId")
//!             .with_response("ContainerAppModel"),
//!     );
//!
//! let mut builder = RegistryBuilder::new();
//! builder.register(definition).unwrap();
//! let registry = builder.build().unwrap();
//!
//! let definition = registry.get("ContainerApps", "2022-03-01").unwrap();
//! let id = definition.resource_id("ContainerAppId").unwrap();
//! let values = id
//!     .parse("/subscriptions/abc/resourceGroups/rg1/providers/Microsoft.App/containerApps/app1")
//!     .unwrap();
//! assert_eq!(values["subscriptionId"], "abc");
//! assert_eq!(values["containerAppName"], "app1");
//! ```
//!
//! # Error model
//!
//! Structural inconsistencies (template/segment disagreement, duplicate
//! discriminators, dangling references, missing response types) are
//! caught once, at registry build time. Calls against a validated
//! snapshot only fail on input-dependent conditions: a missing
//! placeholder value, a path that doesn't match, an unknown constant
//! wire value, an unknown discriminator value.

mod constants;
mod error;
mod loader;
mod models;
mod operations;
mod registry;
mod resource_id;
mod segments;

pub use constants::{Constant, ConstantKind, ConstantMember};
pub use error::{
    ConstantError, DefinitionError, LoadError, ModelError, OperationError, RegistryError,
    ResourceIdError,
};
pub use loader::{load_definition, load_definition_str, load_directory};
pub use models::{Field, Model, ModelKind, TypeRef, Variant};
pub use operations::{Operation, Verb};
pub use registry::{Registry, RegistryBuilder, ResourceDefinition};
pub use resource_id::ResourceId;
pub use segments::{Segment, SegmentKind};
