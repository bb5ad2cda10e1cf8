//! Typed path segments composing a resource identifier template.

use serde::{Deserialize, Serialize};

/// The role one segment plays within a resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    /// A fixed literal path element, e.g. `resourceGroups`.
    Static,
    /// The subscription identifier.
    SubscriptionId,
    /// The resource group name.
    ResourceGroup,
    /// The fixed provider namespace literal, e.g. `Microsoft.App`.
    ResourceProvider,
    /// A caller-supplied named value.
    UserSpecified,
}

/// One atom of a resource path.
///
/// Every segment carries a stable key name used for placeholder binding.
/// `Static` and `ResourceProvider` segments additionally carry the fixed
/// literal they contribute to the path; all other kinds contribute a
/// `{placeholder}` bound to their key name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    kind: SegmentKind,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl Segment {
    /// A fixed literal element.
    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Static,
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// The subscription identifier, bound to `name`.
    pub fn subscription_id(name: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::SubscriptionId,
            name: name.into(),
            value: None,
        }
    }

    /// The resource group name, bound to `name`.
    pub fn resource_group(name: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::ResourceGroup,
            name: name.into(),
            value: None,
        }
    }

    /// The provider namespace literal, e.g. `Microsoft.App`.
    pub fn resource_provider(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::ResourceProvider,
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// A caller-supplied value, bound to `name`.
    pub fn user_specified(name: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::UserSpecified,
            name: name.into(),
            value: None,
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// The stable key name used for placeholder binding.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fixed literal, for `Static` and `ResourceProvider` segments.
    pub fn fixed_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether this segment contributes a fixed literal to the template
    /// rather than a `{placeholder}`.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::Static | SegmentKind::ResourceProvider
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind() {
        assert_eq!(
            Segment::fixed("staticSubscriptions", "subscriptions").kind(),
            SegmentKind::Static
        );
        assert_eq!(
            Segment::subscription_id("subscriptionId").kind(),
            SegmentKind::SubscriptionId
        );
        assert_eq!(
            Segment::resource_group("resourceGroupName").kind(),
            SegmentKind::ResourceGroup
        );
        assert_eq!(
            Segment::resource_provider("staticMicrosoftApp", "Microsoft.App").kind(),
            SegmentKind::ResourceProvider
        );
        assert_eq!(
            Segment::user_specified("containerAppName").kind(),
            SegmentKind::UserSpecified
        );
    }

    #[test]
    fn literal_segments() {
        assert!(Segment::fixed("staticProviders", "providers").is_literal());
        assert!(Segment::resource_provider("staticMicrosoftApp", "Microsoft.App").is_literal());
        assert!(!Segment::subscription_id("subscriptionId").is_literal());
        assert!(!Segment::user_specified("name").is_literal());
    }

    #[test]
    fn fixed_value_only_on_literals() {
        let fixed = Segment::fixed("staticSubscriptions", "subscriptions");
        assert_eq!(fixed.fixed_value(), Some("subscriptions"));
        assert_eq!(Segment::resource_group("resourceGroupName").fixed_value(), None);
    }
}
