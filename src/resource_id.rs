//! Resource identifiers: a URI template paired with its ordered segment
//! decomposition.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ResourceIdError;
use crate::segments::{Segment, SegmentKind};

/// A resource identifier: the canonical `/`-delimited URI template with
/// `{placeholder}` tokens, plus the ordered typed segments it decomposes
/// into.
///
/// The template and segment list are two views of one structure and are
/// proven consistent once by [`ResourceId::validate`] at registry build
/// time. After that, [`ResourceId::build`] and [`ResourceId::parse`] only
/// fail on input-dependent conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    name: String,
    template: String,
    segments: Vec<Segment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    common_alias: Option<String>,
}

enum TemplateElement<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn template_elements(template: &str) -> Vec<TemplateElement<'_>> {
    let trimmed = template.strip_prefix('/').unwrap_or(template);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('/')
        .map(|part| {
            match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) => TemplateElement::Placeholder(name),
                None => TemplateElement::Literal(part),
            }
        })
        .collect()
}

impl ResourceId {
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        segments: Vec<Segment>,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            segments,
            common_alias: None,
        }
    }

    /// Set the well-known shorthand some identifiers carry.
    pub fn with_common_alias(mut self, alias: impl Into<String>) -> Self {
        self.common_alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical URI template with `{placeholder}` tokens.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The ordered segment decomposition of the template.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn common_alias(&self) -> Option<&str> {
        self.common_alias.as_deref()
    }

    /// Prove that the template and segment list agree.
    ///
    /// The ordered `{placeholder}` names extracted from the template must
    /// equal, in order, the key names of all non-literal segments, and
    /// every literal element must equal the corresponding segment's fixed
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ResourceIdError::DuplicateSegmentKey` on a repeated key,
    /// or `ResourceIdError::TemplateMismatch` for any other disagreement.
    pub fn validate(&self) -> Result<(), ResourceIdError> {
        let mismatch = |reason: String| ResourceIdError::TemplateMismatch {
            id: self.name.clone(),
            template: self.template.clone(),
            reason,
        };

        let mut seen = HashSet::new();
        for segment in &self.segments {
            if segment.name().is_empty() {
                return Err(mismatch("segment with empty key name".into()));
            }
            if !seen.insert(segment.name()) {
                return Err(ResourceIdError::DuplicateSegmentKey {
                    id: self.name.clone(),
                    key: segment.name().to_string(),
                });
            }
            if segment.is_literal() && segment.fixed_value().map_or(true, str::is_empty) {
                return Err(mismatch(format!(
                    "segment {:?} has an empty literal",
                    segment.name()
                )));
            }
        }

        let elements = template_elements(&self.template);
        if elements.len() != self.segments.len() {
            return Err(mismatch(format!(
                "template has {} elements, segment list has {}",
                elements.len(),
                self.segments.len()
            )));
        }

        for (element, segment) in elements.iter().zip(&self.segments) {
            match (element, segment.is_literal()) {
                (TemplateElement::Literal(literal), true) => {
                    let expected = segment.fixed_value().unwrap_or_default();
                    if *literal != expected {
                        return Err(mismatch(format!(
                            "literal {literal:?} does not match segment value {expected:?}"
                        )));
                    }
                }
                (TemplateElement::Placeholder(placeholder), false) => {
                    if *placeholder != segment.name() {
                        return Err(mismatch(format!(
                            "placeholder {{{placeholder}}} does not match segment key {:?}",
                            segment.name()
                        )));
                    }
                }
                (TemplateElement::Literal(literal), false) => {
                    return Err(mismatch(format!(
                        "expected placeholder {{{}}}, found literal {literal:?}",
                        segment.name()
                    )));
                }
                (TemplateElement::Placeholder(placeholder), true) => {
                    return Err(mismatch(format!(
                        "expected literal {:?}, found placeholder {{{placeholder}}}",
                        segment.fixed_value().unwrap_or_default()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Substitute placeholder values to produce a concrete path.
    ///
    /// Literal segments are inserted verbatim, case preserved.
    ///
    /// # Errors
    ///
    /// Returns `ResourceIdError::MissingValue` if a required key is
    /// absent from `values`.
    pub fn build(&self, values: &HashMap<String, String>) -> Result<String, ResourceIdError> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            if segment.is_literal() {
                path.push_str(segment.fixed_value().unwrap_or_default());
            } else {
                let value =
                    values
                        .get(segment.name())
                        .ok_or_else(|| ResourceIdError::MissingValue {
                            id: self.name.clone(),
                            key: segment.name().to_string(),
                        })?;
                path.push_str(value);
            }
        }
        Ok(path)
    }

    /// Match a concrete path against the template positionally and
    /// extract the value bound to each non-literal segment.
    ///
    /// `Static` literals must match case-sensitively; the provider
    /// namespace literal matches case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ResourceIdError::NoMatch` if the segment count or literal
    /// text disagrees at any position.
    pub fn parse(&self, path: &str) -> Result<HashMap<String, String>, ResourceIdError> {
        let no_match = |reason: String| ResourceIdError::NoMatch {
            id: self.name.clone(),
            path: path.to_string(),
            reason,
        };

        let trimmed = path
            .strip_prefix('/')
            .ok_or_else(|| no_match("path must start with '/'".into()))?;
        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() != self.segments.len() {
            return Err(no_match(format!(
                "expected {} segments, found {}",
                self.segments.len(),
                parts.len()
            )));
        }

        let mut values = HashMap::new();
        for (part, segment) in parts.iter().zip(&self.segments) {
            match segment.kind() {
                SegmentKind::Static => {
                    let expected = segment.fixed_value().unwrap_or_default();
                    if *part != expected {
                        return Err(no_match(format!(
                            "expected {expected:?}, found {part:?}"
                        )));
                    }
                }
                SegmentKind::ResourceProvider => {
                    let expected = segment.fixed_value().unwrap_or_default();
                    if !part.eq_ignore_ascii_case(expected) {
                        return Err(no_match(format!(
                            "expected provider {expected:?}, found {part:?}"
                        )));
                    }
                }
                _ => {
                    if part.is_empty() {
                        return Err(no_match(format!(
                            "empty value for segment {:?}",
                            segment.name()
                        )));
                    }
                    values.insert(segment.name().to_string(), (*part).to_string());
                }
            }
        }

        Ok(values)
    }
}
