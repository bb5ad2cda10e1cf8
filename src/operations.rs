//! Declarative descriptions of individual API calls.

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, OperationError};
use crate::registry::ResourceDefinition;

/// The verb an operation is exercised with.
///
/// `List` is a `GET` returning a paged collection of nested items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verb {
    Delete,
    Get,
    Head,
    List,
    Patch,
    Post,
    Put,
}

impl Verb {
    /// The HTTP method this verb is sent as.
    pub fn http_method(&self) -> &'static str {
        match self {
            Verb::Delete => "DELETE",
            Verb::Get | Verb::List => "GET",
            Verb::Head => "HEAD",
            Verb::Patch => "PATCH",
            Verb::Post => "POST",
            Verb::Put => "PUT",
        }
    }

    /// Expected success status codes for operations that declare none.
    pub fn default_status_codes(&self) -> &'static [u16] {
        match self {
            Verb::Get | Verb::List | Verb::Head | Verb::Patch => &[200],
            Verb::Put => &[200, 201],
            Verb::Post => &[200, 202, 204],
            Verb::Delete => &[200, 204],
        }
    }
}

/// A declarative description of one API call: the verb, the identifier
/// it targets, and the payload shapes it exchanges.
///
/// Request, response, and identifier references are by name and resolve
/// against the owning [`ResourceDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    name: String,
    verb: Verb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_model: Option<String>,
    /// For `List` operations this is the nested item type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected_status_codes: Option<Vec<u16>>,
    #[serde(default)]
    long_running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pagination_field: Option<String>,
    #[serde(default)]
    no_response_body: bool,
}

impl Operation {
    pub fn new(name: impl Into<String>, verb: Verb) -> Self {
        Self {
            name: name.into(),
            verb,
            resource_id: None,
            request_model: None,
            response_model: None,
            expected_status_codes: None,
            long_running: false,
            uri_suffix: None,
            pagination_field: None,
            no_response_body: false,
        }
    }

    /// Target the resource identifier registered under `name`.
    pub fn with_resource_id(mut self, name: impl Into<String>) -> Self {
        self.resource_id = Some(name.into());
        self
    }

    pub fn with_request(mut self, model: impl Into<String>) -> Self {
        self.request_model = Some(model.into());
        self
    }

    /// Set the response model; for `List` operations, the nested item
    /// type.
    pub fn with_response(mut self, model: impl Into<String>) -> Self {
        self.response_model = Some(model.into());
        self
    }

    /// Override the verb's default expected status codes.
    pub fn with_status_codes(mut self, codes: Vec<u16>) -> Self {
        self.expected_status_codes = Some(codes);
        self
    }

    /// Extra path appended after the identifier's template.
    pub fn with_uri_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.uri_suffix = Some(suffix.into());
        self
    }

    /// Name the response field carrying the continuation link of a
    /// `List` operation.
    pub fn with_pagination_field(mut self, field: impl Into<String>) -> Self {
        self.pagination_field = Some(field.into());
        self
    }

    pub fn long_running(mut self) -> Self {
        self.long_running = true;
        self
    }

    /// Mark a non-delete operation as intentionally returning no body.
    pub fn without_response_body(mut self) -> Self {
        self.no_response_body = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// The name of the resource identifier this operation targets.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn request_model(&self) -> Option<&str> {
        self.request_model.as_deref()
    }

    pub fn response_model(&self) -> Option<&str> {
        self.response_model.as_deref()
    }

    /// Expected success status codes; the verb default when unspecified.
    pub fn expected_status_codes(&self) -> &[u16] {
        match &self.expected_status_codes {
            Some(codes) => codes,
            None => self.verb.default_status_codes(),
        }
    }

    pub fn is_long_running(&self) -> bool {
        self.long_running
    }

    /// Extra path appended after the identifier's template. Empty when
    /// unset.
    pub fn uri_suffix(&self) -> &str {
        self.uri_suffix.as_deref().unwrap_or("")
    }

    pub fn pagination_field(&self) -> Option<&str> {
        self.pagination_field.as_deref()
    }

    /// Per-operation structural check against the owning definition.
    pub(crate) fn check(&self, definition: &ResourceDefinition) -> Result<(), DefinitionError> {
        let owner = || format!("operation {}", self.name);

        if let Some(id) = &self.resource_id {
            if definition.resource_id(id).is_none() {
                return Err(DefinitionError::DanglingReference {
                    owner: owner(),
                    reference: id.clone(),
                });
            }
        }
        for model in [&self.request_model, &self.response_model]
            .into_iter()
            .flatten()
        {
            if definition.model(model).is_none() {
                return Err(DefinitionError::DanglingReference {
                    owner: owner(),
                    reference: model.clone(),
                });
            }
        }

        if self.verb != Verb::Delete && self.response_model.is_none() && !self.no_response_body {
            return Err(OperationError::MissingResponseType {
                operation: self.name.clone(),
            }
            .into());
        }

        if let Some(field) = &self.pagination_field {
            let invalid = |reason: String| {
                DefinitionError::Operation(OperationError::InvalidPaginationField {
                    operation: self.name.clone(),
                    field: field.clone(),
                    reason,
                })
            };
            if self.verb != Verb::List {
                return Err(invalid("only list operations are paged".into()));
            }
            let Some(model_name) = &self.response_model else {
                return Err(invalid("operation declares no nested item type".into()));
            };
            if let Some(model) = definition.model(model_name) {
                if model.field(field).is_none() {
                    return Err(invalid(format!("no such field on model {model_name}")));
                }
            }
        }

        Ok(())
    }
}
