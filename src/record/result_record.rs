//! Result Record - the output of one experiment invocation

use serde::{Deserialize, Serialize};

use super::{metadata, FieldMap, ParameterSet, Section, Value};
use crate::{Error, Result};

/// The (parameters, metadata, results) triple produced by one invocation.
///
/// Records are read-only once built: the sections are only reachable
/// through shared references.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultRecord {
    parameters: ParameterSet,
    metadata: FieldMap,
    results: FieldMap,
}

impl ResultRecord {
    /// Create a record from its three sections.
    #[must_use]
    pub const fn new(parameters: ParameterSet, metadata: FieldMap, results: FieldMap) -> Self {
        Self {
            parameters,
            metadata,
            results,
        }
    }

    /// Create a builder for a record run at `parameters`.
    #[must_use]
    pub fn builder(parameters: ParameterSet) -> ResultRecordBuilder {
        ResultRecordBuilder::new(parameters)
    }

    /// Get the parameters the run used.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Get the run metadata.
    #[must_use]
    pub const fn metadata(&self) -> &FieldMap {
        &self.metadata
    }

    /// Get the domain results.
    #[must_use]
    pub const fn results(&self) -> &FieldMap {
        &self.results
    }

    /// Get one of the three sections by name.
    #[must_use]
    pub const fn section(&self, section: Section) -> &FieldMap {
        match section {
            Section::Parameters => &self.parameters,
            Section::Metadata => &self.metadata,
            Section::Results => &self.results,
        }
    }

    /// Read the `status` metadata flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingStatus`] if the field is absent and
    /// [`Error::InvalidStatus`] if it is not a boolean.
    pub fn status(&self) -> Result<bool> {
        let value = self
            .metadata
            .get(metadata::STATUS)
            .ok_or(Error::MissingStatus)?;
        value.as_bool().ok_or_else(|| Error::InvalidStatus {
            found: value.to_string(),
        })
    }

    /// Split the record into (parameters, metadata, results).
    #[must_use]
    pub fn into_parts(self) -> (ParameterSet, FieldMap, FieldMap) {
        (self.parameters, self.metadata, self.results)
    }
}

/// Builder for `ResultRecord`.
#[derive(Debug, Default)]
pub struct ResultRecordBuilder {
    parameters: ParameterSet,
    metadata: FieldMap,
    results: FieldMap,
}

impl ResultRecordBuilder {
    /// Create a new builder for a run at `parameters`.
    #[must_use]
    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    /// Set one metadata field.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merge a map of metadata fields, overwriting existing keys.
    #[must_use]
    pub fn metadata_fields(mut self, fields: FieldMap) -> Self {
        self.metadata.extend(fields);
        self
    }

    /// Set one result field.
    #[must_use]
    pub fn result(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.results.insert(key.into(), value.into());
        self
    }

    /// Merge a map of result fields, overwriting existing keys.
    #[must_use]
    pub fn result_fields(mut self, fields: FieldMap) -> Self {
        self.results.extend(fields);
        self
    }

    /// Build the `ResultRecord`.
    #[must_use]
    pub fn build(self) -> ResultRecord {
        ResultRecord {
            parameters: self.parameters,
            metadata: self.metadata,
            results: self.results,
        }
    }
}
