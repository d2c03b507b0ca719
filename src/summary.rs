//! Shared aggregation for the combinators
//!
//! Both combinators reduce a list of records the same way:
//!
//! ```text
//! records ──filter(status)──> successful
//!         ──select fields───> [k1, k2, ...]
//!         ──gather values───> k1: [f64], k2: [f64], ...
//!         ──reduce──────────> k1_mean, k1_variance, ...
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::record::{FieldMap, ResultRecord, Section, Value};
use crate::stats::Statistic;
use crate::{Error, Result};

/// Which fields of a section to summarise.
///
/// Serializes as `null` for [`FieldSelection::All`] and as a list of names
/// for [`FieldSelection::Only`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum FieldSelection {
    /// Every field present in the first successful record.
    #[default]
    All,
    /// Exactly these fields, in this order.
    Only(Vec<String>),
}

impl FieldSelection {
    /// Select exactly the given fields.
    #[must_use]
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(fields.into_iter().map(Into::into).collect())
    }

    /// Resolve to a concrete field list.
    ///
    /// `first` is the matching section of the first record being
    /// summarised; `All` with no records resolves to nothing.
    #[must_use]
    pub fn resolve(&self, first: Option<&FieldMap>) -> Vec<String> {
        match self {
            Self::All => first.map(|m| m.keys().cloned().collect()).unwrap_or_default(),
            Self::Only(fields) => fields.clone(),
        }
    }
}

impl From<Option<Vec<String>>> for FieldSelection {
    fn from(fields: Option<Vec<String>>) -> Self {
        fields.map_or(Self::All, Self::Only)
    }
}

impl From<FieldSelection> for Option<Vec<String>> {
    fn from(selection: FieldSelection) -> Self {
        match selection {
            FieldSelection::All => None,
            FieldSelection::Only(fields) => Some(fields),
        }
    }
}

/// Keep the records whose `status` is `true`, preserving order.
///
/// # Errors
///
/// Returns an error if any record has a missing or non-boolean status.
pub fn successful(records: &[ResultRecord]) -> Result<Vec<&ResultRecord>> {
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if record.status()? {
            kept.push(record);
        }
    }
    Ok(kept)
}

/// Gather the numeric values of `field` across `records`.
///
/// # Errors
///
/// Returns [`Error::MissingField`] if a record lacks the field and
/// [`Error::NonNumericField`] if a value is not numeric.
pub fn field_values(records: &[&ResultRecord], section: Section, field: &str) -> Result<Vec<f64>> {
    records
        .iter()
        .map(|record| {
            let value = record
                .section(section)
                .get(field)
                .ok_or_else(|| Error::MissingField {
                    section,
                    field: field.to_string(),
                })?;
            value.as_f64().ok_or_else(|| Error::NonNumericField {
                section,
                field: field.to_string(),
                found: value.to_string(),
            })
        })
        .collect()
}

/// Reduce each of `fields` to `statistics`, naming outputs
/// `<prefix><field><suffix>`.
///
/// No records means no statistics: the returned map is empty. Values are
/// reduced in ascending order, so any permutation of `records` gives a
/// bit-identical summary.
///
/// # Errors
///
/// Propagates [`field_values`] errors.
pub fn summarise_fields(
    records: &[&ResultRecord],
    section: Section,
    fields: &[String],
    statistics: &[Statistic],
    prefix: &str,
) -> Result<FieldMap> {
    let mut summary = FieldMap::new();
    if records.is_empty() {
        return Ok(summary);
    }

    for field in fields {
        let mut values = field_values(records, section, field)?;
        values.sort_by(f64::total_cmp);
        for statistic in statistics {
            if let Some(x) = statistic.reduce(&values) {
                summary.insert(format!("{prefix}{}", statistic.field_name(field)), Value::Float(x));
            }
        }
        trace!(%section, field = field.as_str(), n = values.len(), "summarised field");
    }
    Ok(summary)
}

/// Resolve `selection` against the first record, then summarise.
///
/// # Errors
///
/// Propagates [`field_values`] errors.
pub fn summarise(
    records: &[&ResultRecord],
    section: Section,
    selection: &FieldSelection,
    statistics: &[Statistic],
) -> Result<FieldMap> {
    let first = records.first().map(|r| r.section(section));
    let fields = selection.resolve(first);
    summarise_fields(records, section, &fields, statistics, "")
}
