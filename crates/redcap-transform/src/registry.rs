//! Field transformer trait and registry.
//!
//! This module provides a trait-based abstraction for shape transformers,
//! enabling per-kind registration and easier testing.
//!
//! # Architecture
//!
//! The [`FieldTransformer`] trait defines a common interface for all shape
//! transformers. Each transformer is registered in the [`TransformRegistry`]
//! under a [`FieldKind`]; records whose field type has no registered
//! transformer pass through unchanged.
//!
//! # Example
//!
//! ```ignore
//! use redcap_transform::{TransformOptions, TransformRegistry};
//!
//! let registry = TransformRegistry::with_defaults(&TransformOptions::default());
//! let expanded = registry.transform_all(&records)?;
//! ```

use std::collections::HashMap;
use std::time::Instant;

use redcap_model::{DEFAULT_MUTEX_SYNONYMS, ExpandOptions, FieldRecord};
use tracing::{debug, info};

use crate::error::Result;
use crate::kind::{ChoiceKind, DetailKind, FieldKind};
use crate::shapes::{AgeSplit, CheckboxMutex, ChoiceDetails, MinMax, ValueWithUnits};
use crate::span::{Part, assign_span_ids};

/// Trait for shorthand field shapes.
///
/// Implementors turn one record into the ordered parts that replace it.
/// Identifiers are assigned afterwards by the registry, which appends each
/// part's suffix and carries the original group marker across the run.
pub trait FieldTransformer: Send + Sync {
    /// Short human-readable description of the shape.
    fn description(&self) -> &'static str;

    /// Expands `record` into one or more parts.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be expanded (malformed choice
    /// cells, missing detail choices).
    fn expand(&self, record: &FieldRecord) -> Result<Vec<Part>>;
}

/// Wording and choice configuration used by the built-in transformers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Lower-cased labels that `checkbox_mutex` fields guard.
    pub mutex_synonyms: Vec<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            mutex_synonyms: DEFAULT_MUTEX_SYNONYMS
                .iter()
                .map(|synonym| (*synonym).to_string())
                .collect(),
        }
    }
}

impl From<&ExpandOptions> for TransformOptions {
    fn from(options: &ExpandOptions) -> Self {
        Self {
            mutex_synonyms: options
                .mutex_synonyms
                .iter()
                .map(|synonym| synonym.trim().to_lowercase())
                .collect(),
        }
    }
}

/// Registry of field transformers indexed by field kind.
pub struct TransformRegistry {
    transformers: HashMap<FieldKind, Box<dyn FieldTransformer>>,
}

impl TransformRegistry {
    /// Creates an empty registry; every record passes through unchanged.
    pub fn new() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// Builds a registry with every built-in shape.
    pub fn with_defaults(options: &TransformOptions) -> Self {
        let mut registry = Self::new();

        registry.register(FieldKind::MinMax, Box::new(MinMax::PLAIN));
        registry.register(
            FieldKind::ValueWithWeightUnits,
            Box::new(ValueWithUnits::WEIGHT),
        );
        registry.register(
            FieldKind::ValueWithLengthUnits,
            Box::new(ValueWithUnits::LENGTH),
        );
        registry.register(FieldKind::ValueWithUnits, Box::new(ValueWithUnits::FREE_TEXT));
        registry.register(
            FieldKind::ValueWithUnitsAndMinMax,
            Box::new(ValueWithUnits::WITH_MINMAX),
        );
        registry.register(
            FieldKind::ValueWithUnitsAndNormalRange,
            Box::new(ValueWithUnits::WITH_NORMAL_RANGE),
        );
        registry.register(FieldKind::RangeWithUnits, Box::new(ValueWithUnits::RANGE));
        registry.register(FieldKind::AgeWeeksDays, Box::new(AgeSplit::WEEKS_DAYS));
        registry.register(FieldKind::AgeYearsMonths, Box::new(AgeSplit::YEARS_MONTHS));

        for choice in ChoiceKind::ALL {
            for detail in [DetailKind::Text, DetailKind::Notes] {
                for other_only in [false, true] {
                    registry.register(
                        FieldKind::ChoiceDetails {
                            choice,
                            detail,
                            other_only,
                        },
                        Box::new(ChoiceDetails::new(choice, detail, other_only)),
                    );
                }
            }
        }

        for other in [false, true] {
            registry.register(
                FieldKind::CheckboxMutex { other },
                Box::new(CheckboxMutex::new(options.mutex_synonyms.clone(), other)),
            );
        }

        registry
    }

    /// Registers a transformer for a kind, replacing any previous one.
    pub fn register(&mut self, kind: FieldKind, transformer: Box<dyn FieldTransformer>) {
        self.transformers.insert(kind, transformer);
    }

    /// Gets the transformer for a field-type cell, if one is registered.
    pub fn get(&self, tag: &str) -> Option<&dyn FieldTransformer> {
        let kind = FieldKind::from_tag(tag)?;
        self.transformers.get(&kind).map(|t| t.as_ref())
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Returns true if no transformers are registered.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Expands one record. Unregistered kinds return the record unchanged.
    pub fn transform(&self, record: &FieldRecord) -> Result<Vec<FieldRecord>> {
        let Some(transformer) = self.get(&record.field_kind) else {
            return Ok(vec![record.clone()]);
        };
        let parts = transformer.expand(record)?;
        debug!(
            field = %record.base_id(),
            kind = %record.field_kind.trim(),
            shape = transformer.description(),
            expanded = parts.len(),
            "expanded field"
        );
        assign_span_ids(record, parts)
    }

    /// Pass 1: expands every record, flattening the results in order.
    pub fn transform_all(&self, records: &[FieldRecord]) -> Result<Vec<FieldRecord>> {
        let start = Instant::now();
        let mut expanded = Vec::with_capacity(records.len());
        for record in records {
            expanded.extend(self.transform(record)?);
        }
        info!(
            input = records.len(),
            output = expanded.len(),
            duration_ms = start.elapsed().as_millis(),
            "field shapes expanded"
        );
        Ok(expanded)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_defaults(&TransformOptions::default())
    }
}
