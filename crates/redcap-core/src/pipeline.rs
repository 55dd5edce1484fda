//! Two-pass expansion pipeline.
//!
//! 1. **Pass 1** runs every record through the [`TransformRegistry`],
//!    flattening shorthand shapes into concrete fields.
//! 2. **Pass 2** checks marker balance on the result, then copies ordinary
//!    records through and unrolls each top-level group with a
//!    [`GroupUnroller`].
//!
//! Both passes are fully materialized; nothing is returned unless the whole
//! run succeeds.
//!
//! # Example
//!
//! ```ignore
//! use redcap_core::Pipeline;
//! use redcap_model::ExpandOptions;
//!
//! let expansion = Pipeline::new(ExpandOptions::default()).run(&dictionary.records)?;
//! write_dictionary(&output, &dictionary.with_records(expansion.records))?;
//! ```

use std::time::Instant;

use redcap_model::{ExpandOptions, FieldRecord};
use redcap_transform::{TransformOptions, TransformRegistry};
use tracing::{info, info_span};

use crate::error::Result;
use crate::naming::{EnglishPluralizer, Pluralize};
use crate::scanner::{Row, Segment, partition, tokenize};
use crate::structure::{GroupOutline, outline_rows};
use crate::unroll::{GroupUnroller, Scope};

/// Record and group counts of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionStats {
    pub input_records: usize,
    /// Records after pass 1.
    pub transformed_records: usize,
    pub output_records: usize,
    /// Top-level groups unrolled.
    pub groups: usize,
    /// Groups nested inside another group, at any depth.
    pub nested_groups: usize,
}

/// Output of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub records: Vec<FieldRecord>,
    pub groups: Vec<GroupOutline>,
    pub stats: ExpansionStats,
}

/// Pass 1 followed by pass 2 under one set of options.
pub struct Pipeline {
    options: ExpandOptions,
    registry: TransformRegistry,
    pluralizer: Box<dyn Pluralize>,
}

impl Pipeline {
    /// A pipeline with every built-in shape and English plurals.
    pub fn new(options: ExpandOptions) -> Self {
        let registry = TransformRegistry::with_defaults(&TransformOptions::from(&options));
        Self {
            options,
            registry,
            pluralizer: Box::new(EnglishPluralizer),
        }
    }

    /// Replaces the pass 1 registry.
    #[must_use]
    pub fn with_registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the pluralizer consulted for group names.
    #[must_use]
    pub fn with_pluralizer(mut self, pluralizer: impl Pluralize + 'static) -> Self {
        self.pluralizer = Box::new(pluralizer);
        self
    }

    /// Pass 1: expands field shapes.
    pub fn transform(&self, records: &[FieldRecord]) -> Result<Vec<FieldRecord>> {
        let span = info_span!("pass1", records = records.len());
        let _guard = span.enter();
        Ok(self.registry.transform_all(records)?)
    }

    /// Pass 1 and the structure check, without unrolling.
    pub fn check(&self, records: &[FieldRecord]) -> Result<Vec<GroupOutline>> {
        let transformed = self.transform(records)?;
        let rows = tokenize(&transformed)?;
        outline_rows(&rows)
    }

    /// Pass 2: unrolls every group of already transformed records.
    pub fn unroll(&self, records: &[FieldRecord]) -> Result<(Vec<FieldRecord>, Vec<GroupOutline>)> {
        let span = info_span!("pass2", records = records.len());
        let _guard = span.enter();
        let start = Instant::now();

        let rows = tokenize(records)?;
        let groups = outline_rows(&rows)?;
        let unroller = GroupUnroller::new(&self.options, self.pluralizer.as_ref());

        let mut outer: Vec<Row<'_>> = Vec::new();
        let mut output = Vec::with_capacity(records.len());
        for segment in partition(&rows)? {
            match segment {
                Segment::Field(row) => {
                    output.push(row.record.clone());
                    outer.push(row.clone());
                }
                Segment::Group { span, .. } => {
                    output.extend(unroller.unroll(&span, &Scope::top_level(&outer))?);
                }
            }
        }

        info!(
            input = records.len(),
            output = output.len(),
            groups = groups.len(),
            duration_ms = start.elapsed().as_millis(),
            "repeat groups unrolled"
        );
        Ok((output, groups))
    }

    /// Runs both passes.
    ///
    /// # Errors
    ///
    /// Any pass 1 or pass 2 error aborts the run.
    pub fn run(&self, records: &[FieldRecord]) -> Result<Expansion> {
        let span = info_span!("expand", records = records.len());
        let _guard = span.enter();

        let transformed = self.transform(records)?;
        let (output, groups) = self.unroll(&transformed)?;
        let stats = ExpansionStats {
            input_records: records.len(),
            transformed_records: transformed.len(),
            output_records: output.len(),
            groups: groups.len(),
            nested_groups: groups.iter().map(GroupOutline::descendants).sum(),
        };
        Ok(Expansion {
            records: output,
            groups,
            stats,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ExpandOptions::default())
    }
}
