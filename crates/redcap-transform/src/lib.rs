//! Pass 1 of data dictionary expansion: field shape transformers.
//!
//! Shorthand field types such as `minmax`, `value_with_weight_units` or
//! `checkbox_other` are expanded into the concrete REDCap fields they stand
//! for. Each shape is a [`FieldTransformer`] registered in the
//! [`TransformRegistry`]; any other field type passes through untouched.
//!
//! - **kind**: the [`FieldKind`] tags and their decoding
//! - **registry**: trait, registry and pass-level driver
//! - **shapes**: the built-in shapes
//! - **span**: id assignment that keeps group markers at the run boundaries

pub mod error;
pub mod kind;
pub mod registry;
pub mod shapes;
pub mod span;

pub use error::{Result, TransformError};
pub use kind::{ChoiceKind, DetailKind, FieldKind};
pub use registry::{FieldTransformer, TransformOptions, TransformRegistry};
pub use span::{Part, SpanPosition, assign_span_ids, retag_id};
