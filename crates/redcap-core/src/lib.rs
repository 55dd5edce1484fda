//! Repeat-group expansion for REDCap data dictionaries.
//!
//! A repeat group is a run of rows opened by a `startrepeat` marker in the id
//! column and closed by `endrepeat` (or a single row marked `repeat`). This
//! crate unrolls every group into numbered copies of its fields and drives
//! the complete two-pass expansion.
//!
//! - **scanner**: group boundaries by marker depth
//! - **structure**: the group tree, used for the structure check
//! - **unroll**: [`GroupUnroller`], the per-group expansion
//! - **logic**: branching logic rewriting and generated conditions
//! - **label**: per-iteration label numbering
//! - **naming**: group plurals through the [`Pluralize`] capability
//! - **pipeline**: [`Pipeline`], pass 1 plus pass 2

pub mod error;
pub mod label;
pub mod logic;
pub mod naming;
pub mod pipeline;
pub mod scanner;
pub mod structure;
pub mod unroll;

pub use error::{RepeatError, Result};
pub use label::iteration_label;
pub use logic::{IdRewrite, conjoin};
pub use naming::{EnglishPluralizer, GroupNamer, Pluralize};
pub use pipeline::{Expansion, ExpansionStats, Pipeline};
pub use scanner::{GroupSpan, Row, Segment, find_group, partition, tokenize};
pub use structure::{GroupOutline, check_structure, outline_rows};
pub use unroll::{GroupUnroller, Scope, iteration_id};
