//! The four cleaning stages, in the order the pipeline applies them.

pub mod filter;
pub mod impute;
pub mod normalize;
pub mod string_ops;
pub mod trim;

pub use filter::remove_invalid_rows;
pub use impute::{Imputation, Resolved, resolve_missing_values};
pub use normalize::{LabelCollision, Normalized, normalize_columns};
pub use trim::trim_text_fields;
