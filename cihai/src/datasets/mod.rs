//! Built-in datasets and plugins.

mod unihan;
mod variants;

pub use unihan::{UNIHAN_NAMESPACE, Unihan};
pub use variants::{VARIANTS_NAMESPACE, UnihanVariants, Variant, VariantKind, parse_variants};
