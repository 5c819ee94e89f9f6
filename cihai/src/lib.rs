//! Look up CJK characters in the UNIHAN database.
//!
//! [`Cihai`] is the application object. Building one resolves
//! configuration (see [`cihai_core`]), opens the SQLite store (see
//! [`cihai_sqlite`]) and attaches the configured datasets and plugins.
//! The UNIHAN table itself is populated on demand by
//! [`Cihai::bootstrap_unihan`] (see [`cihai_bootstrap`]).
//!
//! # Datasets and plugins
//!
//! Configuration names datasets and plugins by path:
//!
//! ```yaml
//! datasets:
//!   unihan: cihai::datasets::Unihan
//! plugins:
//!   unihan:
//!     variants: cihai::datasets::UnihanVariants
//! ```
//!
//! Paths are resolved through a [`Registry`]. Register your own types to
//! make them available from configuration.
//!
//! # Quick start
//!
//! ```no_run
//! use cihai::Cihai;
//!
//! let c = Cihai::new().unwrap();
//! if !c.is_bootstrapped().unwrap() {
//!     c.bootstrap_unihan().unwrap();
//! }
//!
//! for row in c.unihan().unwrap().reverse_char(&["good"]).unwrap() {
//!     println!("{:?} {:?}", row.text("char"), row.text("kDefinition"));
//! }
//! ```

mod app;
pub mod datasets;
mod error;
mod extend;
mod registry;

pub use app::{Cihai, CihaiBuilder, UNIHAN_OPTIONS_KEY, unihan_config};
pub use datasets::{
    UNIHAN_NAMESPACE, Unihan, UnihanVariants, VARIANTS_NAMESPACE, Variant, VariantKind,
    parse_variants,
};
pub use error::{CihaiError, Result};
pub use extend::{Dataset, DatasetPlugin, Plugins, SqlAccess, SqlSlot};
pub use registry::{DatasetConstructor, PluginConstructor, Registered, Registry};

pub use cihai_bootstrap::{BootstrapReport, UnihanOptions};
pub use cihai_core::{AppDirs, Config};
pub use cihai_sqlite::{Database, Record, rusqlite};
