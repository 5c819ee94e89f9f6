//! Extension points: datasets, plugins and the SQL mixin.
//!
//! A [`Dataset`] is attached to the application under a namespace and owns
//! any number of [`DatasetPlugin`]s. Either side can opt into database
//! access by returning a [`SqlAccess`] from `sql_access`; the application
//! hands its shared [`Database`] to datasets, and datasets pass theirs on to
//! plugins as they are attached.
//!
//! # Example
//!
//! ```
//! use std::any::Any;
//!
//! use cihai::{Dataset, Plugins, SqlAccess, SqlSlot};
//!
//! #[derive(Default)]
//! struct Radicals {
//!     sql: SqlSlot,
//!     plugins: Plugins,
//! }
//!
//! impl Dataset for Radicals {
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//!     fn plugins(&self) -> &Plugins { &self.plugins }
//!     fn plugins_mut(&mut self) -> &mut Plugins { &mut self.plugins }
//!     fn sql_access(&mut self) -> Option<&mut dyn SqlAccess> { Some(&mut self.sql) }
//! }
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use cihai_sqlite::Database;

use crate::error::{CihaiError, Result};

/// Plugins attached to a dataset, by namespace.
pub type Plugins = BTreeMap<String, Box<dyn DatasetPlugin>>;

/// Capability to receive the shared database handle.
pub trait SqlAccess {
    /// The attached database, if any.
    fn sql(&self) -> Option<&Rc<Database>>;

    /// Attaches (or replaces) the database handle.
    fn attach_sql(&mut self, db: Rc<Database>);
}

/// Storage for an injected database handle.
///
/// Embed one in a dataset or plugin and return it from `sql_access`.
#[derive(Clone, Default)]
pub struct SqlSlot {
    db: Option<Rc<Database>>,
}

impl SqlSlot {
    /// The attached database.
    ///
    /// # Errors
    ///
    /// Returns [`CihaiError::SqlNotAttached`] if nothing was attached yet.
    pub fn get(&self) -> Result<&Database> {
        self.db.as_deref().ok_or(CihaiError::SqlNotAttached)
    }

    pub fn is_attached(&self) -> bool {
        self.db.is_some()
    }
}

impl SqlAccess for SqlSlot {
    fn sql(&self) -> Option<&Rc<Database>> {
        self.db.as_ref()
    }

    fn attach_sql(&mut self, db: Rc<Database>) {
        self.db = Some(db);
    }
}

impl fmt::Debug for SqlSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlSlot")
            .field("url", &self.db.as_ref().map(|db| db.url()))
            .finish()
    }
}

/// A plugin attached to a dataset.
pub trait DatasetPlugin {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Opt into database access.
    fn sql_access(&mut self) -> Option<&mut dyn SqlAccess> {
        None
    }

    /// Runs once, right after the plugin is attached to its dataset.
    fn bootstrap(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A dataset attached to the application object.
pub trait Dataset {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn plugins(&self) -> &Plugins;
    fn plugins_mut(&mut self) -> &mut Plugins;

    /// Opt into database access.
    fn sql_access(&mut self) -> Option<&mut dyn SqlAccess> {
        None
    }

    /// Attaches a plugin under `namespace`.
    ///
    /// A SQL-aware plugin receives this dataset's database (if it has one)
    /// before its [`bootstrap`](DatasetPlugin::bootstrap) hook runs. An
    /// existing plugin under the same namespace is replaced.
    ///
    /// # Errors
    ///
    /// Propagates the plugin's bootstrap error; the plugin is not attached.
    fn add_plugin(&mut self, namespace: &str, mut plugin: Box<dyn DatasetPlugin>) -> Result<()> {
        let shared = self.sql_access().and_then(|access| access.sql().cloned());
        if let Some(db) = shared {
            if let Some(access) = plugin.sql_access() {
                access.attach_sql(db);
            }
        }

        plugin.bootstrap()?;
        tracing::debug!(namespace, "attached plugin");
        self.plugins_mut().insert(namespace.to_string(), plugin);
        Ok(())
    }
}

impl<'a> dyn Dataset + 'a {
    /// Downcasts the dataset to its concrete type.
    pub fn downcast_ref<T: Dataset + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Looks up a plugin by namespace and downcasts it.
    pub fn plugin<T: DatasetPlugin + 'static>(&self, namespace: &str) -> Option<&T> {
        self.plugins().get(namespace)?.as_any().downcast_ref()
    }

    /// Mutable counterpart of [`plugin`](Self::plugin).
    pub fn plugin_mut<T: DatasetPlugin + 'static>(&mut self, namespace: &str) -> Option<&mut T> {
        self.plugins_mut()
            .get_mut(namespace)?
            .as_any_mut()
            .downcast_mut()
    }
}
