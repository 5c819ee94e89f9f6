//! Constructors for datasets and plugins, looked up by path string.
//!
//! Configuration names datasets and plugins by path, e.g.
//! `cihai::datasets::Unihan`. The registry maps each path to a constructor
//! so the application can build them without knowing their types.

use std::collections::BTreeMap;

use crate::datasets::{Unihan, UnihanVariants};
use crate::error::{CihaiError, Result};
use crate::extend::{Dataset, DatasetPlugin};

/// Builds a fresh dataset.
pub type DatasetConstructor = fn() -> Box<dyn Dataset>;

/// Builds a fresh plugin.
pub type PluginConstructor = fn() -> Box<dyn DatasetPlugin>;

/// A type with a well-known registry path.
pub trait Registered {
    const PATH: &'static str;
}

/// Path → constructor tables for datasets and plugins.
///
/// [`Registry::default`] includes the built-in UNIHAN dataset and its
/// variants plugin.
///
/// # Examples
///
/// ```
/// use cihai::{Registry, Unihan, UnihanVariants, Registered};
///
/// let registry = Registry::default();
/// assert!(registry.has_dataset(Unihan::PATH));
/// assert!(registry.has_plugin(UnihanVariants::PATH));
/// assert!(registry.dataset("my::Missing").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    datasets: BTreeMap<String, DatasetConstructor>,
    plugins: BTreeMap<String, PluginConstructor>,
}

fn construct_dataset<T: Dataset + Default + 'static>() -> Box<dyn Dataset> {
    Box::new(T::default())
}

fn construct_plugin<T: DatasetPlugin + Default + 'static>() -> Box<dyn DatasetPlugin> {
    Box::new(T::default())
}

impl Registry {
    /// Creates a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            datasets: BTreeMap::new(),
            plugins: BTreeMap::new(),
        }
    }

    /// Registers a dataset type under its [`Registered::PATH`].
    pub fn register_dataset<T>(&mut self) -> &mut Self
    where
        T: Dataset + Registered + Default + 'static,
    {
        self.register_dataset_with(T::PATH, construct_dataset::<T>)
    }

    /// Registers a dataset constructor under an arbitrary path.
    pub fn register_dataset_with(
        &mut self,
        path: impl Into<String>,
        constructor: DatasetConstructor,
    ) -> &mut Self {
        self.datasets.insert(path.into(), constructor);
        self
    }

    /// Registers a plugin type under its [`Registered::PATH`].
    pub fn register_plugin<T>(&mut self) -> &mut Self
    where
        T: DatasetPlugin + Registered + Default + 'static,
    {
        self.register_plugin_with(T::PATH, construct_plugin::<T>)
    }

    /// Registers a plugin constructor under an arbitrary path.
    pub fn register_plugin_with(
        &mut self,
        path: impl Into<String>,
        constructor: PluginConstructor,
    ) -> &mut Self {
        self.plugins.insert(path.into(), constructor);
        self
    }

    pub fn has_dataset(&self, path: &str) -> bool {
        self.datasets.contains_key(path)
    }

    pub fn has_plugin(&self, path: &str) -> bool {
        self.plugins.contains_key(path)
    }

    /// Builds the dataset registered under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CihaiError::UnresolvedPath`] if nothing is registered there.
    pub fn dataset(&self, path: &str) -> Result<Box<dyn Dataset>> {
        let constructor = self
            .datasets
            .get(path)
            .ok_or_else(|| CihaiError::UnresolvedPath(path.to_string()))?;
        Ok(constructor())
    }

    /// Builds the plugin registered under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CihaiError::UnresolvedPath`] if nothing is registered there.
    pub fn plugin(&self, path: &str) -> Result<Box<dyn DatasetPlugin>> {
        let constructor = self
            .plugins
            .get(path)
            .ok_or_else(|| CihaiError::UnresolvedPath(path.to_string()))?;
        Ok(constructor())
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register_dataset::<Unihan>()
            .register_plugin::<UnihanVariants>();
        registry
    }
}
