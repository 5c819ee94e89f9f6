//! The application object.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use cihai_bootstrap::{BootstrapReport, UnihanOptions};
use cihai_core::{AppDirs, Config, load_file, merge_values};
use cihai_sqlite::Database;
use serde_yaml::{Mapping, Value};

use crate::datasets::{UNIHAN_NAMESPACE, Unihan, UnihanVariants, VARIANTS_NAMESPACE};
use crate::error::{CihaiError, Result};
use crate::extend::Dataset;
use crate::registry::{Registered, Registry};

/// Config key holding [`UnihanOptions`].
pub const UNIHAN_OPTIONS_KEY: &str = "unihan_options";

/// Configuration layer that wires in the UNIHAN dataset and variants plugin.
///
/// Applied beneath the user's configuration unless disabled with
/// [`CihaiBuilder::unihan`].
pub fn unihan_config() -> Value {
    let mut datasets = Mapping::new();
    datasets.insert(UNIHAN_NAMESPACE.into(), Unihan::PATH.into());

    let mut unihan_plugins = Mapping::new();
    unihan_plugins.insert(VARIANTS_NAMESPACE.into(), UnihanVariants::PATH.into());
    let mut plugins = Mapping::new();
    plugins.insert(UNIHAN_NAMESPACE.into(), Value::Mapping(unihan_plugins));

    let mut root = Mapping::new();
    root.insert("datasets".into(), Value::Mapping(datasets));
    root.insert("plugins".into(), Value::Mapping(plugins));
    Value::Mapping(root)
}

/// Central application object.
///
/// Owns the resolved configuration, the shared database handle and every
/// attached dataset.
///
/// # Example
///
/// ```no_run
/// use cihai::Cihai;
///
/// let c = Cihai::new().unwrap();
/// if !c.is_bootstrapped().unwrap() {
///     c.bootstrap_unihan().unwrap();
/// }
///
/// let row = c.unihan().unwrap().lookup_char('好').unwrap().unwrap();
/// println!("{}", row.text("kDefinition").unwrap_or_default());
/// ```
pub struct Cihai {
    config: Config,
    dirs: AppDirs,
    sql: Rc<Database>,
    datasets: BTreeMap<String, Box<dyn Dataset>>,
    registry: Registry,
}

impl Cihai {
    /// Builds an application with default configuration and the UNIHAN dataset.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Builds an application from a JSON or YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CihaiError::ConfigError`] if the file does not exist, has an
    /// unsupported extension or fails to parse.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder().config_file(path).build()
    }

    pub fn builder() -> CihaiBuilder {
        CihaiBuilder::new()
    }

    /// Resolves `path` through the registry and attaches it under `namespace`.
    pub fn add_dataset(&mut self, path: &str, namespace: &str) -> Result<()> {
        let dataset = self.registry.dataset(path)?;
        self.add_dataset_instance(namespace, dataset);
        Ok(())
    }

    /// Attaches an already built dataset, replacing any under the same namespace.
    ///
    /// SQL-aware datasets receive the shared database.
    pub fn add_dataset_instance(&mut self, namespace: &str, mut dataset: Box<dyn Dataset>) {
        if let Some(access) = dataset.sql_access() {
            access.attach_sql(Rc::clone(&self.sql));
        }
        tracing::debug!(namespace, "attached dataset");
        self.datasets.insert(namespace.to_string(), dataset);
    }

    /// Resolves `path` and attaches the plugin to the dataset under `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`CihaiError::UnknownDataset`] if no such dataset is attached.
    pub fn add_plugin(&mut self, dataset: &str, path: &str, namespace: &str) -> Result<()> {
        let target = self
            .datasets
            .get_mut(dataset)
            .ok_or_else(|| CihaiError::UnknownDataset(dataset.to_string()))?;
        let plugin = self.registry.plugin(path)?;
        target.add_plugin(namespace, plugin)
    }

    fn load_extensions(&mut self) -> Result<()> {
        let datasets = self.config.datasets.clone();
        for (namespace, path) in &datasets {
            self.add_dataset(path, namespace)?;
        }

        let plugins = self.config.plugins.clone();
        for (dataset, plugins) in &plugins {
            for (namespace, path) in plugins {
                self.add_plugin(dataset, path, namespace)?;
            }
        }
        Ok(())
    }

    pub fn dataset(&self, namespace: &str) -> Option<&dyn Dataset> {
        self.datasets.get(namespace).map(|dataset| &**dataset)
    }

    pub fn dataset_mut(&mut self, namespace: &str) -> Option<&mut (dyn Dataset + 'static)> {
        match self.datasets.get_mut(namespace) {
            Some(dataset) => Some(dataset.as_mut()),
            None => None,
        }
    }

    /// Namespaces of every attached dataset, sorted.
    pub fn dataset_namespaces(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    /// Returns the dataset under `namespace` as its concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`CihaiError::UnknownDataset`] if nothing is attached there,
    /// or [`CihaiError::WrongDatasetType`] if it is some other type.
    pub fn dataset_as<T: Dataset + 'static>(&self, namespace: &str) -> Result<&T> {
        let dataset = self
            .datasets
            .get(namespace)
            .ok_or_else(|| CihaiError::UnknownDataset(namespace.to_string()))?;
        dataset
            .as_any()
            .downcast_ref()
            .ok_or_else(|| CihaiError::WrongDatasetType {
                namespace: namespace.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// The UNIHAN dataset under its default namespace.
    pub fn unihan(&self) -> Result<&Unihan> {
        self.dataset_as(UNIHAN_NAMESPACE)
    }

    /// The variants plugin attached to the UNIHAN dataset.
    pub fn unihan_variants(&self) -> Result<&UnihanVariants> {
        let unihan = self
            .datasets
            .get(UNIHAN_NAMESPACE)
            .ok_or_else(|| CihaiError::UnknownDataset(UNIHAN_NAMESPACE.to_string()))?;
        unihan
            .plugin::<UnihanVariants>(VARIANTS_NAMESPACE)
            .ok_or_else(|| CihaiError::UnresolvedPath(UnihanVariants::PATH.to_string()))
    }

    /// Bootstrap options from the `unihan_options` config section.
    ///
    /// `work_dir` defaults to `unihan` under the configured cache directory.
    pub fn unihan_options(&self) -> Result<UnihanOptions> {
        let mut options: UnihanOptions = self
            .config
            .section(UNIHAN_OPTIONS_KEY)?
            .unwrap_or_default();
        if options.work_dir.is_none() {
            options.work_dir = Some(self.config.dirs.cache.join("unihan"));
        }
        Ok(options)
    }

    /// Returns `true` if the database holds the UNIHAN table with every
    /// configured field.
    pub fn is_bootstrapped(&self) -> Result<bool> {
        let options = self.unihan_options()?;
        Ok(cihai_bootstrap::is_bootstrapped(&self.sql, &options)?)
    }

    /// Downloads and loads UNIHAN using the configured options.
    pub fn bootstrap_unihan(&self) -> Result<BootstrapReport> {
        let options = self.unihan_options()?;
        tracing::info!(source = %options.source, "bootstrapping UNIHAN");
        let report = cihai_bootstrap::bootstrap_unihan(&self.sql, &options)?;
        tracing::info!(
            rows = report.rows_inserted,
            fields = report.fields.len(),
            "UNIHAN bootstrap complete"
        );
        Ok(report)
    }

    /// Re-reads the database schema.
    pub fn reflect_db(&self) -> Result<()> {
        Ok(self.sql.reflect()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dirs(&self) -> &AppDirs {
        &self.dirs
    }

    /// The database shared with every SQL-aware dataset.
    pub fn sql(&self) -> &Rc<Database> {
        &self.sql
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Builder for [`Cihai`].
///
/// # Example
///
/// ```no_run
/// use cihai::Cihai;
/// use cihai_core::AppDirs;
///
/// let config = serde_yaml::from_str("database: {url: 'sqlite:///:memory:'}").unwrap();
/// let c = Cihai::builder()
///     .config(config)
///     .app_dirs(AppDirs::under_root("/tmp/cihai-sandbox"))
///     .build()
///     .unwrap();
/// assert!(c.unihan().is_ok());
/// ```
pub struct CihaiBuilder {
    config: Value,
    config_file: Option<PathBuf>,
    unihan: bool,
    dirs: Option<AppDirs>,
    registry: Registry,
}

impl CihaiBuilder {
    pub fn new() -> Self {
        Self {
            config: Value::Null,
            config_file: None,
            unihan: true,
            dirs: None,
            registry: Registry::default(),
        }
    }

    /// User configuration, merged over the defaults.
    pub fn config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Configuration file merged over [`config`](Self::config).
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Whether to wire in the UNIHAN dataset (on by default).
    pub fn unihan(mut self, enabled: bool) -> Self {
        self.unihan = enabled;
        self
    }

    /// Directories used for template expansion instead of the OS defaults.
    pub fn app_dirs(mut self, dirs: AppDirs) -> Self {
        self.dirs = Some(dirs);
        self
    }

    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Resolves configuration, opens the database and attaches datasets.
    ///
    /// # Errors
    ///
    /// Fails on configuration errors, if the database cannot be opened, or
    /// if a configured dataset or plugin cannot be resolved.
    pub fn build(self) -> Result<Cihai> {
        let user = match &self.config_file {
            Some(path) => merge_values(&self.config, &read_config(path)?),
            None => self.config,
        };
        let dirs = match self.dirs {
            Some(dirs) => dirs,
            None => AppDirs::discover()?,
        };
        let layers = if self.unihan {
            vec![unihan_config()]
        } else {
            Vec::new()
        };
        let config = Config::resolve(&user, &layers, &dirs)?;

        dirs.ensure_data_dir()?;
        let sql = Rc::new(Database::open(&config.database.url)?);

        let mut cihai = Cihai {
            config,
            dirs,
            sql,
            datasets: BTreeMap::new(),
            registry: self.registry,
        };
        cihai.load_extensions()?;
        Ok(cihai)
    }
}

impl Default for CihaiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn read_config(path: &Path) -> Result<Value> {
    tracing::debug!(path = %path.display(), "reading configuration file");
    Ok(load_file(path)?)
}
