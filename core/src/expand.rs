//! Template expansion for configuration values.
//!
//! Every string in a configuration tree goes through three passes:
//!
//! 1. environment variables (`$VAR`, `${VAR}`); unknown variables are left
//!    as written
//! 2. a leading `~` becomes the home directory
//! 3. `{user_data_dir}`-style placeholders become [`AppDirs`] paths; `{{`
//!    and `}}` stand for literal braces
//!
//! ```
//! use cihai_core::{AppDirs, expand_templates};
//!
//! let dirs = AppDirs::under_root("/srv");
//! let raw = serde_yaml::Value::from("sqlite:///{user_data_dir}/cihai.db");
//! let expanded = expand_templates(&raw, &dirs).unwrap();
//! assert_eq!(expanded, serde_yaml::Value::from("sqlite:////srv/data/cihai/cihai.db"));
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_yaml::Value;

use crate::appdirs::AppDirs;
use crate::error::{ConfigError, Result};

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([^}]*)\}|([A-Za-z_][A-Za-z0-9_]*))").expect("static regex must compile")
});
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex must compile")
});

/// Expands templates in every string of `value` using the process
/// environment and the current user's home directory.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPlaceholder`] if a string contains a
/// `{name}` placeholder that [`AppDirs::placeholder`] does not know.
pub fn expand_templates(value: &Value, dirs: &AppDirs) -> Result<Value> {
    let home = dirs::home_dir();
    let ctx = ExpandContext {
        dirs,
        home: home.as_deref(),
        env: &|name: &str| std::env::var(name).ok(),
    };
    ctx.expand_value(value)
}

/// Inputs to a single expansion pass.
pub(crate) struct ExpandContext<'a> {
    pub dirs: &'a AppDirs,
    pub home: Option<&'a Path>,
    pub env: &'a dyn Fn(&str) -> Option<String>,
}

impl ExpandContext<'_> {
    pub(crate) fn expand_value(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(raw) => Ok(Value::String(self.expand_str(raw)?)),
            Value::Sequence(items) => items
                .iter()
                .map(|item| self.expand_value(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            Value::Mapping(map) => {
                let mut expanded = serde_yaml::Mapping::with_capacity(map.len());
                for (key, item) in map {
                    expanded.insert(key.clone(), self.expand_value(item)?);
                }
                Ok(Value::Mapping(expanded))
            }
            other => Ok(other.clone()),
        }
    }

    pub(crate) fn expand_str(&self, raw: &str) -> Result<String> {
        let with_env = self.expand_env(raw);
        let with_home = self.expand_home(&with_env);
        self.expand_placeholders(&with_home)
    }

    fn expand_env(&self, raw: &str) -> String {
        ENV_VAR_RE
            .replace_all(raw, |caps: &Captures<'_>| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                (self.env)(name).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn expand_home(&self, raw: &str) -> String {
        let Some(home) = self.home else {
            return raw.to_string();
        };
        if raw == "~" {
            return home.display().to_string();
        }
        match raw.strip_prefix("~/") {
            Some(rest) => home.join(rest).display().to_string(),
            None => raw.to_string(),
        }
    }

    fn expand_placeholders(&self, raw: &str) -> Result<String> {
        let mut unknown: Option<String> = None;
        let expanded = PLACEHOLDER_RE.replace_all(raw, |caps: &Captures<'_>| {
            // `{{` and `}}` are escaped braces.
            let Some(name) = caps.get(1) else {
                return caps[0][..1].to_string();
            };
            match self.dirs.placeholder(name.as_str()) {
                Some(path) => path.display().to_string(),
                None => {
                    unknown.get_or_insert_with(|| name.as_str().to_string());
                    caps[0].to_string()
                }
            }
        });

        match unknown {
            Some(name) => Err(ConfigError::UnknownPlaceholder(name, raw.to_string())),
            None => Ok(expanded.into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "CIHAI_HOME" => Some("/opt/cihai".to_string()),
            "LANG" => Some("zh_TW".to_string()),
            _ => None,
        }
    }

    fn expand(raw: &str) -> Result<String> {
        let dirs = AppDirs::under_root("/root-dir");
        let ctx = ExpandContext {
            dirs: &dirs,
            home: Some(Path::new("/home/user")),
            env: &fake_env,
        };
        ctx.expand_str(raw)
    }

    #[test]
    fn test_env_vars_both_forms() {
        assert_eq!(expand("$CIHAI_HOME/db").unwrap(), "/opt/cihai/db");
        assert_eq!(expand("${LANG}.txt").unwrap(), "zh_TW.txt");
    }

    #[test]
    fn test_unknown_env_var_left_untouched() {
        assert_eq!(expand("$NOPE/x").unwrap(), "$NOPE/x");
        assert_eq!(expand("${NOPE}/x").unwrap(), "${NOPE}/x");
    }

    #[test]
    fn test_tilde_expansion_only_at_start() {
        assert_eq!(expand("~/cihai.db").unwrap(), "/home/user/cihai.db");
        assert_eq!(expand("~").unwrap(), "/home/user");
        assert_eq!(expand("a/~/b").unwrap(), "a/~/b");
    }

    #[test]
    fn test_dir_placeholders() {
        assert_eq!(
            expand("sqlite:///{user_data_dir}/cihai.db").unwrap(),
            "sqlite:////root-dir/data/cihai/cihai.db"
        );
        assert_eq!(expand("{user_log_dir}").unwrap(), "/root-dir/cache/cihai/log");
    }

    #[test]
    fn test_unknown_placeholder_is_error() {
        let err = expand("{nope}/x").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlaceholder(ref name, _) if name == "nope"));
    }

    #[test]
    fn test_non_identifier_braces_are_literal() {
        assert_eq!(expand("{ not a placeholder }").unwrap(), "{ not a placeholder }");
    }

    #[test]
    fn test_doubled_braces_are_escapes() {
        assert_eq!(expand("{{user_data_dir}}").unwrap(), "{user_data_dir}");
        assert_eq!(
            expand("{{nope}}/{user_data_dir}").unwrap(),
            "{nope}//root-dir/data/cihai"
        );
        assert_eq!(expand("{{{user_cache_dir}}}").unwrap(), "{/root-dir/cache/cihai}");
    }

    #[test]
    fn test_expand_value_walks_nested_structures() {
        let dirs = AppDirs::under_root("/r");
        let ctx = ExpandContext {
            dirs: &dirs,
            home: None,
            env: &fake_env,
        };
        let raw: Value = serde_yaml::from_str(
            r#"
debug: true
dirs:
  cache: "{user_cache_dir}"
paths:
  - "$CIHAI_HOME"
  - 42
"#,
        )
        .unwrap();

        let expanded = ctx.expand_value(&raw).unwrap();
        assert_eq!(expanded["debug"], Value::Bool(true));
        assert_eq!(expanded["dirs"]["cache"], Value::from("/r/cache/cihai"));
        assert_eq!(expanded["paths"][0], Value::from("/opt/cihai"));
        assert_eq!(expanded["paths"][1], Value::from(42));
    }
}
