use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{compile_policy, FilterError, RemovalPolicy, ReservedFields};

/// Default for `removeNull` when the host omits it.
pub const DEFAULT_REMOVE_NULL: bool = false;

/// Default for `removeEmpty` when the host omits it.
pub const DEFAULT_REMOVE_EMPTY: bool = false;

/// Filter settings supplied by the host as the function `conf` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(deserialize_with = "remove_null_flag")]
    pub remove_null: bool,
    #[serde(deserialize_with = "remove_empty_flag")]
    pub remove_empty: bool,
    /// Field names reserved in addition to the built-in ones.
    #[serde(deserialize_with = "null_as_default")]
    pub reserved_fields: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            remove_null: DEFAULT_REMOVE_NULL,
            remove_empty: DEFAULT_REMOVE_EMPTY,
            reserved_fields: Vec::new(),
        }
    }
}

impl FilterConfig {
    pub fn new(remove_null: bool, remove_empty: bool) -> Self {
        Self {
            remove_null,
            remove_empty,
            ..Self::default()
        }
    }

    /// Loads settings from `REMOVE_NULL`, `REMOVE_EMPTY` and
    /// `RESERVED_FIELDS` (comma separated).
    pub fn from_env() -> Result<Self, FilterError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`FilterConfig::from_env`] with a caller supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FilterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("REMOVE_NULL") {
            config.remove_null = parse_flag("REMOVE_NULL", &value)?;
        }

        if let Some(value) = lookup("REMOVE_EMPTY") {
            config.remove_empty = parse_flag("REMOVE_EMPTY", &value)?;
        }

        if let Some(value) = lookup("RESERVED_FIELDS") {
            config.reserved_fields = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(config)
    }

    pub fn policy(&self) -> RemovalPolicy {
        compile_policy(self.remove_null, self.remove_empty)
    }

    pub fn reserved(&self) -> ReservedFields {
        let mut reserved = ReservedFields::default();
        reserved.extend(self.reserved_fields.iter().cloned());
        reserved
    }
}

/// Initialization options handed over by the host pipeline.
///
/// Only `conf` affects filtering. `pipe_idx`, `pid` and `cid` identify the
/// function slot, pipeline and worker in diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunctionOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub conf: FilterConfig,
    pub pipe_idx: Option<u64>,
    pub pid: Option<String>,
    pub cid: Option<String>,
}

impl FunctionOptions {
    pub fn new(conf: FilterConfig) -> Self {
        Self {
            conf,
            ..Self::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self, FilterError> {
        serde_json::from_value(value).map_err(|e| FilterError::InvalidConfig(e.to_string()))
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, FilterError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" || value.is_empty() {
        Ok(false)
    } else {
        Err(FilterError::InvalidEnv {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn remove_null_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Option::<bool>::deserialize(deserializer).map(|flag| flag.unwrap_or(DEFAULT_REMOVE_NULL))
}

fn remove_empty_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Option::<bool>::deserialize(deserializer).map(|flag| flag.unwrap_or(DEFAULT_REMOVE_EMPTY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_flags_use_defaults() {
        let config: FilterConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.remove_null, DEFAULT_REMOVE_NULL);
        assert_eq!(config.remove_empty, DEFAULT_REMOVE_EMPTY);
        assert!(config.reserved_fields.is_empty());
    }

    #[test]
    fn test_null_flags_use_defaults() {
        let config: FilterConfig =
            serde_json::from_value(json!({"removeNull": null, "removeEmpty": null})).unwrap();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(parse_flag("X", "1").unwrap());
        assert!(!parse_flag("X", "false").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(matches!(
            parse_flag("X", "yes"),
            Err(FilterError::InvalidEnv { .. })
        ));
    }
}
