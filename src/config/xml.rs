//! XML configuration file.
//!
//! ```xml
//! <config>
//!   <log_level>info</log_level>
//!   <log_file>/var/log/fs_inspect.log</log_file>
//!   <show_hidden>false</show_hidden>
//!   <case_sensitive>true</case_sensitive>
//!   <exact_match>false</exact_match>
//!   <replace>true</replace>
//!   <delete_source>false</delete_source>
//! </config>
//! ```
//!
//! Every element is optional; unknown elements are rejected.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::{Deserialize, Deserializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FS_INSPECT_CONFIG";

#[derive(Debug, Deserialize)]
#[serde(rename = "config", deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    show_hidden: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    case_sensitive: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    exact_match: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    replace: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    delete_source: Option<bool>,
}

fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("true") || s == "1" => Ok(Some(true)),
        Some(s) if s.eq_ignore_ascii_case("false") || s == "0" => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!("expected true/false, got '{other}'"))),
    }
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(s) = parsed.log_level.as_deref()
        && !s.trim().is_empty()
    {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    cfg.log_file = parsed
        .log_file
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);
    cfg.show_hidden = parsed.show_hidden.unwrap_or(cfg.show_hidden);
    cfg.case_sensitive = parsed.case_sensitive.unwrap_or(cfg.case_sensitive);
    cfg.exact_match = parsed.exact_match.unwrap_or(cfg.exact_match);
    cfg.replace = parsed.replace.unwrap_or(cfg.replace);
    cfg.delete_source = parsed.delete_source.unwrap_or(cfg.delete_source);
    Ok(cfg)
}

/// Parse the config file at `path`.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig =
        from_xml_str(&contents).with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Resolve and load the active config.
///
/// Order: `explicit` (the `--config` flag), then `$FS_INSPECT_CONFIG`, then the
/// default location. An explicitly named file must exist; a missing default
/// file just means defaults. Returns the config and the file it came from.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    if let Some(path) = named {
        if !path.is_file() {
            bail!("config file '{}' does not exist or is not a file", path.display());
        }
        let cfg = load_config_from_xml_path(&path)?;
        debug!(path = %path.display(), "loaded config");
        return Ok((cfg, Some(path)));
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            let cfg = load_config_from_xml_path(&path)?;
            debug!(path = %path.display(), "loaded default config");
            Ok((cfg, Some(path)))
        }
        _ => Ok((Config::default(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Config> {
        xml_to_config(from_xml_str(xml)?)
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse("<config></config>").unwrap(), Config::default());
    }

    #[test]
    fn trims_booleans_and_paths() {
        let cfg = parse(
            "<config><show_hidden> true </show_hidden><replace>0</replace>\
             <log_file>  /tmp/x.log </log_file></config>",
        )
        .unwrap();
        assert!(cfg.show_hidden);
        assert!(!cfg.replace);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(parse("<config><colour>red</colour></config>").is_err());
        assert!(parse("<config><replace>maybe</replace></config>").is_err());
        assert!(parse("<config><log_level>shouty</log_level></config>").is_err());
    }
}
