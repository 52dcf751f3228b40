//! Configuration file support for statusgrid
//!
//! Loads per-project display settings from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.statusgridrc.json` in project root
//! 3. `statusgrid.config.json` in project root
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::navigation::DEFAULT_FIELD;
use crate::sort::{SortColumn, SortDirection, SortState};
use crate::table::DEFAULT_NEUTRAL_COLOR;
use crate::view::ViewOptions;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// statusgrid configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusGridConfig {
    /// Summary color when no column is visible (default: #dbdbdb)
    #[serde(default)]
    pub neutral_color: Option<String>,

    /// Field code for drill-down links when the page URL has none (default: 2)
    #[serde(default)]
    pub default_field: Option<u32>,

    /// Initial direction of the worst-time sort, "asc" or "desc" (default: desc)
    #[serde(default)]
    pub initial_direction: Option<String>,

    /// View to activate right after loading (default: all columns)
    #[serde(default)]
    pub initial_view: Option<String>,
}

/// Resolved configuration with defaults applied
#[derive(Debug)]
pub struct ResolvedConfig {
    pub neutral_color: String,
    pub default_field: u32,
    pub initial_direction: SortDirection,
    pub initial_view: Option<String>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

fn is_hex_color(s: &str) -> bool {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$")
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}

impl StatusGridConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref color) = self.neutral_color {
            if !is_hex_color(color) {
                anyhow::bail!(
                    "neutral_color must be a #rgb or #rrggbb color (got {})",
                    color
                );
            }
        }

        if let Some(field) = self.default_field {
            if field == 0 {
                anyhow::bail!("default_field must be positive (got {})", field);
            }
        }

        if let Some(ref direction) = self.initial_direction {
            direction
                .parse::<SortDirection>()
                .context("invalid initial_direction")?;
        }

        if let Some(ref view) = self.initial_view {
            if view.is_empty() {
                anyhow::bail!("initial_view must not be empty");
            }
        }

        Ok(())
    }

    /// Resolve config into the form used at runtime
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let initial_direction = match &self.initial_direction {
            Some(d) => d.parse()?,
            None => SortDirection::Descending,
        };

        Ok(ResolvedConfig {
            neutral_color: self
                .neutral_color
                .clone()
                .unwrap_or_else(|| DEFAULT_NEUTRAL_COLOR.to_string()),
            default_field: self.default_field.unwrap_or(DEFAULT_FIELD),
            initial_direction,
            initial_view: self.initial_view.clone(),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        StatusGridConfig::default().resolve()
    }

    /// Startup options for a table view state
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            neutral_color: self.neutral_color.clone(),
            sort: SortState {
                column: Some(SortColumn::Summary),
                direction: self.initial_direction,
            },
        }
    }
}

/// Discover and load a config file from the project root
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(StatusGridConfig, PathBuf)>> {
    for name in [".statusgridrc.json", "statusgrid.config.json"] {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<StatusGridConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: StatusGridConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (StatusGridConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    log::debug!("resolved config: {:?}", resolved);
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = StatusGridConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.neutral_color, "#dbdbdb");
        assert_eq!(resolved.default_field, 2);
        assert_eq!(resolved.initial_direction, SortDirection::Descending);
        assert!(resolved.initial_view.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r##"{
            "neutral_color": "#eee",
            "default_field": 3,
            "initial_direction": "asc",
            "initial_view": "linux"
        }"##;
        let config: StatusGridConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.neutral_color, "#eee");
        assert_eq!(resolved.default_field, 3);
        assert_eq!(resolved.initial_direction, SortDirection::Ascending);
        assert_eq!(resolved.initial_view.as_deref(), Some("linux"));

        let options = resolved.view_options();
        assert_eq!(options.neutral_color, "#eee");
        assert_eq!(options.sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<StatusGridConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_bad_color() {
        for color in ["dbdbdb", "#dbdb", "#gggggg", "grey"] {
            let config = StatusGridConfig {
                neutral_color: Some(color.to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{} should be rejected", color);
        }
    }

    #[test]
    fn test_reject_zero_field_and_bad_direction() {
        let json = r#"{"default_field": 0}"#;
        let config: StatusGridConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());

        let json = r#"{"initial_direction": "sideways"}"#;
        let config: StatusGridConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".statusgridrc.json"), r#"{"default_field": 4}"#).unwrap();
        fs::write(
            dir.path().join("statusgrid.config.json"),
            r#"{"default_field": 5}"#,
        )
        .unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.default_field, Some(4));
        assert_eq!(path, dir.path().join(".statusgridrc.json"));
    }

    #[test]
    fn test_discover_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("statusgrid.config.json"),
            r#"{"initial_view": "arm"}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.initial_view.as_deref(), Some("arm"));
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r##"{"neutral_color": "#ffffff"}"##).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.neutral_color, "#ffffff");
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.default_field, DEFAULT_FIELD);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("bad.json");
        fs::write(&config_path, r#"{"default_field": 0}"#).unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.json"));
    }
}
