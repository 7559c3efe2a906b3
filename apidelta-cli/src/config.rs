//! apidelta configuration loading from `.apideltarc.toml`.
//!
//! Configuration is optional. Every setting has a default, and command-line
//! flags override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [compare]
//! patterns = ["src/**/*.py"]
//! ignore = ["tests/", "*_pb2.py"]
//! jobs = 4
//! fail_on_breaking = true
//!
//! [output]
//! format = "json"
//! color = false
//!
//! [python]
//! honor_dunder_all = true
//! public_dunders = true
//!
//! [ecmascript]
//! script_globals_public = true
//! protected_members_public = false
//! ```

use std::path::Path;

use apidelta_core::parser::{Conventions, EcmaConvention, PythonConvention};
use serde::Deserialize;

pub const CONFIG_FILE: &str = ".apideltarc.toml";

/// Root configuration structure loaded from `.apideltarc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct ApideltaConfig {
    /// File selection and run behavior.
    #[serde(default)]
    pub compare: CompareSettings,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,

    /// Python visibility conventions.
    #[serde(default)]
    pub python: PythonConvention,

    /// TypeScript and JavaScript visibility conventions.
    #[serde(default)]
    pub ecmascript: EcmaConvention,
}

/// `[compare]` section.
#[derive(Debug, Deserialize, Default)]
pub struct CompareSettings {
    /// Include globs for directory mode. Ignored when `-p` is given.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Exclude globs, added to any `--ignore` flags.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Worker threads for directory comparisons.
    #[serde(default)]
    pub jobs: Option<usize>,

    #[serde(default)]
    pub fail_on_breaking: bool,
}

/// `[output]` section.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default stdout format: `narrative` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Auto-detected when unset.
    #[serde(default)]
    pub color: Option<bool>,
}

impl ApideltaConfig {
    /// Load configuration from `.apideltarc.toml` in the given directory.
    ///
    /// A missing file yields defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Visibility conventions for the analyzer registry.
    pub fn conventions(&self) -> Conventions {
        Conventions {
            python: self.python.clone(),
            ecmascript: self.ecmascript.clone(),
        }
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ApideltaConfig::default();
        assert!(config.compare.patterns.is_empty());
        assert!(config.compare.jobs.is_none());
        assert!(!config.compare.fail_on_breaking);
        assert!(config.output.format.is_none());
        assert!(config.python.honor_dunder_all);
        assert!(config.ecmascript.script_globals_public);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[compare]
patterns = ["*.py"]
ignore = ["tests/"]
jobs = 2
fail_on_breaking = true

[output]
format = "json"
color = false

[python]
honor_dunder_all = false

[ecmascript]
protected_members_public = true
"#;
        let config: ApideltaConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.compare.patterns, vec!["*.py"]);
        assert_eq!(config.compare.ignore, vec!["tests/"]);
        assert_eq!(config.compare.jobs, Some(2));
        assert!(config.compare.fail_on_breaking);

        assert_eq!(config.default_format(), Some("json"));
        assert_eq!(config.use_color(), Some(false));

        // Partially specified sections keep their other defaults
        assert!(!config.python.honor_dunder_all);
        assert!(config.python.public_dunders);
        assert!(config.ecmascript.protected_members_public);
        assert!(config.ecmascript.script_globals_public);

        let conventions = config.conventions();
        assert!(!conventions.python.honor_dunder_all);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ApideltaConfig::load(dir.path());
        assert!(config.compare.ignore.is_empty());
    }

    #[test]
    fn test_load_invalid_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[compare\njobs = ").unwrap();
        let config = ApideltaConfig::load(dir.path());
        assert!(config.compare.jobs.is_none());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[compare]\njobs = 3\n").unwrap();
        let config = ApideltaConfig::load(dir.path());
        assert_eq!(config.compare.jobs, Some(3));
    }
}
