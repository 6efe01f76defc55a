//! Suite configuration loading from YAML files
//!
//! A suite file lists the documents to load and whether they should be
//! collapsed into one specification.

use crate::{Result, SpecError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root structure of a suite configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuiteConfig {
    /// Documents to load, relative paths resolved against the config file
    #[serde(default)]
    pub specs: Vec<PathBuf>,

    /// Merge every document into a single specification
    #[serde(default)]
    pub collapse: bool,
}

impl SuiteConfig {
    /// Load a suite configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SpecError::Parse(format!("Failed to read suite file {:?}: {}", path, e))
        })?;

        let mut config: SuiteConfig = serde_yaml::from_str(&content).map_err(|e| {
            SpecError::Parse(format!("Failed to parse suite YAML from {:?}: {}", path, e))
        })?;

        if let Some(base) = path.parent() {
            config.specs = config
                .specs
                .into_iter()
                .map(|spec| if spec.is_relative() { base.join(spec) } else { spec })
                .collect();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "specs:\n  - petstore.json\n  - /abs/other.yaml\ncollapse: true").unwrap();

        let config = SuiteConfig::load(&path).unwrap();
        assert!(config.collapse);
        assert_eq!(
            config.specs,
            vec![dir.path().join("petstore.json"), PathBuf::from("/abs/other.yaml")]
        );
    }

    #[test]
    fn test_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.yaml");
        fs::write(&path, "specs: []\n").unwrap();

        let config = SuiteConfig::load(&path).unwrap();
        assert_eq!(config, SuiteConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SuiteConfig::load(Path::new("/nonexistent/suite.yaml")).unwrap_err();
        assert!(matches!(err, SpecError::Parse(_)));
    }
}
