//! Spec files
//!
//! A spec is a small YAML document binding a file on disk (the unit of
//! discovery, ordering, and reporting) to a registered journey.

use labrat_core::{LabratError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecFile {
    /// Unique name for this spec
    pub name: String,

    /// Registered journey to execute
    pub journey: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering (`--tag smoke`)
    #[serde(default)]
    pub tags: Vec<String>,

    /// This spec needs the seed fixtures to be present
    #[serde(default)]
    pub requires_fixtures: bool,

    /// Per-spec retry override (run-level retry count otherwise)
    #[serde(default)]
    pub retries: Option<u32>,
}

impl SpecFile {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| LabratError::SpecParse(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LabratError::SpecParse(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
            .map_err(|e| LabratError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_spec() {
        let spec = SpecFile::from_yaml("name: login-flow\njourney: login\n").unwrap();
        assert_eq!(spec.name, "login-flow");
        assert_eq!(spec.journey, "login");
        assert!(spec.tags.is_empty());
        assert!(!spec.requires_fixtures);
        assert_eq!(spec.retries, None);
    }

    #[test]
    fn test_parse_full_spec() {
        let yaml = r#"
name: user-management
description: Add a user and find it again
journey: user-management
tags:
  - admin
  - smoke
requires_fixtures: true
retries: 1
"#;
        let spec = SpecFile::from_yaml(yaml).unwrap();
        assert!(spec.has_tag("smoke"));
        assert!(!spec.has_tag("storage"));
        assert!(spec.requires_fixtures);
        assert_eq!(spec.retries, Some(1));
    }

    #[test]
    fn test_missing_journey_is_parse_error() {
        let err = SpecFile::from_yaml("name: incomplete\n").unwrap_err();
        assert!(matches!(err, LabratError::SpecParse(_)));
    }
}
