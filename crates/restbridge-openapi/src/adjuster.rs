//! Route filtering and description overrides.
//!
//! An adjustments document restricts which (path, method) pairs are exposed
//! and rewrites operation descriptions. Everything is optional; an
//! unconfigured adjuster is permissive and leaves descriptions untouched.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Declarative adjustments applied on top of a parsed specification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Adjustments {
    /// Exposed routes; empty means everything is exposed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteSelection>,
    /// Description overrides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<RouteDescription>,
}

/// The methods exposed for one path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSelection {
    pub path: String,
    #[serde(default)]
    pub methods: Vec<String>,
}

/// Description overrides for one path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDescription {
    pub path: String,
    #[serde(default)]
    pub updates: Vec<RouteFieldUpdate>,
}

/// One per-method description override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteFieldUpdate {
    pub method: String,
    pub new_description: String,
}

/// Answers inclusion and description queries during route extraction.
#[derive(Debug, Clone, Default)]
pub struct Adjuster {
    adjustments: Adjustments,
}

impl Adjuster {
    /// A permissive adjuster with no filtering or overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adjustments(adjustments: Adjustments) -> Self {
        Self { adjustments }
    }

    /// Load adjustments from a YAML file.
    ///
    /// A missing file is not an error and leaves the adjuster permissive;
    /// an unreadable or malformed file is.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("adjustments file not found: {}", path.display());
            return Ok(Self::new());
        }

        info!("loading adjustments from file: {}", path.display());
        let data = std::fs::read_to_string(path)?;
        let adjustments = serde_yaml::from_str(&data)?;
        Ok(Self { adjustments })
    }

    /// Parse adjustments from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let adjustments = serde_yaml::from_str(content)?;
        Ok(Self { adjustments })
    }

    /// True when the (path, method) pair is selected for exposure.
    ///
    /// An empty selection exposes everything. A path entry restricts that
    /// path to exactly its listed methods; there is no wildcard or partial
    /// matching, and a path without an entry is not exposed.
    pub fn exists_in_selection(&self, path: &str, method: &str) -> bool {
        if self.adjustments.routes.is_empty() {
            return true;
        }
        match self.adjustments.routes.iter().find(|s| s.path == path) {
            Some(selection) => selection.methods.iter().any(|m| m == method),
            None => false,
        }
    }

    /// The description override for (path, method), or `original` unchanged.
    pub fn effective_description(&self, path: &str, method: &str, original: &str) -> String {
        for description in &self.adjustments.descriptions {
            if description.path == path {
                if let Some(update) = description.updates.iter().find(|u| u.method == method) {
                    return update.new_description.clone();
                }
                break;
            }
        }
        original.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection_adjuster() -> Adjuster {
        Adjuster::with_adjustments(Adjustments {
            routes: vec![RouteSelection {
                path: "/api/users".to_string(),
                methods: vec!["GET".to_string(), "POST".to_string()],
            }],
            descriptions: Vec::new(),
        })
    }

    #[test]
    fn test_empty_selection_exposes_everything() {
        let adjuster = Adjuster::new();
        assert!(adjuster.exists_in_selection("/api/users", "GET"));
        assert!(adjuster.exists_in_selection("/anything", "DELETE"));
    }

    #[test]
    fn test_selected_route_and_method() {
        assert!(selection_adjuster().exists_in_selection("/api/users", "GET"));
    }

    #[test]
    fn test_selected_route_with_unselected_method() {
        assert!(!selection_adjuster().exists_in_selection("/api/users", "DELETE"));
    }

    #[test]
    fn test_unselected_route() {
        assert!(!selection_adjuster().exists_in_selection("/api/products", "GET"));
    }

    #[test]
    fn test_description_override() {
        let adjuster = Adjuster::with_adjustments(Adjustments {
            routes: Vec::new(),
            descriptions: vec![RouteDescription {
                path: "/api/users".to_string(),
                updates: vec![RouteFieldUpdate {
                    method: "GET".to_string(),
                    new_description: "New description".to_string(),
                }],
            }],
        });

        assert_eq!(
            adjuster.effective_description("/api/users", "GET", "Original description"),
            "New description"
        );
        // Path matches but the method has no update
        assert_eq!(
            adjuster.effective_description("/api/users", "POST", "Original description"),
            "Original description"
        );
        // Path has no entry at all
        assert_eq!(
            adjuster.effective_description("/api/products", "GET", "Original description"),
            "Original description"
        );
    }

    #[test]
    fn test_unconfigured_adjuster_keeps_descriptions() {
        let adjuster = Adjuster::new();
        assert_eq!(
            adjuster.effective_description("/api/users", "GET", "Original description"),
            "Original description"
        );
    }

    #[test]
    fn test_from_yaml() {
        let adjuster = Adjuster::from_yaml(
            r#"
routes:
  - path: /users
    methods: [GET]
descriptions:
  - path: /users
    updates:
      - method: GET
        new_description: Listed users
"#,
        )
        .unwrap();

        assert!(adjuster.exists_in_selection("/users", "GET"));
        assert!(!adjuster.exists_in_selection("/users", "POST"));
        assert_eq!(
            adjuster.effective_description("/users", "GET", "original"),
            "Listed users"
        );
    }

    #[test]
    fn test_missing_file_is_permissive() {
        let adjuster = Adjuster::from_file("/nonexistent/adjustments.yaml").unwrap();
        assert!(adjuster.exists_in_selection("/api/users", "GET"));
    }
}
