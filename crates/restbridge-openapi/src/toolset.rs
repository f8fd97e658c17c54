//! Route toolset container.
//!
//! Ingestion is all-or-nothing: any parse or version error yields no
//! toolset, so a partial route set is never published. The resulting list
//! is immutable and safe to share across concurrent callers.

use crate::adjuster::Adjuster;
use crate::error::Result;
use crate::extractor::RouteExtractor;
use crate::normalizer;
use crate::types::RouteTool;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The immutable collection of route tools derived from one specification.
///
/// # Example
///
/// ```no_run
/// use restbridge_openapi::RouteToolset;
///
/// # fn main() -> Result<(), restbridge_openapi::SpecError> {
/// let toolset = RouteToolset::from_file("./api/openapi.json", None)?;
/// for tool in toolset.tools() {
///     println!("{}: {}", tool.tool_name(), tool.tool_description());
/// }
/// # Ok(())
/// # }
/// ```
pub struct RouteToolset {
    tools: Vec<Arc<RouteTool>>,
}

impl RouteToolset {
    /// Parse a spec from raw bytes and derive its route tools.
    pub fn from_bytes(data: &[u8], adjuster: &Adjuster) -> Result<Self> {
        let doc = normalizer::normalize(data)?;
        let tools: Vec<Arc<RouteTool>> = RouteExtractor::new(&doc, adjuster)
            .extract()
            .into_iter()
            .map(Arc::new)
            .collect();
        info!("generated {} route tools", tools.len());
        Ok(Self { tools })
    }

    /// Parse a spec from a string. JSON and YAML are both accepted.
    pub fn from_str(content: &str, adjuster: &Adjuster) -> Result<Self> {
        Self::from_bytes(content.as_bytes(), adjuster)
    }

    /// Load a spec file, with an optional adjustments file alongside it.
    pub fn from_file(path: impl AsRef<Path>, adjustments: Option<&Path>) -> Result<Self> {
        let adjuster = match adjustments {
            Some(path) => Adjuster::from_file(path)?,
            None => Adjuster::new(),
        };
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, &adjuster)
    }

    /// Fetch a spec from a URL and derive its route tools.
    pub async fn from_url(url: &str, adjuster: &Adjuster) -> Result<Self> {
        let response = reqwest::get(url).await?;
        let data = response.bytes().await?;
        Self::from_bytes(&data, adjuster)
    }

    /// All derived route tools. Order is unspecified.
    pub fn tools(&self) -> &[Arc<RouteTool>] {
        &self.tools
    }

    /// Look up a tool by its derived callable name.
    pub fn get(&self, tool_name: &str) -> Option<Arc<RouteTool>> {
        self.tools
            .iter()
            .find(|tool| tool.tool_name() == tool_name)
            .cloned()
    }

    /// The derived callable names of all tools.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.tool_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
