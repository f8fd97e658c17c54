//! # restbridge-openapi
//!
//! Derives callable route tools from OpenAPI specifications.
//!
//! ## Features
//!
//! - Parse OpenAPI 3.x and Swagger 2.0 specifications (JSON and YAML);
//!   legacy documents are converted to the 3.0 model
//! - One route tool per path/method operation, with a deterministic
//!   callable name and a JSON-Schema description of its arguments
//! - Optional adjustments file for route filtering and description
//!   overrides
//! - Recursive schema translation into a closed parameter-shape tree
//!
//! ## Example
//!
//! ```no_run
//! use restbridge_openapi::{Adjuster, RouteToolset};
//!
//! # fn main() -> anyhow::Result<()> {
//! let spec = r#"
//! openapi: 3.0.0
//! info:
//!   title: Example API
//!   version: 1.0.0
//! paths:
//!   /users:
//!     get:
//!       summary: List all users
//!       responses:
//!         '200':
//!           description: Success
//! "#;
//!
//! let toolset = RouteToolset::from_str(spec, &Adjuster::new())?;
//! println!("generated {} tools", toolset.len());
//! # Ok(())
//! # }
//! ```

mod adjuster;
mod convert;
mod error;
mod extractor;
mod normalizer;
mod schema;
mod toolset;
mod types;

pub use adjuster::{Adjuster, Adjustments, RouteDescription, RouteFieldUpdate, RouteSelection};
pub use error::{Result, SpecError};
pub use extractor::RouteExtractor;
pub use normalizer::{normalize, normalize_file, normalize_str, normalize_url};
pub use schema::translate;
pub use toolset::RouteToolset;
pub use types::{
    AdditionalProperties, NumberConstraints, ObjectShape, ParameterKind, ParameterNode,
    PropertyShape, RouteTool, StringConstraints, path_params,
};
