//! TemplatePromoter - versioned template promotion
//!
//! Copies a template into a publishable location with the `<<version>>`
//! placeholder replaced, and records the result in an artifact manifest so
//! other build units can select it by category.
//!
//! # Layout
//!
//! ```text
//! reference/
//! └── {template file name}   # promoted copy, placeholder substituted
//! build/
//! └── artifacts.json         # category -> artifact (path, version, sha256)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use templatepromoter::{ArtifactManifest, Artifact, Promotion};
//!
//! let outcome = Promotion::new("src/init.gradle", "reference", "1.2.3").run()?;
//!
//! let mut manifest = ArtifactManifest::load("build/artifacts.json")?;
//! manifest.publish(Artifact::describe("init-script", &outcome.output, "1.2.3")?);
//! manifest.save("build/artifacts.json")?;
//! ```
//!
//! # Modules
//!
//! - [`promote`] - Placeholder substitution and atomic promotion
//! - [`version`] - Project version resolution
//! - [`artifact`] - Artifact manifest publish/resolve
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod promote;
pub mod version;

pub use artifact::{Artifact, ArtifactError, ArtifactManifest};
pub use config::{Config, PromotionConfig, PublishConfig};
pub use error::PromoteError;
pub use promote::{CheckStatus, PromoteOutcome, Promotion, count_placeholders, substitute};
pub use version::{VersionError, VersionSources, parse_properties, resolve_version};

/// Literal token replaced by the project version during promotion
pub const PLACEHOLDER: &str = "<<version>>";

/// Default directory promoted templates are written to
pub const DEFAULT_INTO: &str = "reference";

/// Default artifact category
pub const DEFAULT_CATEGORY: &str = "promoted-template";

/// Default manifest location
pub const DEFAULT_MANIFEST: &str = "build/artifacts.json";

/// Environment variable consulted for the project version
pub const VERSION_ENV: &str = "TP_VERSION";
