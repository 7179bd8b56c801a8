#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod references;
pub mod resolve;
pub mod rewrite;
pub mod stage;
pub mod versioner;

pub use config::{VersionerConfig, VersionerOptions};
pub use diagnostics::{CollectingSink, TracingSink, Warning, WarningSink};
pub use error::VersionError;
pub use fingerprint::{FingerprintCache, fingerprint};
pub use models::{Document, DocumentContents, DocumentKind};
pub use references::{IgnoreMatching, IgnoreRules};
pub use stage::{StageOutput, VersionStage};
pub use versioner::Versioner;
