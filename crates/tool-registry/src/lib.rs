//! # tool-registry
//!
//! The runtime-editable tool catalog used by the agent: [`Tool`] entities, the
//! [`SecretResolver`] that maps logical secret keys to environment variables, and the
//! [`ToolRegistry`] that enforces name uniqueness and secret availability and mirrors every
//! mutation to a JSON [`CatalogFile`].
//!
//! ## External interactions
//!
//! - **Filesystem**: catalog file (full atomic rewrite per mutation), secrets declaration file (read once).
//! - **Process environment**: secret values, re-read on every lookup.

mod catalog_file;
mod error;
mod registry;
mod secret;
mod tool;

pub use catalog_file::{CatalogFile, DEFAULT_CATALOG_PATH};
pub use error::{RegistryError, Result};
pub use registry::{default_tools, EditOutcome, ToolHistory, ToolRegistry, EDIT_WARNING};
pub use secret::{EnvSecretResolver, SecretResolver, StaticSecretResolver};
pub use tool::{required_secrets_of, Tool, ENV_VAR_NAME_FIELD, ENV_VAR_TYPE};
