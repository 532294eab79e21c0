//! Configuration resolution engine
//!
//! Resolves a project's effective configuration from layered YAML files:
//! the read-write primary `.localdev/config.yaml` plus read-only
//! `config.*.yaml` overrides. Loading merges in memory only; overrides
//! are never folded back into the primary. Field changes arrive as
//! discrete requests, type-driven defaults fill what is unset, and the
//! result is persisted atomically.

mod error;
mod fileset;
mod loader;
mod operation;
mod persist;
mod resolver;
mod schema;

pub use error::ConfigError;
pub use fileset::{ConfigFileSet, CONFIG_DIR, PRIMARY_FILE};
pub use loader::{load, merge_layer, read_config_file, MergedConfig};
pub use operation::{describe, show_config_location, ConfigOperation, ConfigOutcome};
pub use persist::write_primary;
pub use resolver::{merge_environment, parse_list, FieldRequests};
pub use schema::{
    default_project_name, validate_project_name, DatabaseDesc, HookTask, ProjectConfig,
    HOOK_STAGES,
};
