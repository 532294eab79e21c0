//! localdev - configuration engine for containerized local development
//! projects
//!
//! This crate resolves a project's effective configuration from layered
//! YAML files, applies project-type-driven defaults, enforces safety
//! invariants about where configuration may be created or mutated, and
//! supports partial, idempotent updates driven by discrete command flags.
//! Container lifecycle, routing, and hook execution are external
//! consumers of the resolved configuration.

pub mod config;
pub mod docroot;
pub mod location;
pub mod project_type;
pub mod registry;

pub use config::{
    ConfigError, ConfigFileSet, ConfigOperation, ConfigOutcome, DatabaseDesc, FieldRequests,
    MergedConfig, ProjectConfig,
};
pub use project_type::ProjectType;
pub use registry::{FileRegistry, InMemoryRegistry, ProjectRegistry, RegisteredProject};
