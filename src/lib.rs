//! ThreatVault Core - Foundation crate for the ThreatVault threat-intelligence platform
//!
//! This crate implements the analysis service orchestration and result
//! persistence subsystem: it reconciles discovered analysis plugins against
//! their persisted descriptors, builds immutable execution contexts from
//! heterogeneous stored object types, and merges completed results back into
//! per-object analysis histories with idempotent upsert semantics.
//!
//! # Modules
//!
//! - [`config`] — Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] — Core domain models, value objects, and collaborator traits
//! - [`application`] — Service manager, context factory, and result sink
//! - [`infrastructure`] — Service registry and in-memory document store
//! - [`logging`] — Structured logging with tracing
//!
//! # Architecture
//!
//! The crate follows Domain-Driven Design principles:
//!
//! ```text
//! threatvault-core/
//! ├── domain/           # Pure business logic
//! │   ├── object/       # Stored-object kinds, lookup-key routing, documents
//! │   ├── service/      # Plugin contract, descriptors, config, versioning
//! │   └── analysis/     # Contexts, tasks, embedded results, artifacts
//! ├── application/      # ServiceManager, AnalysisSource, AnalysisDestination
//! ├── infrastructure/   # ServiceRegistry, in-memory stores
//! └── config/           # Configuration management
//! ```
//!
//! # Configuration
//!
//! Load configuration from files and environment:
//!
//! ```rust,ignore
//! use threatvault_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `THREATVAULT__` prefix with double underscore
//! separators:
//!
//! ```bash
//! THREATVAULT__LOGGING__LEVEL=debug
//! THREATVAULT__SERVICES__RECONCILE_ON_STARTUP=false
//! ```
//!
//! # Logging
//!
//! Initialize structured logging:
//!
//! ```rust,ignore
//! use threatvault_core::init_tracing;
//!
//! init_tracing(&config.logging)?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
