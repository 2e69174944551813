//! # Vitrine Core
//!
//! Artwork acquisition pipeline for the Vitrine media catalog.
//!
//! ## Overview
//!
//! Every catalogued entity (movie, series, season, episode, boxed set,
//! person) carries artwork slots. This crate keeps those slots filled:
//!
//! - **Scanner registry**: pluggable online scanners, grouped by the owner
//!   kinds they can serve
//! - **Priority resolution**: configured scanner order narrowed to what is
//!   actually registered
//! - **Scan orchestration**: local files, embedded attachments and online
//!   providers, tried in that order for each queued request
//! - **Reconciliation**: idempotent merge of fresh candidates into stored
//!   ones, resurrecting soft-deleted rows
//! - **Queue scheduling**: trigger/run timers draining the work queue into a
//!   bounded worker pool
//!
//! ## Architecture
//!
//! - [`config`]: property configuration read on every use
//! - [`artwork`]: scanner contracts, registry, builder, reconciliation and
//!   the scan service
//! - [`storage`]: the storage contract and an in-memory implementation
//! - [`scheduling`]: the generic queue scheduler
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vitrine_core::{
//!     artwork::{ArtworkScanService, ScannerRegistry},
//!     config::PropertyConfig,
//!     scheduling::{QueueScheduler, ScheduleTimings},
//!     storage::InMemoryArtworkStorage,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Arc::new(PropertyConfig::load_from_env()?);
//! let storage = Arc::new(InMemoryArtworkStorage::new());
//! let registry = Arc::new(ScannerRegistry::new());
//!
//! let service = Arc::new(ArtworkScanService::new(
//!     registry,
//!     storage.clone(),
//!     config.clone(),
//! ));
//! let scheduler = Arc::new(QueueScheduler::artwork(storage, service, config));
//!
//! let shutdown = CancellationToken::new();
//! let handle = scheduler.spawn(ScheduleTimings::default(), shutdown.clone());
//! shutdown.cancel();
//! handle.await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Scanner contracts, registry, candidate building and the scan service
pub mod artwork;

/// Property configuration and its loaders
pub mod config;

/// Error types and error handling utilities
pub mod error;

/// Tracing bootstrap
pub mod logging;

/// Queue scheduler shared by background pipelines
pub mod scheduling;

/// Storage contract for artwork requests and candidates
pub mod storage;

pub use error::{ArtworkError, Result};
pub use vitrine_model as model;
