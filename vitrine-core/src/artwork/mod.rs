//! Artwork discovery.
//!
//! The [`ArtworkScanService`] drives one queued request through the local,
//! attached and online steps, builds candidates with [`located`], merges
//! them with [`reconcile`] and hands the result to storage.

pub mod located;
pub mod locator;
pub mod priority;
pub mod reconcile;
pub mod registry;
pub mod scanner;
pub mod service;
pub mod settings;

pub use locator::{ArtworkLocator, AttachmentScanner, LocateTarget, episode_part};
pub use priority::resolve_priorities;
pub use reconcile::{ReconcileSummary, reconcile};
pub use registry::ScannerRegistry;
pub use scanner::{
    ArtworkScanner, BoxedSetArtworkScanner, MovieArtworkScanner, PersonArtworkScanner,
    ScanResult, ScannerCategory, ScannerError, SeriesArtworkScanner, SeriesTarget,
};
pub use service::{ArtworkScanService, ScanSummary, is_applicable, scanner_category};
pub use settings::{ArtworkSettings, ScanStep};
