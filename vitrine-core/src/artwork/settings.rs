use std::fmt;
use std::sync::Arc;

use vitrine_model::{ArtworkType, OwnerKind};

use crate::config::ConfigService;

pub const THEMOVIEDB_SCANNER_ID: &str = "themoviedb";
pub const THETVDB_SCANNER_ID: &str = "thetvdb";

/// The three discovery steps, in the order they run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ScanStep {
    Local,
    Attached,
    Online,
}

impl ScanStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStep::Local => "local",
            ScanStep::Attached => "attached",
            ScanStep::Online => "online",
        }
    }
}

impl fmt::Display for ScanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn scan_enabled_key(step: ScanStep, artwork_type: ArtworkType, owner: OwnerKind) -> String {
    format!("artwork.scan.{step}.{artwork_type}.{owner}")
}

pub fn priorities_key(artwork_type: ArtworkType, owner: OwnerKind) -> String {
    format!("artwork.scanner.{artwork_type}.{owner}.priorities")
}

pub fn max_results_key(artwork_type: ArtworkType, owner: OwnerKind) -> String {
    format!("artwork.scanner.{artwork_type}.{owner}.max_results")
}

pub fn default_priorities(owner: OwnerKind) -> &'static str {
    match owner {
        OwnerKind::Movie | OwnerKind::BoxedSet | OwnerKind::Person => THEMOVIEDB_SCANNER_ID,
        OwnerKind::Series | OwnerKind::Season | OwnerKind::Episode => THETVDB_SCANNER_ID,
    }
}

pub fn default_max_results(artwork_type: ArtworkType) -> i64 {
    match artwork_type {
        ArtworkType::Poster | ArtworkType::Fanart | ArtworkType::Banner => 5,
        ArtworkType::VideoImage => 2,
        ArtworkType::Photo => 1,
    }
}

/// Typed view over the `artwork.*` properties. Reads through on every call.
#[derive(Clone)]
pub struct ArtworkSettings {
    config: Arc<dyn ConfigService>,
}

impl ArtworkSettings {
    pub fn new(config: Arc<dyn ConfigService>) -> Self {
        Self { config }
    }

    pub fn step_enabled(&self, step: ScanStep, artwork_type: ArtworkType, owner: OwnerKind) -> bool {
        self.config
            .get_bool(&scan_enabled_key(step, artwork_type, owner), true)
    }

    pub fn priorities(&self, artwork_type: ArtworkType, owner: OwnerKind) -> String {
        self.config.get_string(
            &priorities_key(artwork_type, owner),
            default_priorities(owner),
        )
    }

    /// Maximum online results to keep; `None` keeps everything.
    pub fn max_results(&self, artwork_type: ArtworkType, owner: OwnerKind) -> Option<usize> {
        let value = self.config.get_int(
            &max_results_key(artwork_type, owner),
            default_max_results(artwork_type),
        );
        usize::try_from(value).ok().filter(|max| *max > 0)
    }
}

impl fmt::Debug for ArtworkSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtworkSettings").finish_non_exhaustive()
    }
}
