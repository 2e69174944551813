use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, trace, warn};
use vitrine_model::{
    ArtworkDetail, ArtworkId, ArtworkOwner, ArtworkRequest, ArtworkStatus, ArtworkType,
    LocatedCandidate, OwnerKind, QueueItem,
};

use super::located::{attached_candidate, local_candidate, online_candidate};
use super::locator::{ArtworkLocator, AttachmentScanner, LocateTarget, episode_part};
use super::priority::resolve_priorities;
use super::reconcile::{ReconcileSummary, reconcile};
use super::registry::ScannerRegistry;
use super::scanner::{ScannerCategory, ScannerError, SeriesTarget};
use super::settings::{ArtworkSettings, ScanStep};
use crate::config::ConfigService;
use crate::scheduling::QueueProcessor;
use crate::storage::ArtworkStorage;
use crate::{ArtworkError, Result};

/// Outcome of scanning one artwork request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScanSummary {
    pub artwork_id: ArtworkId,
    /// False when the artwork type does not apply to the owner.
    pub applicable: bool,
    pub local: usize,
    pub attached: usize,
    pub online: usize,
    pub reconcile: ReconcileSummary,
    /// Request status after this scan (unchanged if persisting failed).
    pub status: ArtworkStatus,
    pub persisted: bool,
}

impl ScanSummary {
    pub fn found(&self) -> usize {
        self.local + self.attached + self.online
    }
}

/// Whether `artwork_type` can be scanned for `owner` at all.
pub fn is_applicable(artwork_type: ArtworkType, owner: &ArtworkOwner) -> bool {
    match artwork_type {
        ArtworkType::Poster | ArtworkType::Fanart => matches!(
            owner.kind(),
            OwnerKind::Movie | OwnerKind::Series | OwnerKind::Season | OwnerKind::BoxedSet
        ),
        ArtworkType::Banner => matches!(
            owner.kind(),
            OwnerKind::Series | OwnerKind::Season | OwnerKind::BoxedSet
        ),
        ArtworkType::VideoImage => {
            matches!(owner, ArtworkOwner::Episode(episode) if episode.episode >= 0)
        }
        ArtworkType::Photo => owner.kind() == OwnerKind::Person,
    }
}

/// Registry partition serving `owner`.
pub fn scanner_category(owner: OwnerKind) -> ScannerCategory {
    match owner {
        OwnerKind::Movie => ScannerCategory::Movie,
        OwnerKind::Series | OwnerKind::Season | OwnerKind::Episode => ScannerCategory::Series,
        OwnerKind::BoxedSet => ScannerCategory::BoxedSet,
        OwnerKind::Person => ScannerCategory::Person,
    }
}

/// Scans queued artwork requests: local files, then attachments, then the
/// first online scanner with results.
pub struct ArtworkScanService {
    registry: Arc<ScannerRegistry>,
    storage: Arc<dyn ArtworkStorage>,
    settings: ArtworkSettings,
    locator: Option<Arc<dyn ArtworkLocator>>,
    attachments: Option<Arc<dyn AttachmentScanner>>,
}

impl ArtworkScanService {
    pub fn new(
        registry: Arc<ScannerRegistry>,
        storage: Arc<dyn ArtworkStorage>,
        config: Arc<dyn ConfigService>,
    ) -> Self {
        Self {
            registry,
            storage,
            settings: ArtworkSettings::new(config),
            locator: None,
            attachments: None,
        }
    }

    pub fn with_locator(mut self, locator: Arc<dyn ArtworkLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn with_attachment_scanner(mut self, attachments: Arc<dyn AttachmentScanner>) -> Self {
        self.attachments = Some(attachments);
        self
    }

    pub fn registry(&self) -> &Arc<ScannerRegistry> {
        &self.registry
    }

    /// Scans one queued request and stores the reconciled candidates.
    ///
    /// Scanner and locator failures only empty the step they happen in. A
    /// storage failure is logged and leaves the request status as it was,
    /// so the request comes back on the next pass.
    pub async fn scan_artwork(&self, item: &QueueItem) -> Result<ScanSummary> {
        let mut request = self.storage.get_required_artwork(item.id).await?;
        let label = request.owner.label();
        let applicable = is_applicable(request.artwork_type, &request.owner);

        let mut local = Vec::new();
        let mut attached = Vec::new();
        let mut online = Vec::new();

        if applicable {
            let part = match &request.owner {
                ArtworkOwner::Episode(episode) => episode_part(episode),
                _ => 0,
            };
            local = self.scan_local(&request, &label, part).await;
            attached = self.scan_attached(&request, &label, part).await;
            online = self.scan_online(&request, &label).await;
        } else {
            debug!(
                target: "artwork::scan",
                artwork_type = %request.artwork_type,
                owner = %request.owner.kind(),
                "Artwork scan not implemented for {label}"
            );
        }

        let mut summary = ScanSummary {
            artwork_id: request.id,
            applicable,
            local: local.len(),
            attached: attached.len(),
            online: online.len(),
            reconcile: ReconcileSummary::default(),
            status: request.status,
            persisted: false,
        };

        let fresh: Vec<LocatedCandidate> = local.into_iter().chain(attached).chain(online).collect();
        let mut located = std::mem::take(&mut request.located);
        summary.reconcile = reconcile(&mut located, fresh);

        // Only this run's findings resolve the request; stored candidates
        // from earlier runs do not.
        let previous_status = request.status;
        if summary.found() > 0 {
            request.status = ArtworkStatus::Done;
        }

        match self.storage.persist_result(&request, &located).await {
            Ok(()) => {
                summary.status = request.status;
                summary.persisted = true;
            }
            Err(err) => {
                error!(
                    target: "artwork::scan",
                    artwork = %request.id,
                    artwork_type = %request.artwork_type,
                    error = %err,
                    "Failed storing artwork"
                );
                summary.status = previous_status;
            }
        }

        Ok(summary)
    }

    async fn scan_local(
        &self,
        request: &ArtworkRequest,
        label: &str,
        part: u32,
    ) -> Vec<LocatedCandidate> {
        if !self.step_enabled(ScanStep::Local, request, label) {
            return Vec::new();
        }
        let Some(locator) = self.locator.as_ref() else {
            trace!(target: "artwork::scan", "No local artwork locator configured");
            return Vec::new();
        };

        trace!(target: "artwork::scan", artwork_type = %request.artwork_type, "Scan local for {label}");
        let target = LocateTarget {
            artwork_type: request.artwork_type,
            owner: &request.owner,
            part,
        };

        let files = match locator.locate(&target).await {
            Ok(files) => files,
            Err(err) => {
                warn!(
                    target: "artwork::scan",
                    artwork = %request.id,
                    error = %err,
                    "Local artwork scan failed"
                );
                return Vec::new();
            }
        };

        let mut candidates = Vec::with_capacity(files.len());
        for file in files {
            let readable = is_readable(&file.path).await;
            candidates.push(local_candidate(request.id, file, readable));
        }
        candidates
    }

    async fn scan_attached(
        &self,
        request: &ArtworkRequest,
        label: &str,
        part: u32,
    ) -> Vec<LocatedCandidate> {
        if !self.step_enabled(ScanStep::Attached, request, label) {
            return Vec::new();
        }
        let Some(scanner) = self.attachments.as_ref() else {
            trace!(target: "artwork::scan", "No attachment scanner configured");
            return Vec::new();
        };

        trace!(target: "artwork::scan", artwork_type = %request.artwork_type, "Scan attachments for {label}");
        let target = LocateTarget {
            artwork_type: request.artwork_type,
            owner: &request.owner,
            part,
        };

        let images = match scanner.scan_attachments(&target).await {
            Ok(images) => images,
            Err(err) => {
                warn!(
                    target: "artwork::scan",
                    artwork = %request.id,
                    error = %err,
                    "Attached artwork scan failed"
                );
                return Vec::new();
            }
        };

        let mut candidates = Vec::with_capacity(images.len());
        for image in images {
            let readable = is_readable(&image.file.path).await;
            candidates.push(attached_candidate(request.id, image, readable));
        }
        candidates
    }

    async fn scan_online(&self, request: &ArtworkRequest, label: &str) -> Vec<LocatedCandidate> {
        if !self.step_enabled(ScanStep::Online, request, label) {
            return Vec::new();
        }

        let artwork_type = request.artwork_type;
        let owner_kind = request.owner.kind();
        debug!(target: "artwork::scan", %artwork_type, "Scan online for {label}");

        let category = scanner_category(owner_kind);
        let priorities = resolve_priorities(
            &self.settings.priorities(artwork_type, owner_kind),
            category,
            &self.registry.registered_ids(category),
        );

        let mut details: Vec<ArtworkDetail> = Vec::new();
        for scanner in &priorities {
            match self.query_scanner(scanner, request, label).await {
                Ok(found) if !found.is_empty() => {
                    details = found;
                    break;
                }
                Ok(_) => {}
                Err(source) => {
                    let err = ArtworkError::Scanner {
                        scanner: scanner.clone(),
                        source,
                    };
                    warn!(
                        target: "artwork::scan",
                        artwork = %request.id,
                        error = %err,
                        "Online artwork scan failed"
                    );
                    return Vec::new();
                }
            }
        }

        if details.is_empty() {
            info!(target: "artwork::scan", %artwork_type, "No {artwork_type} found for {label}");
            return Vec::new();
        }

        if let Some(max) = self
            .settings
            .max_results(artwork_type, owner_kind)
            .filter(|max| details.len() > *max)
        {
            info!(
                target: "artwork::scan",
                %artwork_type,
                limit = max,
                retrieved = details.len(),
                "Limited {artwork_type} results for {label}"
            );
            details.truncate(max);
        }

        details
            .into_iter()
            .map(|detail| online_candidate(request.id, detail))
            .collect()
    }

    /// Asks the scanner registered as `id` for the request's artwork.
    async fn query_scanner(
        &self,
        id: &str,
        request: &ArtworkRequest,
        label: &str,
    ) -> std::result::Result<Vec<ArtworkDetail>, ScannerError> {
        let use_scanner = |name: &str| {
            debug!(target: "artwork::scan", scanner = name, "Use scanner for {label}");
        };

        match (&request.owner, request.artwork_type) {
            (ArtworkOwner::Movie(movie), artwork_type) => {
                let Some(scanner) = self.registry.movie_scanner(id) else {
                    return Ok(Vec::new());
                };
                use_scanner(scanner.scanner_name());
                match artwork_type {
                    ArtworkType::Poster => scanner.posters(movie).await,
                    ArtworkType::Fanart => scanner.fanarts(movie).await,
                    _ => Ok(Vec::new()),
                }
            }
            (ArtworkOwner::Series(_) | ArtworkOwner::Season(_), artwork_type) => {
                let target = match &request.owner {
                    ArtworkOwner::Season(season) => SeriesTarget::Season(season),
                    ArtworkOwner::Series(series) => SeriesTarget::Series(series),
                    _ => return Ok(Vec::new()),
                };
                let Some(scanner) = self.registry.series_scanner(id) else {
                    return Ok(Vec::new());
                };
                use_scanner(scanner.scanner_name());
                match artwork_type {
                    ArtworkType::Poster => scanner.posters(target).await,
                    ArtworkType::Fanart => scanner.fanarts(target).await,
                    ArtworkType::Banner => scanner.banners(target).await,
                    _ => Ok(Vec::new()),
                }
            }
            (ArtworkOwner::Episode(episode), ArtworkType::VideoImage) => {
                let Some(scanner) = self.registry.series_scanner(id) else {
                    return Ok(Vec::new());
                };
                use_scanner(scanner.scanner_name());
                scanner.video_images(episode).await
            }
            (ArtworkOwner::BoxedSet(set), artwork_type) => {
                let Some(scanner) = self.registry.boxed_set_scanner(id) else {
                    return Ok(Vec::new());
                };
                use_scanner(scanner.scanner_name());
                match artwork_type {
                    ArtworkType::Poster => scanner.posters(set).await,
                    ArtworkType::Fanart => scanner.fanarts(set).await,
                    ArtworkType::Banner => scanner.banners(set).await,
                    _ => Ok(Vec::new()),
                }
            }
            (ArtworkOwner::Person(person), ArtworkType::Photo) => {
                let Some(scanner) = self.registry.person_scanner(id) else {
                    return Ok(Vec::new());
                };
                use_scanner(scanner.scanner_name());

                let person_id = match person.source_ids.get(id) {
                    Some(known) => known.to_string(),
                    None => match scanner.resolve_person_id(person).await? {
                        Some(resolved) => {
                            info!(
                                target: "artwork::scan",
                                scanner = id,
                                person_id = %resolved,
                                "Resolved person id for {label}"
                            );
                            resolved
                        }
                        None => {
                            debug!(target: "artwork::scan", scanner = id, "No person id for {label}");
                            return Ok(Vec::new());
                        }
                    },
                };
                scanner.photos(&person_id).await
            }
            _ => Ok(Vec::new()),
        }
    }

    fn step_enabled(&self, step: ScanStep, request: &ArtworkRequest, label: &str) -> bool {
        let enabled =
            self.settings
                .step_enabled(step, request.artwork_type, request.owner.kind());
        if !enabled {
            trace!(
                target: "artwork::scan",
                %step,
                artwork_type = %request.artwork_type,
                "Scan step disabled for {label}"
            );
        }
        enabled
    }
}

impl fmt::Debug for ArtworkScanService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtworkScanService")
            .field("registry", &self.registry)
            .field("locator", &self.locator.is_some())
            .field("attachments", &self.attachments.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl QueueProcessor for ArtworkScanService {
    async fn process(&self, item: &QueueItem) -> Result<()> {
        self.scan_artwork(item).await.map(|_| ())
    }

    async fn processing_error(&self, item: &QueueItem) -> Result<()> {
        self.storage.mark_errored(item.id).await
    }
}

async fn is_readable(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => tokio::fs::File::open(path).await.is_ok(),
        _ => false,
    }
}
