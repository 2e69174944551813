//! Shared stubs and fixtures for vitrine-core integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Notify;

use vitrine_core::artwork::{
    ArtworkLocator, ArtworkScanner, AttachmentScanner, LocateTarget, MovieArtworkScanner,
    ScanResult, SeriesArtworkScanner,
};
use vitrine_core::config::PropertyConfig;
use vitrine_core::scheduling::{QueueProcessor, QueueSource};
use vitrine_core::{ArtworkError, Result};
use vitrine_model::{
    ArtworkDetail, ArtworkId, ArtworkOwner, AttachedImage, EpisodeId, EpisodeView, MovieId,
    MovieView, QueueItem, QueueKind, SeriesId, SeriesView, SourceIds, StageFile, VideoFileView,
};

pub fn config(pairs: &[(&str, &str)]) -> Arc<PropertyConfig> {
    Arc::new(PropertyConfig::from_pairs(pairs.iter().copied()))
}

pub fn movie(title: &str) -> ArtworkOwner {
    ArtworkOwner::Movie(MovieView {
        id: MovieId::new(),
        title: title.to_string(),
        original_title: None,
        year: Some(1979),
        source_ids: SourceIds::new().with("themoviedb", "348"),
    })
}

pub fn episode(number: i32, file: StageFile, file_episodes: Vec<i32>) -> ArtworkOwner {
    ArtworkOwner::Episode(EpisodeView {
        id: EpisodeId::new(),
        series: SeriesView {
            id: SeriesId::new(),
            title: "Severance".into(),
            original_title: None,
            year: Some(2022),
            source_ids: SourceIds::new(),
        },
        season: 1,
        episode: number,
        title: None,
        source_ids: SourceIds::new(),
        video_file: Some(VideoFileView {
            file,
            episodes: file_episodes,
        }),
    })
}

pub fn details(source: &str, count: usize) -> Vec<ArtworkDetail> {
    (0..count)
        .map(|n| {
            ArtworkDetail::new(source, format!("https://img.example/{source}/poster-{n}.jpg"))
                .with_language("en")
        })
        .collect()
}

pub fn queue_items(count: usize) -> Vec<QueueItem> {
    let now = Utc::now();
    (0..count)
        .map(|n| {
            QueueItem::new(
                ArtworkId::new(),
                None,
                now - chrono::Duration::seconds(count as i64 - n as i64),
                None,
            )
        })
        .collect()
}

/// Movie scanner returning a fixed poster list.
pub struct StaticMovieScanner {
    name: &'static str,
    posters: Vec<ArtworkDetail>,
    /// Titles for which the scanner panics.
    panic_on: Option<String>,
    calls: AtomicUsize,
}

impl StaticMovieScanner {
    pub fn new(name: &'static str, posters: Vec<ArtworkDetail>) -> Self {
        Self {
            name,
            posters,
            panic_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn panicking_on(mut self, title: &str) -> Self {
        self.panic_on = Some(title.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArtworkScanner for StaticMovieScanner {
    fn scanner_name(&self) -> &str {
        self.name
    }
}

#[async_trait]
impl MovieArtworkScanner for StaticMovieScanner {
    async fn posters(&self, movie: &MovieView) -> ScanResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on.as_deref() == Some(movie.title.as_str()) {
            panic!("provider blew up for {}", movie.title);
        }
        Ok(self.posters.clone())
    }
}

/// Series scanner serving episode stills.
pub struct StaticEpisodeScanner {
    pub stills: Vec<ArtworkDetail>,
}

impl ArtworkScanner for StaticEpisodeScanner {
    fn scanner_name(&self) -> &str {
        "thetvdb"
    }
}

#[async_trait]
impl SeriesArtworkScanner for StaticEpisodeScanner {
    async fn video_images(&self, _episode: &EpisodeView) -> ScanResult {
        Ok(self.stills.clone())
    }
}

/// Locator returning fixed files and recording the episode part it was
/// asked for.
#[derive(Default)]
pub struct StubLocator {
    pub files: Vec<StageFile>,
    pub fail: bool,
    pub parts: Mutex<Vec<u32>>,
}

#[async_trait]
impl ArtworkLocator for StubLocator {
    async fn locate(&self, target: &LocateTarget<'_>) -> Result<Vec<StageFile>> {
        self.parts.lock().push(target.part);
        if self.fail {
            return Err(ArtworkError::Locator("artwork folder unreachable".into()));
        }
        Ok(self.files.clone())
    }
}

#[derive(Default)]
pub struct StubAttachments {
    pub images: Vec<AttachedImage>,
    pub fail: bool,
}

#[async_trait]
impl AttachmentScanner for StubAttachments {
    async fn scan_attachments(&self, _target: &LocateTarget<'_>) -> Result<Vec<AttachedImage>> {
        if self.fail {
            return Err(ArtworkError::Locator("container unreadable".into()));
        }
        Ok(self.images.clone())
    }
}

/// Locator and attachment scanner that stage the same paths afresh on
/// every call, the way a filesystem walk does.
pub struct RestagingScanner {
    pub images: Vec<PathBuf>,
    pub container: PathBuf,
}

#[async_trait]
impl ArtworkLocator for RestagingScanner {
    async fn locate(&self, _target: &LocateTarget<'_>) -> Result<Vec<StageFile>> {
        Ok(self.images.iter().map(StageFile::new).collect())
    }
}

#[async_trait]
impl AttachmentScanner for RestagingScanner {
    async fn scan_attachments(&self, _target: &LocateTarget<'_>) -> Result<Vec<AttachedImage>> {
        Ok(vec![AttachedImage {
            file: StageFile::new(&self.container),
            attachment_id: 1,
            image_type: None,
        }])
    }
}

/// Queue source serving prepared batches, one per fetch, then nothing.
/// With `gated`, every fetch signals `entered` and waits for `release`.
#[derive(Default)]
pub struct ScriptedSource {
    batches: Mutex<VecDeque<Vec<QueueItem>>>,
    fetches: AtomicUsize,
    gated: bool,
    pub entered: Notify,
    pub release: Notify,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Vec<QueueItem>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            ..Self::default()
        }
    }

    pub fn gated(batches: Vec<Vec<QueueItem>>) -> Self {
        Self {
            gated: true,
            ..Self::new(batches)
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueSource for ScriptedSource {
    async fn fetch_queue(&self, _kind: QueueKind, max_results: usize) -> Result<Vec<QueueItem>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
        let mut batch = self.batches.lock().pop_front().unwrap_or_default();
        batch.truncate(max_results);
        Ok(batch)
    }
}

/// What a processor should do with a given item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behaviour {
    Succeed,
    Fail,
    Panic,
}

/// Processor recording processed and errored items and the highest
/// observed concurrency.
#[derive(Default)]
pub struct RecordingProcessor {
    behaviours: Mutex<Vec<(ArtworkId, Behaviour)>>,
    delay: Option<Duration>,
    pub started: Mutex<Vec<ArtworkId>>,
    pub processed: Mutex<Vec<ArtworkId>>,
    pub errored: Mutex<Vec<ArtworkId>>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl RecordingProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_behaviour(&self, id: ArtworkId, behaviour: Behaviour) {
        self.behaviours.lock().push((id, behaviour));
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn behaviour(&self, id: ArtworkId) -> Behaviour {
        self.behaviours
            .lock()
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, behaviour)| *behaviour)
            .unwrap_or(Behaviour::Succeed)
    }
}

#[async_trait]
impl QueueProcessor for RecordingProcessor {
    async fn process(&self, item: &QueueItem) -> Result<()> {
        self.started.lock().push(item.id);
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.running.fetch_sub(1, Ordering::SeqCst);

        match self.behaviour(item.id) {
            Behaviour::Succeed => {
                self.processed.lock().push(item.id);
                Ok(())
            }
            Behaviour::Fail => Err(ArtworkError::Internal("scripted failure".into())),
            Behaviour::Panic => panic!("scripted panic for {}", item.id),
        }
    }

    async fn processing_error(&self, item: &QueueItem) -> Result<()> {
        self.errored.lock().push(item.id);
        Ok(())
    }
}
