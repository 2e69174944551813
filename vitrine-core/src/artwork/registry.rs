use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use super::scanner::{
    ArtworkScanner, BoxedSetArtworkScanner, MovieArtworkScanner, PersonArtworkScanner,
    ScannerCategory, SeriesArtworkScanner,
};

struct ScannerTable<T: ?Sized> {
    scanners: RwLock<HashMap<String, Arc<T>>>,
}

impl<T: ?Sized + ArtworkScanner> ScannerTable<T> {
    fn new() -> Self {
        Self {
            scanners: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, category: ScannerCategory, scanner: Arc<T>) {
        let id = scanner.scanner_name().to_lowercase();
        info!(
            target: "artwork::registry",
            %category,
            scanner = %id,
            "Registered artwork scanner"
        );
        self.scanners.write().insert(id, scanner);
    }

    fn get(&self, id: &str) -> Option<Arc<T>> {
        self.scanners.read().get(&id.to_lowercase()).cloned()
    }

    fn ids(&self) -> BTreeSet<String> {
        self.scanners.read().keys().cloned().collect()
    }
}

/// Online scanners keyed by lowercase identifier, one table per category.
///
/// Registration normally happens once at startup; lookups are read-only
/// afterwards and safe from any worker.
pub struct ScannerRegistry {
    movie: ScannerTable<dyn MovieArtworkScanner>,
    series: ScannerTable<dyn SeriesArtworkScanner>,
    person: ScannerTable<dyn PersonArtworkScanner>,
    boxed_set: ScannerTable<dyn BoxedSetArtworkScanner>,
}

impl ScannerRegistry {
    pub fn new() -> Self {
        Self {
            movie: ScannerTable::new(),
            series: ScannerTable::new(),
            person: ScannerTable::new(),
            boxed_set: ScannerTable::new(),
        }
    }

    pub fn register_movie_scanner(&self, scanner: Arc<dyn MovieArtworkScanner>) {
        self.movie.insert(ScannerCategory::Movie, scanner);
    }

    pub fn register_series_scanner(&self, scanner: Arc<dyn SeriesArtworkScanner>) {
        self.series.insert(ScannerCategory::Series, scanner);
    }

    pub fn register_person_scanner(&self, scanner: Arc<dyn PersonArtworkScanner>) {
        self.person.insert(ScannerCategory::Person, scanner);
    }

    pub fn register_boxed_set_scanner(&self, scanner: Arc<dyn BoxedSetArtworkScanner>) {
        self.boxed_set.insert(ScannerCategory::BoxedSet, scanner);
    }

    pub fn movie_scanner(&self, id: &str) -> Option<Arc<dyn MovieArtworkScanner>> {
        self.movie.get(id)
    }

    pub fn series_scanner(&self, id: &str) -> Option<Arc<dyn SeriesArtworkScanner>> {
        self.series.get(id)
    }

    pub fn person_scanner(&self, id: &str) -> Option<Arc<dyn PersonArtworkScanner>> {
        self.person.get(id)
    }

    pub fn boxed_set_scanner(&self, id: &str) -> Option<Arc<dyn BoxedSetArtworkScanner>> {
        self.boxed_set.get(id)
    }

    /// Lowercase identifiers registered for `category`.
    pub fn registered_ids(&self, category: ScannerCategory) -> BTreeSet<String> {
        match category {
            ScannerCategory::Movie => self.movie.ids(),
            ScannerCategory::Series => self.series.ids(),
            ScannerCategory::Person => self.person.ids(),
            ScannerCategory::BoxedSet => self.boxed_set.ids(),
        }
    }
}

impl Default for ScannerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScannerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannerRegistry")
            .field("movie", &self.movie.ids())
            .field("series", &self.series.ids())
            .field("person", &self.person.ids())
            .field("boxed_set", &self.boxed_set.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Provider(&'static str);

    impl ArtworkScanner for Provider {
        fn scanner_name(&self) -> &str {
            self.0
        }
    }

    impl MovieArtworkScanner for Provider {}
    impl SeriesArtworkScanner for Provider {}

    #[test]
    fn lookup_is_case_insensitive_and_partitioned() {
        let registry = ScannerRegistry::new();
        let provider = Arc::new(Provider("TheMovieDb"));
        registry.register_movie_scanner(provider);

        assert!(registry.movie_scanner("themoviedb").is_some());
        assert!(registry.movie_scanner("THEMOVIEDB").is_some());
        assert!(registry.series_scanner("themoviedb").is_none());
        assert_eq!(
            registry.registered_ids(ScannerCategory::Movie),
            BTreeSet::from(["themoviedb".to_string()])
        );
    }

    #[test]
    fn one_scanner_can_fill_several_roles() {
        let registry = ScannerRegistry::new();
        let provider = Arc::new(Provider("fanarttv"));
        registry.register_movie_scanner(provider.clone());
        registry.register_series_scanner(provider);

        assert!(registry.movie_scanner("fanarttv").is_some());
        assert!(registry.series_scanner("fanarttv").is_some());
        assert!(registry.registered_ids(ScannerCategory::Person).is_empty());
    }
}
