use std::collections::BTreeSet;

use tracing::warn;

use super::scanner::ScannerCategory;

/// Narrows a configured, comma separated scanner list to the identifiers
/// registered for `category`, keeping configured order and dropping
/// duplicates. Every unregistered identifier is logged once.
pub fn resolve_priorities(
    configured: &str,
    category: ScannerCategory,
    registered: &BTreeSet<String>,
) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::new();
    let mut seen = BTreeSet::new();

    for id in configured
        .split(',')
        .map(|id| id.trim().to_lowercase())
        .filter(|id| !id.is_empty())
    {
        if !seen.insert(id.clone()) {
            continue;
        }
        if registered.contains(&id) {
            resolved.push(id);
        } else {
            warn!(
                target: "artwork::scan",
                %category,
                scanner = %id,
                "Desired artwork scanner not registered"
            );
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn keeps_configured_order_of_registered_ids() {
        let resolved = resolve_priorities("b,a,c", ScannerCategory::Movie, &registered(&["a", "b"]));
        assert_eq!(resolved, vec!["b", "a"]);
    }

    #[test]
    fn trims_folds_case_and_dedupes() {
        let resolved = resolve_priorities(
            " TheTVDB , fanarttv,thetvdb,, ",
            ScannerCategory::Series,
            &registered(&["thetvdb", "fanarttv"]),
        );
        assert_eq!(resolved, vec!["thetvdb", "fanarttv"]);
    }

    #[test]
    fn nothing_registered_resolves_empty() {
        assert!(resolve_priorities("themoviedb", ScannerCategory::Person, &BTreeSet::new()).is_empty());
    }
}
