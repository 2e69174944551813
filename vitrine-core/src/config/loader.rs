use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use serde_json::Value;
use tracing::info;

use super::PropertyConfig;

pub const CONFIG_PATH_ENV: &str = "VITRINE_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "VITRINE_CONFIG_JSON";

impl PropertyConfig {
    /// Load properties. Evaluation order:
    /// 1) `$VITRINE_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$VITRINE_CONFIG_JSON` (inline JSON),
    /// 3) the first default file that exists,
    /// 4) empty, so every lookup falls back to its default.
    ///
    /// A `.env` file in the working directory is honoured first.
    pub fn load_from_env() -> anyhow::Result<Self> {
        if dotenvy::dotenv().is_ok() {
            info!("loaded .env file");
        }

        Self::load_from_sources(env::var(CONFIG_PATH_ENV).ok(), env::var(CONFIG_JSON_ENV).ok())
    }

    /// Blank values count as unset.
    fn load_from_sources(
        config_path: Option<String>,
        inline_json: Option<String>,
    ) -> anyhow::Result<Self> {
        let non_blank = |value: Option<String>| value.filter(|value| !value.trim().is_empty());

        if let Some(path) = non_blank(config_path) {
            return Self::load_from_file(Path::new(&path));
        }

        if let Some(raw) = non_blank(inline_json) {
            return Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"));
        }

        if let Some(path) = Self::find_default_file() {
            return Self::load_from_file(&path);
        }

        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid config {}", path.display()))?,
            Some("toml") | Some("tml") => Self::parse_toml(&contents)
                .with_context(|| format!("invalid config {}", path.display()))?,
            _ => Self::parse_from_str(&contents, &path.display().to_string())?,
        };

        info!(path = %path.display(), properties = config.len(), "configuration loaded");
        Ok(config)
    }

    fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        Self::parse_toml(contents).or_else(|toml_err| {
            Self::parse_json(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_toml(raw: &str) -> anyhow::Result<Self> {
        let table: toml::Table =
            toml::from_str(raw).map_err(|err| anyhow!("invalid config toml: {err}"))?;
        let value = serde_json::to_value(table)?;
        Ok(Self::from_value(&value))
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| anyhow!("invalid config json: {err}"))?;
        if !value.is_object() {
            return Err(anyhow!("config json must be an object"));
        }
        Ok(Self::from_value(&value))
    }

    fn from_value(value: &Value) -> Self {
        let mut properties = HashMap::new();
        flatten_into(None, value, &mut properties);
        Self::from_pairs(properties)
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "vitrine.toml",
            "vitrine.json",
            "config/vitrine.toml",
            "config/vitrine.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }
}

/// Nested tables become dotted keys; arrays become comma separated lists.
fn flatten_into(prefix: Option<&str>, value: &Value, out: &mut HashMap<String, String>) {
    let key = |suffix: &str| match prefix {
        Some(prefix) => format!("{prefix}.{suffix}"),
        None => suffix.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (name, child) in map {
                let child_key = key(name);
                flatten_into(Some(&child_key), child, out);
            }
        }
        Value::Array(items) => {
            if let Some(prefix) = prefix {
                let joined: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
                out.insert(prefix.to_string(), joined.join(","));
            }
        }
        Value::Null => {}
        scalar => {
            if let (Some(prefix), Some(text)) = (prefix, scalar_to_string(scalar)) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigService;
    use std::io::Write;

    #[test]
    fn toml_tables_flatten_to_dotted_keys() {
        let config = PropertyConfig::parse_toml(
            r#"
            [artwork.scanner.poster.movie]
            priorities = ["fanarttv", "themoviedb"]
            max_results = 3

            [artwork.scan.local.poster]
            movie = false
            "#,
        )
        .expect("valid toml");

        assert_eq!(
            config.get_property("artwork.scanner.poster.movie.priorities").as_deref(),
            Some("fanarttv,themoviedb")
        );
        assert_eq!(config.get_int("artwork.scanner.poster.movie.max_results", 5), 3);
        assert!(!config.get_bool("artwork.scan.local.poster.movie", true));
    }

    #[test]
    fn json_must_be_an_object() {
        assert!(PropertyConfig::parse_json("[1, 2]").is_err());
        let config =
            PropertyConfig::parse_json(r#"{"scheduler": {"artworkscan": {"max_threads": 4}}}"#)
                .expect("valid json");
        assert_eq!(config.get_int("scheduler.artworkscan.max_threads", 1), 4);
    }

    #[test]
    fn blank_sources_are_skipped() {
        let config = PropertyConfig::load_from_sources(
            Some("   ".to_string()),
            Some(r#"{"scheduler": {"artworkscan": {"max_results": 12}}}"#.to_string()),
        )
        .expect("blank path skipped");
        assert_eq!(config.get_int("scheduler.artworkscan.max_results", 30), 12);

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[scheduler.artworkscan]\nmax_threads = 3").expect("write config");
        let path = file.path().display().to_string();

        let config = PropertyConfig::load_from_sources(Some(path), Some(String::new()))
            .expect("path wins over blank json");
        assert_eq!(config.get_int("scheduler.artworkscan.max_threads", 1), 3);
    }

    #[test]
    fn unknown_extension_tries_toml_then_json() {
        let mut file = tempfile::Builder::new()
            .suffix(".conf")
            .tempfile()
            .expect("temp file");
        write!(file, r#"{{"artwork": {{"scan": {{"online": {{"photo": {{"person": false}}}}}}}}}}"#)
            .expect("write config");

        let config = PropertyConfig::load_from_file(file.path()).expect("json fallback");
        assert!(!config.get_bool("artwork.scan.online.photo.person", true));
    }
}
