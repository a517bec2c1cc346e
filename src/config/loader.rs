//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FormsmithError, FormsmithResult};

use super::types::{Config, Verbosity};

const PROJECT_CONFIG: &str = ".formsmith/config.toml";
const USER_CONFIG: &str = "formsmith/config.toml";

const KNOWN_KEYS: &[&str] = &[
    "storage",
    "dir",
    "key",
    "session",
    "revalidate_derived",
    "output",
    "verbosity",
];

/// Unknown or misspelled key found while loading a config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    /// 1-indexed line of the first mention
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> FormsmithResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| FormsmithError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .rsplit('.')
                .next()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults, then apply env
/// overrides
///
/// A config file that fails to parse is skipped with a warning log.
pub fn load_or_default(project_root: Option<&Path>) -> (Config, Vec<ConfigWarning>) {
    let candidates = project_root
        .map(|root| root.join(PROJECT_CONFIG))
        .into_iter()
        .chain(user_config_dir().map(|dir| dir.join(USER_CONFIG)));

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_with_warnings(&path) {
            Ok((config, warnings)) => {
                log::debug!("loaded config from {}", path.display());
                return (with_env_overrides(config), warnings);
            }
            Err(e) => log::warn!("skipping config: {}", e),
        }
    }

    (with_env_overrides(Config::default()), Vec::new())
}

/// Apply environment variable overrides (FORMSMITH_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |name| std::env::var(name).ok())
}

pub(super) fn apply_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Config {
    if let Some(dir) = lookup("FORMSMITH_STORAGE_DIR").filter(|d| !d.is_empty()) {
        config.storage.dir = Some(PathBuf::from(dir));
    }

    if let Some(key) = lookup("FORMSMITH_STORAGE_KEY").filter(|k| !k.is_empty()) {
        config.storage.key = key;
    }

    if let Some(verbosity) = lookup("FORMSMITH_VERBOSITY") {
        config.output.verbosity = Verbosity::parse(&verbosity).unwrap_or_default();
    }

    if let Some(val) = lookup("FORMSMITH_REVALIDATE_DERIVED") {
        config.session.revalidate_derived = matches!(
            val.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
    }

    config
}

/// Replace a leading `~` with the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Get XDG config directory
fn user_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

pub(super) fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ac) in a.chars().enumerate() {
        let mut curr = Vec::with_capacity(b.len() + 1);
        curr.push(i + 1);
        for (j, bc) in b.iter().enumerate() {
            let cost = usize::from(ac != *bc);
            curr.push((prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost));
        }
        prev = curr;
    }

    prev[b.len()]
}
