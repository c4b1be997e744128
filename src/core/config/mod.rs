use std::path::PathBuf;

pub const DEFAULT_SEEN_RELEASES_FILE: &str = "sent_releases.txt";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PROJECTS is not configured")]
    MissingProjects,
}

/// Runtime configuration resolved from the environment. Passed explicitly
/// into the scanner and store constructors; nothing reads the environment
/// after this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub projects_raw: String,
    pub seen_releases_path: PathBuf,
    pub webhook_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let projects_raw = env_nonempty("PROJECTS").ok_or(ConfigError::MissingProjects)?;
        let seen_releases_path = env_nonempty("SENT_RELEASES_FILE")
            .unwrap_or_else(|| DEFAULT_SEEN_RELEASES_FILE.to_string())
            .into();
        let webhook_url = env_nonempty("LARK_WEBHOOK_URL");

        Ok(Self {
            projects_raw,
            seen_releases_path,
            webhook_url,
        })
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    pub feed_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectList {
    pub projects: Vec<ProjectConfig>,
    /// Raw items that did not yield both a name and a url; the caller
    /// decides how to report them.
    pub skipped: Vec<String>,
}

/// Parses the `PROJECTS` string: comma-separated `name:url` pairs, split at
/// the first `:` only since feed urls carry their own colons.
pub fn parse_project_list(raw: &str) -> ProjectList {
    let mut list = ProjectList::default();
    for item in raw.split(',') {
        let Some((name, feed_url)) = item.split_once(':') else {
            list.skipped.push(item.to_string());
            continue;
        };
        let name = name.trim();
        let feed_url = feed_url.trim();
        if name.is_empty() || feed_url.is_empty() {
            list.skipped.push(item.to_string());
            continue;
        }
        list.projects.push(ProjectConfig {
            name: name.to_string(),
            feed_url: feed_url.to_string(),
        });
    }
    list
}
