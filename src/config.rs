use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Cli;

pub const DEFAULT_OUTPUT: &str = "graph.puml";
pub const DEFAULT_JAVA: &str = "java";

/// Optional defaults read from a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub repo: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub plantuml_jar: Option<PathBuf>,
    pub java: Option<String>,
    pub viewer: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }
}

/// Everything one run needs, after merging CLI arguments over the config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub repo: PathBuf,
    pub reference: String,
    pub cutoff: DateTime<Utc>,
    pub output: PathBuf,
    pub plantuml_jar: Option<PathBuf>,
    pub java: String,
    pub viewer: Option<String>,
    pub open: bool,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        Ok(Settings {
            repo: cli.repo.clone().or(file.repo).unwrap_or_else(|| PathBuf::from(".")),
            reference: cli.reference.clone(),
            cutoff: parse_cutoff(&cli.before)?,
            output: cli
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            plantuml_jar: cli.plantuml_jar.clone().or(file.plantuml_jar),
            java: cli
                .java
                .clone()
                .or(file.java)
                .unwrap_or_else(|| DEFAULT_JAVA.to_string()),
            viewer: file.viewer,
            open: cli.open,
        })
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` (both read as UTC) or RFC 3339
pub fn parse_cutoff(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    bail!("Invalid date '{}': expected YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or RFC 3339", value)
}
