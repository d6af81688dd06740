//! Load retrieval prompts from an optional override directory.

use std::path::{Path, PathBuf};

use super::{RetrievalPrompts, RetrievalPromptsFile};

/// Embedded default YAML (canonical source: `retrieval-graph/prompts/retrieval.yaml`).
const EMBED_RETRIEVAL: &str = include_str!("../../prompts/retrieval.yaml");

/// File name looked up inside a prompts directory.
pub const PROMPTS_FILE: &str = "retrieval.yaml";

/// Error when loading prompts from a directory (missing dir, unreadable file, invalid YAML).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("prompts directory not found or not readable: {0}")]
    DirNotFound(String),
    #[error("failed to read prompts file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
}

fn parse_file(content: &str, path: &str) -> Result<RetrievalPromptsFile, LoadError> {
    serde_yaml::from_str(content).map_err(|e| LoadError::ParseYaml {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Default prompts parsed from the embedded YAML.
pub fn default_from_embedded() -> RetrievalPrompts {
    let file = parse_file(EMBED_RETRIEVAL, PROMPTS_FILE).unwrap_or_default();
    RetrievalPrompts {
        router: String::new(),
        generate_queries: String::new(),
        more_info: String::new(),
        research_plan: String::new(),
        general: String::new(),
        response: String::new(),
    }
    .overlay(file)
}

/// Loads `retrieval.yaml` from `dir` over the embedded defaults.
///
/// A directory without the file yields the defaults unchanged.
pub fn load(dir: &Path) -> Result<RetrievalPrompts, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirNotFound(dir.display().to_string()));
    }
    let path = dir.join(PROMPTS_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(default_from_embedded());
        }
        Err(e) => {
            return Err(LoadError::ReadFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };
    let file = parse_file(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), "loaded prompt overrides");
    Ok(default_from_embedded().overlay(file))
}

/// Prompts for a run: `dir` if given, else `prompts_dir_env` (the value of
/// `PROMPTS_DIR`) if set, else the embedded defaults.
pub fn resolve(
    dir: Option<&Path>,
    prompts_dir_env: Option<&str>,
) -> Result<RetrievalPrompts, LoadError> {
    let chosen: Option<PathBuf> = dir
        .map(Path::to_path_buf)
        .or_else(|| prompts_dir_env.filter(|s| !s.is_empty()).map(PathBuf::from));
    match chosen {
        Some(d) => load(&d),
        None => Ok(default_from_embedded()),
    }
}
