use thiserror::Error;

pub type TagwatchResult<T> = Result<T, TagwatchError>;

#[derive(Error, Debug)]
pub enum TagwatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub error: {0}")]
    GitHub(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Version error: {0}")]
    Version(String),

    /// The repository argument was not of the form `owner/name`.
    #[error("Invalid repository: {0}")]
    InvalidRepo(String),

    /// A scraped page lacked the element the resolver looks for.
    /// Expected when the default branch already matches the tag.
    #[error("Missing element: {0}")]
    MissingElement(String),
}
