use crate::core::error::{TagwatchError, TagwatchResult};
use std::path::{Path, PathBuf};

/// Get the Tagwatch home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\tagwatch
/// - Linux: ~/.config/tagwatch
/// - macOS: ~/Library/Application Support/tagwatch
pub fn tagwatch_home() -> TagwatchResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| TagwatchError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("tagwatch"))
}

/// Get the cache directory
///
/// Platform-specific locations:
/// - Windows: %LOCALAPPDATA%\tagwatch
/// - Linux: ~/.cache/tagwatch
/// - macOS: ~/Library/Caches/tagwatch
pub fn cache_dir() -> TagwatchResult<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| TagwatchError::Path("Could not determine cache directory".to_string()))?;
    Ok(cache_dir.join("tagwatch"))
}

/// Get the config file path (`<tagwatch_home>/config.yaml`)
pub fn config_file() -> TagwatchResult<PathBuf> {
    Ok(tagwatch_home()?.join("config.yaml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> TagwatchResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
