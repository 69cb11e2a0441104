//! Common utilities for integration tests

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated home, config and cache directories for one test
pub struct TestContext {
    pub temp: TempDir,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("config")).unwrap();
        std::fs::create_dir_all(temp.path().join("cache")).unwrap();
        Self { temp }
    }

    /// Command for the tagwatch binary with the platform dirs redirected
    /// into the temp directory
    pub fn tagwatch(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tagwatch"));
        cmd.current_dir(self.temp.path());
        cmd.env_remove("GITHUB_TOKEN");
        cmd.env_remove("RUST_LOG");

        if cfg!(target_os = "windows") {
            cmd.env("APPDATA", self.temp.path().join("config"));
            cmd.env("LOCALAPPDATA", self.temp.path().join("cache"));
            cmd.env("USERPROFILE", self.temp.path());
        } else if cfg!(target_os = "linux") {
            cmd.env("XDG_CONFIG_HOME", self.temp.path().join("config"));
            cmd.env("XDG_CACHE_HOME", self.temp.path().join("cache"));
            cmd.env("HOME", self.temp.path());
        } else {
            cmd.env("HOME", self.temp.path());
        }

        cmd
    }

    /// Where the binary will look for its config file
    pub fn config_path(&self) -> PathBuf {
        self.app_dir(self.config_root())
    }

    /// Default cache directory of the binary
    pub fn default_cache_dir(&self) -> PathBuf {
        if cfg!(target_os = "windows") || cfg!(target_os = "linux") {
            self.temp.path().join("cache").join("tagwatch")
        } else {
            self.temp
                .path()
                .join("Library")
                .join("Caches")
                .join("tagwatch")
        }
    }

    /// Write a config file that points the binary at `server_uri` and
    /// keeps the cache under `cache_dir`
    pub fn write_config(&self, server_uri: &str, cache_dir: &Path) {
        let path = self.config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            format!(
                "github:\n  api_url: {uri}\n  web_url: {uri}\ncache_dir: {cache}\n",
                uri = server_uri,
                cache = cache_dir.display()
            ),
        )
        .unwrap();
    }

    fn config_root(&self) -> PathBuf {
        if cfg!(target_os = "windows") || cfg!(target_os = "linux") {
            self.temp.path().join("config")
        } else {
            self.temp
                .path()
                .join("Library")
                .join("Application Support")
        }
    }

    fn app_dir(&self, root: PathBuf) -> PathBuf {
        root.join("tagwatch").join("config.yaml")
    }
}
