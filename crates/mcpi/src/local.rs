use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::MinecraftProbe;

/// Probe for a Minecraft-Pi installed on the local machine.
#[derive(Debug, Clone)]
pub struct LocalMinecraft {
    executable: String,
    process_name: String,
}

impl LocalMinecraft {
    pub fn new(executable: impl Into<String>, process_name: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            process_name: process_name.into(),
        }
    }
}

#[async_trait]
impl MinecraftProbe for LocalMinecraft {
    async fn is_available(&self) -> bool {
        let found = find_executable(&self.executable);
        match &found {
            Some(path) => log::info!("Minecraft-Pi found at {}", path.display()),
            None => log::info!("Minecraft-Pi executable '{}' not found", self.executable),
        }
        found.is_some()
    }

    async fn is_running(&self) -> bool {
        let status = Command::new("pgrep")
            .arg("-x")
            .arg(&self.process_name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                log::warn!("Could not run pgrep: {}", e);
                false
            }
        }
    }

    async fn start(&self) -> Result<()> {
        let path = find_executable(&self.executable)
            .with_context(|| format!("Executable '{}' not found", self.executable))?;

        let child = Command::new(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", path.display()))?;

        log::info!("Started Minecraft-Pi (pid {:?})", child.id());
        // The game outlives the editor; the handle is dropped without killing it.
        drop(child);
        Ok(())
    }
}

/// Locate `name` the way a shell would: as a path if it contains a separator,
/// otherwise in each `PATH` entry.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MISSING: &str = "no-such-minecraft-binary-4711";

    #[test]
    fn test_find_executable_rejects_empty_name() {
        assert!(find_executable("").is_none());
    }

    #[test]
    fn test_find_executable_missing() {
        assert!(find_executable(MISSING).is_none());
    }

    #[test]
    fn test_find_executable_by_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("minecraft-pi");
        std::fs::write(&file, b"").unwrap();

        let found = find_executable(file.to_str().unwrap());
        assert_eq!(found.as_deref(), Some(file.as_path()));
        assert!(find_executable(dir.path().join("other").to_str().unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_missing_game_is_unavailable() {
        let probe = LocalMinecraft::new(MISSING, MISSING);
        assert!(!probe.is_available().await);
        assert!(!probe.is_running().await);
    }

    #[tokio::test]
    async fn test_start_missing_game_fails() {
        let probe = LocalMinecraft::new(MISSING, MISSING);
        let err = probe.start().await.unwrap_err();
        assert!(err.to_string().contains(MISSING));
    }
}
