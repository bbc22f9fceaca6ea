//! Minecraft-Pi integration for PyEditor.
//!
//! The editor asks a [`MinecraftProbe`] once at startup whether the game is installed
//! and running, and may ask it to start the game.

use anyhow::Result;
use async_trait::async_trait;

mod local;

pub use local::{find_executable, LocalMinecraft};

#[async_trait]
pub trait MinecraftProbe: Send + Sync {
    /// Whether Minecraft-Pi can be used on this machine.
    async fn is_available(&self) -> bool;

    /// Whether a Minecraft-Pi process is currently running.
    async fn is_running(&self) -> bool;

    /// Launch the game in the background.
    async fn start(&self) -> Result<()>;
}

/// Probe used when the integration is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

#[async_trait]
impl MinecraftProbe for Unavailable {
    async fn is_available(&self) -> bool {
        false
    }

    async fn is_running(&self) -> bool {
        false
    }

    async fn start(&self) -> Result<()> {
        Err(anyhow::anyhow!("Minecraft-Pi support is disabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_probe() {
        let probe = Unavailable;
        assert!(!probe.is_available().await);
        assert!(!probe.is_running().await);
        assert!(probe.start().await.is_err());
    }
}
