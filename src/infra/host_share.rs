use crate::app::ports::{ClipboardPort, NativeSharePort, SharePayload};
use crate::error::{Result, WorksError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Hosts without a share sheet (the CLI).
pub struct NoNativeShare;

#[async_trait]
impl NativeSharePort for NoNativeShare {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<()> {
        Err(WorksError::Share("native share is not available on this host".into()))
    }
}

/// Clipboard stand-in for a terminal: writes the text to a file when one is
/// configured, otherwise prints it to stdout.
pub struct TerminalClipboard {
    target: Option<PathBuf>,
}

impl TerminalClipboard {
    pub fn stdout() -> Self {
        Self { target: None }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { target: Some(path.into()) }
    }
}

#[async_trait]
impl ClipboardPort for TerminalClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        match &self.target {
            Some(path) => tokio::fs::write(path, text)
                .await
                .map_err(|e| WorksError::Share(format!("could not write {}: {}", path.display(), e))),
            None => {
                println!("{}", text);
                Ok(())
            }
        }
    }
}
