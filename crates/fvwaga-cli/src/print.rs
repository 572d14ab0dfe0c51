//! Print pass over invoices through an external PDF viewer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use fvwaga_core::models::config::PrintConfig;
use fvwaga_core::Document;

/// Counts of one print pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrintOutcome {
    pub printed: usize,
    pub failed: usize,
}

/// Resolve the viewer relative to the directory of the running binary.
pub fn viewer_path(config: &PrintConfig) -> PathBuf {
    if config.viewer.is_absolute() {
        return config.viewer.clone();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join(&config.viewer))
        .unwrap_or_else(|| config.viewer.clone())
}

/// Send every document to the viewer, one at a time.
///
/// A failing or slow job is reported and the pass moves on. A job still
/// running when the timeout hits is left alone.
pub async fn print_documents(
    documents: &[Document],
    config: &PrintConfig,
    mut report: impl FnMut(&Document, &anyhow::Result<()>),
) -> PrintOutcome {
    let viewer = viewer_path(config);
    let limit = Duration::from_secs(config.timeout_secs);
    let mut outcome = PrintOutcome::default();

    for document in documents {
        let result = print_one(&viewer, &config.args, &document.path, limit).await;
        match &result {
            Ok(()) => outcome.printed += 1,
            Err(e) => {
                warn!("Printing {} failed: {:#}", document.file_name, e);
                outcome.failed += 1;
            }
        }
        report(document, &result);
    }

    outcome
}

async fn print_one(viewer: &Path, args: &[String], path: &Path, limit: Duration) -> anyhow::Result<()> {
    debug!("{} {:?} {}", viewer.display(), args, path.display());

    let mut child = Command::new(viewer)
        .args(args)
        .arg(path)
        .spawn()
        .map_err(|e| anyhow::anyhow!("cannot start {}: {}", viewer.display(), e))?;

    match timeout(limit, child.wait()).await {
        Ok(status) => {
            let status = status?;
            if !status.success() {
                anyhow::bail!("viewer exited with {}", status);
            }
            Ok(())
        }
        Err(_) => anyhow::bail!("no answer from viewer after {}s", limit.as_secs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fvwaga_core::DocumentKind;

    #[test]
    fn test_viewer_next_to_binary() {
        let config = PrintConfig::default();
        let path = viewer_path(&config);
        assert!(path.ends_with("SumatraPDF.exe"));
        assert!(path.is_absolute());
    }

    #[test]
    fn test_absolute_viewer_kept() {
        let viewer = std::env::temp_dir().join("viewer.exe");
        let config = PrintConfig {
            viewer: viewer.clone(),
            ..PrintConfig::default()
        };
        assert_eq!(viewer_path(&config), viewer);
    }

    #[tokio::test]
    async fn test_missing_viewer_does_not_stop_pass() {
        let config = PrintConfig {
            viewer: std::env::temp_dir().join("fvwaga-no-such-viewer"),
            args: Vec::new(),
            timeout_secs: 1,
        };
        let documents = [
            Document::new("9A.pdf", DocumentKind::Invoice),
            Document::new("9B.pdf", DocumentKind::Invoice),
        ];

        let mut reported = Vec::new();
        let outcome = print_documents(&documents, &config, |doc, result| {
            reported.push((doc.file_name.clone(), result.is_ok()));
        })
        .await;

        assert_eq!(outcome, PrintOutcome { printed: 0, failed: 2 });
        assert_eq!(
            reported,
            [("9A.pdf".to_string(), false), ("9B.pdf".to_string(), false)]
        );
    }
}
