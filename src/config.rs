//! Process-wide filesystem and converter configuration.
//!
//! The asset and scratch directories are fixed at startup and outlive the
//! process; `ensure_dirs` creates them once during bootstrap.

use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the spreadsheet template expected under the assets directory.
pub const TEMPLATE_FILE: &str = "Invoice.xlsx";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the invoice template asset.
    pub assets_dir: PathBuf,
    /// Scratch directory for filled workbooks, PDFs and archives.
    pub tmp_dir: PathBuf,
    /// LibreOffice executable used for PDF conversion.
    pub soffice_path: PathBuf,
    /// Pause held after each conversion before the next one may start.
    pub settle: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let assets_dir = env::var("INVOICE_ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./assets"));
        let tmp_dir = env::var("INVOICE_TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./tmp"));
        let soffice_path = env::var("SOFFICE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("soffice"));
        let settle_ms = env::var("CONVERTER_SETTLE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(500);

        Self {
            assets_dir,
            tmp_dir,
            soffice_path,
            settle: Duration::from_millis(settle_ms),
        }
    }

    /// Create the asset and scratch directories if they do not exist yet.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.assets_dir)?;
        std::fs::create_dir_all(&self.tmp_dir)
    }

    pub fn template_path(&self) -> PathBuf {
        self.assets_dir.join(TEMPLATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_path_under_assets_dir() {
        let config = AppConfig {
            assets_dir: PathBuf::from("/srv/invoice/assets"),
            tmp_dir: PathBuf::from("/srv/invoice/tmp"),
            soffice_path: PathBuf::from("soffice"),
            settle: Duration::from_millis(0),
        };
        assert_eq!(
            config.template_path(),
            PathBuf::from("/srv/invoice/assets/Invoice.xlsx")
        );
    }

    #[test]
    fn test_ensure_dirs_creates_both() {
        let root = tempfile::tempdir().unwrap();
        let config = AppConfig {
            assets_dir: root.path().join("assets"),
            tmp_dir: root.path().join("tmp"),
            soffice_path: PathBuf::from("soffice"),
            settle: Duration::from_millis(0),
        };
        config.ensure_dirs().unwrap();
        assert!(config.assets_dir.is_dir());
        assert!(config.tmp_dir.is_dir());
    }
}
