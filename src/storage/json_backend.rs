use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{errors::Result, ledger::Ledger};

use super::document::{export_document, import_into, ImportMode};

const TMP_SUFFIX: &str = "tmp";

/// Writes the exported document to `path`, staging through a temporary file
/// so an interrupted write never truncates an existing export.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = export_document(ledger)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "wrote ledger document");
    Ok(())
}

/// Reads a document from disk and swaps it into `ledger`, returning any
/// lenient-mode warnings.
pub fn load_ledger_from_path(ledger: &mut Ledger, path: &Path, mode: ImportMode) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)?;
    import_into(ledger, &data, mode)
}

pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_keeps_original_extension() {
        assert_eq!(
            tmp_path(Path::new("gpa_data.json")),
            PathBuf::from("gpa_data.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("export")), PathBuf::from("export.tmp"));
    }
}
