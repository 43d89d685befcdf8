// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export — finished artifacts, derived file names, and staged downloads.
//
// A staged download is a temporary file holding the artifact bytes. It is
// removed when the handle drops unless it was persisted to a destination.

use std::io::Write;
use std::path::{Path, PathBuf};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::{ArtifactFormat, ConversionMode};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::assemble::{CompressedDocument, OutputDocument};
use crate::docx::DocxWriter;
use crate::pdf::PdfWriter;

/// Stem used when the source has no usable file name.
pub const FALLBACK_STEM: &str = "document";

/// One serialized output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub format: ArtifactFormat,
}

impl Artifact {
    pub fn media_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write into a temporary file in the system temp directory.
    pub fn stage(&self) -> Result<StagedDownload> {
        self.stage_in(std::env::temp_dir())
    }

    /// Write into a temporary file inside `dir`. Staging next to the final
    /// destination keeps [`StagedDownload::persist`] a same-filesystem rename.
    #[instrument(skip(self, dir), fields(file_name = %self.file_name, bytes = self.bytes.len()))]
    pub fn stage_in(&self, dir: impl AsRef<Path>) -> Result<StagedDownload> {
        let mut file = tempfile::Builder::new()
            .prefix("blattwerk-")
            .suffix(&format!(".{}", self.format.extension()))
            .tempfile_in(dir.as_ref())?;
        file.write_all(&self.bytes)?;
        file.flush()?;
        debug!(path = %file.path().display(), "Artifact staged");
        Ok(StagedDownload {
            file,
            file_name: self.file_name.clone(),
        })
    }

    /// Write to `dir/<file_name>`, returning the path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        self.stage_in(dir.as_ref())?.persist_in(dir)
    }
}

/// Temporary file holding an artifact; removed on drop unless persisted.
#[derive(Debug)]
pub struct StagedDownload {
    file: NamedTempFile,
    file_name: String,
}

impl StagedDownload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Move the staged file to `destination`, releasing the temporary handle.
    pub fn persist(self, destination: impl AsRef<Path>) -> Result<PathBuf> {
        let destination = destination.as_ref().to_path_buf();
        self.file
            .persist(&destination)
            .map_err(|err| BlattwerkError::Io(err.error))?;
        info!(path = %destination.display(), "Artifact saved");
        Ok(destination)
    }

    /// Persist under the suggested file name inside `dir`.
    pub fn persist_in(self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let destination = dir.as_ref().join(&self.file_name);
        self.persist(destination)
    }
}

/// Suggested output name for a source file: `<stem>.docx` for extraction,
/// `<stem>-compressed.pdf` for compression.
pub fn derive_file_name(source_name: Option<&str>, mode: ConversionMode) -> String {
    let stem = source_name
        .map(Path::new)
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_STEM);
    match mode {
        ConversionMode::Compress => format!("{stem}-compressed.pdf"),
        ConversionMode::ExtractText | ConversionMode::ExtractImage => format!("{stem}.docx"),
    }
}

/// Serialize recompressed pages into a PDF artifact.
pub fn export_compressed(
    document: CompressedDocument,
    source_name: Option<&str>,
) -> Result<Artifact> {
    let file_name = derive_file_name(source_name, ConversionMode::Compress);
    let mut writer = PdfWriter::new();
    if let Some(stem) = file_name.strip_suffix("-compressed.pdf") {
        writer.set_title(stem);
    }
    Ok(Artifact {
        bytes: writer.write(document)?,
        file_name,
        format: ArtifactFormat::Pdf,
    })
}

/// Serialize extracted blocks into a DOCX artifact.
pub fn export_document(
    document: &OutputDocument,
    mode: ConversionMode,
    source_name: Option<&str>,
    writer: &DocxWriter,
) -> Result<Artifact> {
    Ok(Artifact {
        bytes: writer.write(document)?,
        file_name: derive_file_name(source_name, mode),
        format: ArtifactFormat::Docx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_mode() {
        assert_eq!(
            derive_file_name(Some("report.pdf"), ConversionMode::Compress),
            "report-compressed.pdf"
        );
        assert_eq!(
            derive_file_name(Some("/tmp/scans/report.final.pdf"), ConversionMode::ExtractText),
            "report.final.docx"
        );
        assert_eq!(
            derive_file_name(Some("notes"), ConversionMode::ExtractImage),
            "notes.docx"
        );
    }

    #[test]
    fn missing_stem_falls_back() {
        assert_eq!(derive_file_name(None, ConversionMode::Compress), "document-compressed.pdf");
        assert_eq!(derive_file_name(Some(""), ConversionMode::ExtractText), "document.docx");
        assert_eq!(derive_file_name(Some(".pdf"), ConversionMode::ExtractText), ".pdf.docx");
    }

    #[test]
    fn staged_file_is_removed_on_drop() {
        let artifact = Artifact {
            bytes: b"%PDF-1.5".to_vec(),
            file_name: "x-compressed.pdf".into(),
            format: ArtifactFormat::Pdf,
        };
        let staged = artifact.stage().unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn persisted_file_survives() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact {
            bytes: vec![1, 2, 3],
            file_name: "out.docx".into(),
            format: ArtifactFormat::Docx,
        };
        let path = artifact.write_to_dir(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("out.docx"));
        assert_eq!(std::fs::read(&path).unwrap(), [1, 2, 3]);
        assert_eq!(artifact.media_type(), ArtifactFormat::Docx.mime_type());
    }
}
