//! Archive extraction.
//!
//! Decodes a ZIP byte blob into source assets. The whole walk runs on the
//! blocking pool and resolves as a single await point, so callers never see
//! partially extracted state: the call either yields every qualifying entry
//! or fails without touching anything.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::{AuditError, Result};

use super::{decode_text, is_supported_name, CodeAsset};

/// Extract every qualifying entry from a ZIP archive.
///
/// Qualifying entries are non-directory entries whose path matches the
/// source-file allowlist; each is decoded as UTF-8 text. Fails with
/// [`AuditError::ArchiveParse`] when the container (or any qualifying entry)
/// cannot be read, and with [`AuditError::NoValidAssets`] when the archive
/// holds no qualifying entry.
pub async fn extract_archive(bytes: Vec<u8>) -> Result<Vec<CodeAsset>> {
    let assets = tokio::task::spawn_blocking(move || extract_blocking(&bytes))
        .await
        .map_err(|e| AuditError::Internal(format!("archive task failed: {e}")))??;

    tracing::debug!("[ingest] Extracted {} asset(s) from archive", assets.len());
    Ok(assets)
}

fn extract_blocking(bytes: &[u8]) -> Result<Vec<CodeAsset>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AuditError::ArchiveParse(e.to_string()))?;

    let mut assets = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| AuditError::ArchiveParse(e.to_string()))?;

        if entry.is_dir() || !is_supported_name(entry.name()) {
            continue;
        }

        let name = entry.name().to_string();
        let mut raw = Vec::new();
        entry
            .read_to_end(&mut raw)
            .map_err(|e| AuditError::ArchiveParse(format!("entry '{name}': {e}")))?;

        assets.push(CodeAsset {
            name,
            content: decode_text(&raw),
        });
    }

    if assets.is_empty() {
        return Err(AuditError::NoValidAssets);
    }

    Ok(assets)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    fn build_zip(entries: &[(&str, &[u8])], dirs: &[&str]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        for dir in dirs {
            writer.add_directory(*dir, options).unwrap();
        }
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn extracts_exactly_the_allowlisted_entries() {
        let bytes = build_zip(
            &[
                ("src/main.rs", b"fn main() {}"),
                ("logo.png", &[0xDE, 0xAD]),
                ("app.ts", b"export {};"),
                ("notes.txt", b"not source"),
            ],
            &["src/"],
        );

        let mut assets = extract_archive(bytes).await.expect("two valid entries");
        assets.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].name, "app.ts");
        assert_eq!(assets[0].content, "export {};");
        assert_eq!(assets[1].name, "src/main.rs");
        assert_eq!(assets[1].content, "fn main() {}");
    }

    #[tokio::test]
    async fn directory_entries_are_skipped() {
        let bytes = build_zip(&[("lib.py", b"x = 1")], &["vendor/", "vendor/nested/"]);

        let assets = extract_archive(bytes).await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "lib.py");
    }

    #[tokio::test]
    async fn archive_without_qualifying_entries_fails() {
        let bytes = build_zip(&[("data.csv", b"1,2"), ("blob.bin", &[0])], &[]);

        let err = extract_archive(bytes).await.unwrap_err();
        assert!(matches!(err, AuditError::NoValidAssets));
    }

    #[tokio::test]
    async fn empty_archive_fails() {
        let bytes = build_zip(&[], &[]);

        let err = extract_archive(bytes).await.unwrap_err();
        assert!(matches!(err, AuditError::NoValidAssets));
    }

    #[tokio::test]
    async fn corrupt_container_fails_with_parse_error() {
        let err = extract_archive(b"definitely not a zip".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::ArchiveParse(_)));
    }

    #[tokio::test]
    async fn entry_bytes_are_decoded_lossily() {
        let bytes = build_zip(&[("weird.js", &[b'o', b'k', 0xFF][..])], &[]);

        let assets = extract_archive(bytes).await.unwrap();
        assert_eq!(assets[0].content, "ok\u{FFFD}");
    }
}
