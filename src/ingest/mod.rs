//! Source asset ingestion.
//!
//! Normalizes the three supported input shapes (archive entries, directly
//! selected files, pasted snippets) into [`CodeAsset`] values. Snippet
//! handling lives on the session since it needs the current collection size;
//! everything here is shape- and allowlist-level.

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

pub mod archive;

/// File extensions accepted as source assets (matched case-insensitively
/// against the segment after the final dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "js", "ts", "jsx", "tsx", "json", "css", "html", "md", "py", "go", "rs", "c", "cpp", "cs",
    "java", "rb", "php", "sh",
];

/// One ingested unit of source text.
///
/// `content` is always decoded text, never raw bytes. `name` is a display
/// identifier and is not required to be unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAsset {
    pub name: String,
    pub content: String,
}

impl CodeAsset {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A (name, byte-content) pair from direct file selection.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Check whether a file name carries a supported source extension.
pub fn is_supported_name(name: &str) -> bool {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return false,
    };
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|candidate| ext.eq_ignore_ascii_case(candidate))
}

/// Decode raw bytes as UTF-8 text, replacing invalid sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Filter directly selected files against the allowlist and decode them.
///
/// Selection order is preserved. Fails with [`AuditError::NoSupportedFiles`]
/// when nothing survives the filter, so the caller's collection stays as it
/// was.
pub fn decode_selected(files: Vec<SelectedFile>) -> Result<Vec<CodeAsset>> {
    let assets: Vec<CodeAsset> = files
        .into_iter()
        .filter(|file| is_supported_name(&file.name))
        .map(|file| {
            let content = decode_text(&file.bytes);
            CodeAsset {
                name: file.name,
                content,
            }
        })
        .collect();

    if assets.is_empty() {
        return Err(AuditError::NoSupportedFiles);
    }

    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_names_match_allowlist() {
        assert!(is_supported_name("main.rs"));
        assert!(is_supported_name("src/lib.ts"));
        assert!(is_supported_name("component.tsx"));
        assert!(is_supported_name("deploy.sh"));
        assert!(is_supported_name("README.md"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_supported_name("Program.CS"));
        assert!(is_supported_name("index.Html"));
        assert!(is_supported_name("MAIN.PY"));
    }

    #[test]
    fn unsupported_names_are_rejected() {
        assert!(!is_supported_name("binary.exe"));
        assert!(!is_supported_name("image.png"));
        assert!(!is_supported_name("Makefile"));
        assert!(!is_supported_name("archive.tar.gz"));
        assert!(!is_supported_name("trailing-dot."));
    }

    #[test]
    fn only_the_final_extension_counts() {
        assert!(is_supported_name("bundle.min.js"));
        assert!(!is_supported_name("notes.rs.bak"));
    }

    #[test]
    fn decode_selected_filters_and_preserves_order() {
        let files = vec![
            SelectedFile::new("a.rs", b"fn a() {}".to_vec()),
            SelectedFile::new("skip.bin", vec![0, 1, 2]),
            SelectedFile::new("b.py", b"print('b')".to_vec()),
        ];

        let assets = decode_selected(files).expect("two supported files");
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].name, "a.rs");
        assert_eq!(assets[0].content, "fn a() {}");
        assert_eq!(assets[1].name, "b.py");
    }

    #[test]
    fn decode_selected_fails_when_nothing_qualifies() {
        let files = vec![
            SelectedFile::new("a.exe", vec![1]),
            SelectedFile::new("b.png", vec![2]),
        ];

        let err = decode_selected(files).unwrap_err();
        assert!(matches!(err, AuditError::NoSupportedFiles));
    }

    #[test]
    fn decode_selected_fails_on_empty_input() {
        let err = decode_selected(Vec::new()).unwrap_err();
        assert!(matches!(err, AuditError::NoSupportedFiles));
    }

    #[test]
    fn decode_text_replaces_invalid_utf8() {
        let decoded = decode_text(&[b'o', b'k', 0xFF, b'!']);
        assert_eq!(decoded, "ok\u{FFFD}!");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn case_flips_never_change_acceptance(
                idx in 0..SUPPORTED_EXTENSIONS.len(),
                mask in proptest::collection::vec(any::<bool>(), 4),
                stem in "[a-z0-9_]{1,12}",
            ) {
                let ext = SUPPORTED_EXTENSIONS[idx];
                let flipped: String = ext
                    .chars()
                    .enumerate()
                    .map(|(i, ch)| {
                        if mask.get(i).copied().unwrap_or(false) {
                            ch.to_ascii_uppercase()
                        } else {
                            ch
                        }
                    })
                    .collect();

                let name = format!("{}.{}", stem, flipped);
                prop_assert!(is_supported_name(&name));
            }

            #[test]
            fn names_without_extension_are_rejected(stem in "[a-zA-Z0-9_]{1,16}") {
                prop_assert!(!is_supported_name(&stem));
            }
        }
    }
}
