use crate::addon::Addon;
use crate::manifest::{
    build_addon, decode_content_history, decode_manifest, CONTENT_HISTORY_FILE_NAME,
    MANIFEST_FILE_NAME,
};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read community directory {0}: {1}")]
    ReadRoot(PathBuf, std::io::Error),
}

/// One immediate child of the community directory whose subtree contains both
/// required metadata files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonCandidate {
    pub directory: PathBuf,
    pub manifest_path: PathBuf,
    pub content_history_path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub directory: PathBuf,
    pub reason: String,
}

/// The outcome of one discovery pass. A candidate that fails validation lands
/// in `failures` and never aborts the rest of the batch.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub addons: Vec<Addon>,
    pub failures: Vec<ScanFailure>,
}

/// Queue-based search for a file anywhere within a directory subtree.
/// Unreadable subdirectories are skipped rather than surfaced.
pub fn search_for_file(path: &Path, file_name: &str) -> Option<PathBuf> {
    let mut queue = vec![path.to_path_buf()];
    while let Some(current) = queue.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries {
            let Ok(entry) = entry else {
                continue;
            };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_file() && entry.file_name() == file_name {
                return Some(entry.path());
            }
            if file_type.is_dir() {
                queue.push(entry.path());
            }
        }
    }
    None
}

/// Walks the immediate children of the community directory. Each child is one
/// candidate whose subtree is searched independently for the two metadata
/// files; children missing either file are dropped silently. Only failures to
/// read the root itself are fatal.
pub fn discover_candidates(root: &Path) -> Result<Vec<AddonCandidate>, ScanError> {
    let entries =
        std::fs::read_dir(root).map_err(|err| ScanError::ReadRoot(root.to_path_buf(), err))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ScanError::ReadRoot(root.to_path_buf(), err))?;
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_dir() {
            continue;
        }
        let directory = entry.path();
        // Size as reported for the directory entry itself, matching what the
        // OS shows for the node; not a recursive sum of file contents.
        let size = metadata.len();
        let Some(manifest_path) = search_for_file(&directory, MANIFEST_FILE_NAME) else {
            continue;
        };
        let Some(content_history_path) = search_for_file(&directory, CONTENT_HISTORY_FILE_NAME)
        else {
            continue;
        };
        candidates.push(AddonCandidate {
            directory,
            manifest_path,
            content_history_path,
            size,
        });
    }
    Ok(candidates)
}

fn load_candidate(candidate: &AddonCandidate) -> Result<Addon, String> {
    let manifest_text = std::fs::read_to_string(&candidate.manifest_path)
        .map_err(|err| format!("failed to read {}: {}", MANIFEST_FILE_NAME, err))?;
    let manifest = decode_manifest(&manifest_text)
        .map_err(|err| format!("invalid {}: {}", MANIFEST_FILE_NAME, err))?;

    let history_text = std::fs::read_to_string(&candidate.content_history_path)
        .map_err(|err| format!("failed to read {}: {}", CONTENT_HISTORY_FILE_NAME, err))?;
    let history = decode_content_history(&history_text)
        .map_err(|err| format!("invalid {}: {}", CONTENT_HISTORY_FILE_NAME, err))?;

    Ok(build_addon(manifest, history, candidate.size))
}

/// Full discovery pass: find candidates, validate each, collect per-candidate
/// failures. The returned addon batch is the new catalog generation.
pub fn scan_community_dir(root: &Path) -> Result<ScanReport, ScanError> {
    let candidates = discover_candidates(root)?;
    let mut report = ScanReport::default();
    for candidate in candidates {
        match load_candidate(&candidate) {
            Ok(addon) => report.addons.push(addon),
            Err(reason) => report.failures.push(ScanFailure {
                directory: candidate.directory.clone(),
                reason,
            }),
        }
    }
    Ok(report)
}
