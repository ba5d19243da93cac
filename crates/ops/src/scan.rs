//! Binary scans
//!
//! Files matching a glob pattern are identified by their SHA-256 checksum and
//! submitted to the scan service one by one, in path order.

use crate::{OpsCtx, ScanOptions};
use globset::{GlobBuilder, GlobMatcher};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use xscan_errors::{Error, OpsError};
use xscan_types::{GraphScanRequest, ScanResponse};

/// Scan every file matching `pattern`
///
/// # Errors
///
/// Returns `OpsError::InvalidPattern` for a malformed glob,
/// `OpsError::NoScanTargets` when nothing matches, and any I/O or network
/// error raised while reading or scanning a file.
pub async fn scan_binaries(
    ctx: &OpsCtx,
    pattern: &str,
    options: ScanOptions,
) -> Result<Vec<ScanResponse>, Error> {
    let targets = collect_targets(pattern)?;
    if targets.is_empty() {
        return Err(OpsError::NoScanTargets {
            pattern: pattern.to_string(),
        }
        .into());
    }
    info!(pattern, count = targets.len(), "scanning binaries");

    let mut results = Vec::with_capacity(targets.len());
    for path in targets {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| Error::io_with_path(&e, &path))?;
        let sha256 = hex::encode(Sha256::digest(&bytes));
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(path = %path.display(), %sha256, "scanning file");
        let request = GraphScanRequest::binary(&file_name, sha256, options.include_licenses);
        let mut response = xscan_net::scan_graph(&ctx.net, &ctx.connection, &request).await?;
        if !options.include_licenses {
            response.licenses.clear();
        }
        results.push(response);
    }

    Ok(results)
}

/// Files matching `pattern`, sorted by path
///
/// # Errors
///
/// Returns `OpsError::InvalidPattern` if the pattern is not a valid glob.
pub fn collect_targets(pattern: &str) -> Result<Vec<PathBuf>, Error> {
    let matcher = compile(pattern)?;
    let root = walk_root(pattern);
    let walk_from = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root.as_path()
    };

    let mut targets: Vec<PathBuf> = WalkDir::new(walk_from)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            let candidate = if root.as_os_str().is_empty() {
                path.strip_prefix(".").unwrap_or(path)
            } else {
                path.as_path()
            };
            matcher.is_match(candidate)
        })
        .collect();

    targets.sort();
    Ok(targets)
}

fn compile(pattern: &str) -> Result<GlobMatcher, Error> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| {
            OpsError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.kind().to_string(),
            }
            .into()
        })
}

// Longest leading run of path components without glob syntax
fn walk_root(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(['*', '?', '[', '{']) {
            break;
        }
        root.push(component);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_walk_root_stops_at_glob_syntax() {
        assert_eq!(walk_root("dist/bin/*.so"), PathBuf::from("dist/bin"));
        assert_eq!(walk_root("*.bin"), PathBuf::new());
        assert_eq!(walk_root("a/**/b.bin"), PathBuf::from("a"));
        assert_eq!(walk_root("a/b.bin"), PathBuf::from("a/b.bin"));
    }

    #[test]
    fn test_collect_targets_sorted_and_filtered() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        std::fs::write(dir.join("b.bin"), b"b").unwrap();
        std::fs::write(dir.join("a.bin"), b"a").unwrap();
        std::fs::write(dir.join("notes.txt"), b"n").unwrap();
        std::fs::create_dir(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested").join("c.bin"), b"c").unwrap();

        let pattern = format!("{}/*.bin", dir.display());
        let targets = collect_targets(&pattern).unwrap();
        assert_eq!(targets, vec![dir.join("a.bin"), dir.join("b.bin")]);

        let pattern = format!("{}/**/*.bin", dir.display());
        assert_eq!(collect_targets(&pattern).unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = collect_targets("dist/[").unwrap_err();
        assert!(matches!(err, Error::Ops(OpsError::InvalidPattern { .. })));
    }
}
