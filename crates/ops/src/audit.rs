//! Project audits
//!
//! An audit locates the project's build manifests and submits one graph scan
//! per module. npm projects are audited from the root `package.json` only;
//! Gradle and Maven projects are searched recursively for nested modules.

use crate::{OpsCtx, ScanOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};
use xscan_errors::{Error, OpsError};
use xscan_types::{Ecosystem, GraphScanRequest, Manifest, ScanResponse};

/// Directories never searched for modules
const SKIPPED_DIRS: &[&str] = &["node_modules", "build", "target", ".git", ".gradle"];

/// Audit the npm project rooted at `dir`
///
/// # Errors
///
/// See [`audit_project`].
pub async fn audit_npm(
    ctx: &OpsCtx,
    dir: &Path,
    options: ScanOptions,
) -> Result<Vec<ScanResponse>, Error> {
    audit_project(ctx, Ecosystem::Npm, dir, options).await
}

/// Audit the Gradle project rooted at `dir`
///
/// # Errors
///
/// See [`audit_project`].
pub async fn audit_gradle(
    ctx: &OpsCtx,
    dir: &Path,
    options: ScanOptions,
) -> Result<Vec<ScanResponse>, Error> {
    audit_project(ctx, Ecosystem::Gradle, dir, options).await
}

/// Audit the Maven project rooted at `dir`
///
/// # Errors
///
/// See [`audit_project`].
pub async fn audit_mvn(
    ctx: &OpsCtx,
    dir: &Path,
    options: ScanOptions,
) -> Result<Vec<ScanResponse>, Error> {
    audit_project(ctx, Ecosystem::Maven, dir, options).await
}

/// Audit every module of a project, in module path order
///
/// # Errors
///
/// Returns `OpsError::ManifestNotFound` when the project has no manifest for
/// `ecosystem`, and any I/O or network error raised while reading a manifest
/// or scanning a module.
pub async fn audit_project(
    ctx: &OpsCtx,
    ecosystem: Ecosystem,
    dir: &Path,
    options: ScanOptions,
) -> Result<Vec<ScanResponse>, Error> {
    let manifests = find_manifests(ecosystem, dir);
    if manifests.is_empty() {
        return Err(OpsError::ManifestNotFound {
            ecosystem: ecosystem.to_string(),
            path: dir.display().to_string(),
        }
        .into());
    }
    info!(%ecosystem, project = %dir.display(), modules = manifests.len(), "auditing project");

    let mut results = Vec::with_capacity(manifests.len());
    for path in manifests {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::io_with_path(&e, &path))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let module = module_name(dir, &path);

        debug!(%module, manifest = %path.display(), "scanning module");
        let request = GraphScanRequest::module(
            ecosystem,
            &module,
            Manifest { file_name, content },
            options.include_licenses,
        );
        let mut response = xscan_net::scan_graph(&ctx.net, &ctx.connection, &request).await?;
        if !options.include_licenses {
            response.licenses.clear();
        }
        results.push(response);
    }

    Ok(results)
}

/// Manifest files of `ecosystem` below `dir`, sorted by path
#[must_use]
pub fn find_manifests(ecosystem: Ecosystem, dir: &Path) -> Vec<PathBuf> {
    let names = ecosystem.manifest_names();

    if !ecosystem.is_multi_module() {
        return names
            .iter()
            .map(|name| dir.join(name))
            .filter(|path| path.is_file())
            .collect();
    }

    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            names.contains(&name.as_ref())
        })
        .map(DirEntry::into_path)
        .collect();

    found.sort();
    // A module with both Groovy and Kotlin build scripts is scanned once
    found.dedup_by(|a, b| a.parent() == b.parent());
    found
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && SKIPPED_DIRS.contains(&entry.file_name().to_string_lossy().as_ref())
}

// Module path relative to the project root, or the root's own name
fn module_name(root: &Path, manifest: &Path) -> String {
    let module_dir = manifest.parent().unwrap_or(root);
    match module_dir.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        _ => root
            .canonicalize()
            .ok()
            .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "root".to_string()),
    }
}
