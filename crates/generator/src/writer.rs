//! Writing a report's files to disk

use crate::report::CompileReport;
use collection_generator_common::{GeneratorError, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// What a write pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Files created or whose content changed
    pub written: Vec<PathBuf>,
    /// Files already up to date
    pub unchanged: usize,
    /// Stale module files removed
    pub pruned: Vec<PathBuf>,
}

/// Write every emitted file under `out_dir`
///
/// Files whose content is already current are left untouched. With `prune`,
/// `.py` and `.json` files in the vendor/app module directory that this run
/// did not emit are deleted; pruning is skipped when the report has errors,
/// since a failed operation would otherwise lose its previous module.
pub fn write_report(report: &CompileReport, out_dir: &Path, prune: bool) -> Result<WriteSummary> {
    if report.is_fatal() {
        return Err(GeneratorError::Generation(format!(
            "Refusing to write output of failed compilation for {}/{}",
            report.vendor, report.app
        )));
    }

    let mut summary = WriteSummary::default();
    let mut emitted = BTreeSet::new();

    for file in report.files() {
        let target = out_dir.join(&file.path);
        emitted.insert(target.clone());

        if fs::read_to_string(&target).is_ok_and(|current| current == file.content) {
            summary.unchanged += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GeneratorError::Generation(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        fs::write(&target, &file.content).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", target.display(), e))
        })?;
        debug!(path = %target.display(), "wrote file");
        summary.written.push(target);
    }

    if prune && report.is_success() {
        summary.pruned = prune_stale(&out_dir.join(report.module_dir()), &emitted)?;
    }

    info!(
        written = summary.written.len(),
        unchanged = summary.unchanged,
        pruned = summary.pruned.len(),
        "wrote report"
    );
    Ok(summary)
}

fn prune_stale(module_dir: &Path, emitted: &BTreeSet<PathBuf>) -> Result<Vec<PathBuf>> {
    if !module_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut pruned = Vec::new();
    for entry in WalkDir::new(module_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            GeneratorError::Generation(format!("Failed to scan {}: {}", module_dir.display(), e))
        })?;
        let path = entry.path();

        let is_module_file = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("py") | Some("json")
        );
        if !entry.file_type().is_file() || !is_module_file || emitted.contains(path) {
            continue;
        }

        fs::remove_file(path).map_err(|e| {
            GeneratorError::Generation(format!("Failed to remove {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "pruned stale file");
        pruned.push(path.to_path_buf());
    }

    pruned.sort();
    Ok(pruned)
}
