//! Per-file rewriting and directory orchestration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::output;

use super::cluster::decompose_cluster;
use super::is_cluster_kind;
use super::scanner::scan_block;
use super::types::{OwnershipIndex, ProducedResource};

/// Rewrites every `.tf` file in one directory.
pub struct DirectoryRewriter {
    source_dir: PathBuf,
    suffix: String,
    declaration_pattern: Regex,
}

impl DirectoryRewriter {
    pub fn new(source_dir: &Path, suffix: &str) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            suffix: suffix.to_string(),
            // Matches `resource "<kind>" …` declaration lines; single-quoted
            // kinds are tolerated the same way quoted values are.
            declaration_pattern: Regex::new(r#"^\s*resource\s+["']([^"']+)["']"#)
                .expect("Invalid declaration pattern regex"),
        }
    }

    /// Process every file independently and return the aggregated registry of
    /// produced resources. A failing file is reported and skipped; it never
    /// aborts the batch.
    pub fn run(&self) -> Result<Vec<ProducedResource>> {
        let mut ownership = OwnershipIndex::new();
        let mut produced = Vec::new();

        for path in self.find_tf_files()? {
            match self.rewrite_file(&path, &mut ownership) {
                Ok(resources) => produced.extend(resources),
                Err(err) => {
                    output::error(&format!(
                        "Failed to process file {}: {:#}",
                        path.display(),
                        err
                    ));
                }
            }
        }

        Ok(produced)
    }

    /// Find all `.tf` files in the source directory, non-recursively.
    fn find_tf_files(&self) -> Result<Vec<PathBuf>> {
        let mut tf_files = Vec::new();

        for entry in fs::read_dir(&self.source_dir)
            .with_context(|| format!("Failed to read directory: {}", self.source_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();

            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == "tf"
            {
                tf_files.push(path);
            }
        }

        tf_files.sort();

        Ok(tf_files)
    }

    /// Rewrite one file. No output file is written when nothing was
    /// extracted, so an already-decomposed file is a no-op.
    fn rewrite_file(
        &self,
        path: &Path,
        ownership: &mut OwnershipIndex,
    ) -> Result<Vec<ProducedResource>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
        let (rewritten, produced) = self.rewrite_lines(&lines, ownership)?;

        if produced.is_empty() {
            return Ok(produced);
        }

        let dest = self.destination_for(path);
        fs::write(&dest, rewritten.join("\n") + "\n")
            .with_context(|| format!("Failed to write {}", dest.display()))?;

        output::success_with_details(
            &format!("Rewrote {}", path.display()),
            &format!("→ {}", dest.display()),
        );

        Ok(produced)
    }

    /// Core text transform: decompose recognized clusters, pass everything
    /// else through, then normalize blank lines.
    fn rewrite_lines(
        &self,
        lines: &[String],
        ownership: &mut OwnershipIndex,
    ) -> Result<(Vec<String>, Vec<ProducedResource>)> {
        let mut out = Vec::new();
        let mut produced = Vec::new();

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];

            if self.is_cluster_declaration(line) {
                let (block, end) = scan_block(lines, i)?;
                let decomposition = decompose_cluster(&block, ownership)?;
                out.extend(decomposition.lines);
                produced.extend(decomposition.produced);
                i = end + 1;
            } else {
                out.push(line.clone());
                i += 1;
            }
        }

        Ok((collapse_blank_lines(out), produced))
    }

    fn is_cluster_declaration(&self, line: &str) -> bool {
        self.declaration_pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .is_some_and(|kind| is_cluster_kind(kind.as_str()))
    }

    fn destination_for(&self, path: &Path) -> PathBuf {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        self.source_dir
            .join(format!("{}{}.tf", stem, self.suffix))
    }
}

/// Right-trim every line and collapse runs of 2+ blank lines down to one.
fn collapse_blank_lines(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut prev_blank = false;

    for line in lines {
        let line = line.trim_end().to_string();
        let blank = line.is_empty();

        if blank && prev_blank {
            continue;
        }
        prev_blank = blank;

        out.push(line);
    }

    out
}
