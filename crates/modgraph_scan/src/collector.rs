use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, trace};
use modgraph_core::SOURCE_EXTENSIONS;
use std::path::{Path, PathBuf};

/// Source files under `root`, sorted by path.
///
/// Honours `.gitignore`/`.ignore`, skips `node_modules` and `.d.ts`
/// declaration files. With `entry_glob`, keeps only files whose
/// root-relative path contains the pattern.
pub fn collect_files(root: &Path, entry_glob: Option<&str>) -> Result<Vec<PathBuf>> {
    debug!("Walking directory tree from root: {}", root.display());
    let mut files: Vec<PathBuf> = Vec::new();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .filter_entry(|dent| dent.file_name() != "node_modules" && dent.file_name() != ".git")
        .build();

    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !dent.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path_str = p.to_string_lossy();
        if path_str.ends_with(".d.ts") || path_str.ends_with(".d.mts") || path_str.ends_with(".d.cts")
        {
            trace!("Skipping declaration file: {}", path_str);
            continue;
        }

        let Some(ext) = p.extension().and_then(|e| e.to_str()) else { continue };
        if !SOURCE_EXTENSIONS.contains(&ext) {
            continue;
        }

        if let Some(gl) = entry_glob {
            let rel_str = p.strip_prefix(root).unwrap_or(p).to_string_lossy();
            if !rel_str.contains(gl) {
                continue;
            }
            trace!("Matched file with glob '{}': {}", gl, rel_str);
        }

        files.push(p.to_path_buf());
    }

    files.sort();
    debug!("Collected {} source files", files.len());
    Ok(files)
}
