use crate::config::Config;
use ignore::WalkBuilder;
use miette::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Serialization format of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Format of a `*.snapshot.json|yaml|yml` file, `None` for anything else
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let (stem, extension) = file_name.rsplit_once('.')?;
        if !stem.ends_with(".snapshot") {
            return None;
        }
        match extension {
            "json" => Some(SnapshotFormat::Json),
            "yaml" | "yml" => Some(SnapshotFormat::Yaml),
            _ => None,
        }
    }

    /// Format implied by any extension, for snapshots named on the command line
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(SnapshotFormat::Json),
            "yaml" | "yml" => Some(SnapshotFormat::Yaml),
            _ => None,
        }
    }
}

/// A discovered snapshot file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub format: SnapshotFormat,
}

impl SnapshotFile {
    pub fn new(path: PathBuf, format: SnapshotFormat) -> Self {
        Self { path, format }
    }
}

/// Finds snapshot files under a project
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Every snapshot under `root` (or under the configured targets), sorted by path
    pub fn find_files(&self, root: &Path) -> Result<Vec<SnapshotFile>> {
        if root.is_file() {
            let format = SnapshotFormat::from_extension(root).ok_or_else(|| {
                miette::miette!(
                    "{} is not a snapshot (expected .json, .yaml or .yml)",
                    root.display()
                )
            })?;
            return Ok(vec![SnapshotFile::new(root.to_path_buf(), format)]);
        }

        debug!("Scanning for snapshots in: {}", root.display());

        let targets = if self.config.targets.is_empty() {
            vec![root.to_path_buf()]
        } else {
            self.config
                .targets
                .iter()
                .map(|t| root.join(t))
                .collect()
        };

        let mut files: Vec<SnapshotFile> = targets
            .par_iter()
            .flat_map(|target| self.scan_directory(target))
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        debug!("Found {} snapshots", files.len());
        Ok(files)
    }

    fn scan_directory(&self, dir: &Path) -> Vec<SnapshotFile> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }

        let walker = WalkBuilder::new(dir)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .follow_links(false)
            .build();

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();
                let format = SnapshotFormat::from_path(path)?;

                if self.config.should_exclude(path) {
                    trace!("Excluding: {}", path.display());
                    return None;
                }

                trace!("Found {:?} snapshot: {}", format, path.display());
                Some(SnapshotFile::new(path.to_path_buf(), format))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_format_from_path() {
        assert_eq!(
            SnapshotFormat::from_path(Path::new("src/widget.ts.snapshot.json")),
            Some(SnapshotFormat::Json)
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("widget.snapshot.yml")),
            Some(SnapshotFormat::Yaml)
        );
        assert_eq!(SnapshotFormat::from_path(Path::new("package.json")), None);
        assert_eq!(SnapshotFormat::from_path(Path::new("widget.ts")), None);
    }

    #[test]
    fn test_find_files_respects_exclude() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let vendored = dir.path().join("node_modules").join("lib");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&vendored).unwrap();
        std::fs::write(src.join("b.snapshot.json"), "{}").unwrap();
        std::fs::write(src.join("a.snapshot.yaml"), "{}").unwrap();
        std::fs::write(src.join("notes.json"), "{}").unwrap();
        std::fs::write(vendored.join("c.snapshot.json"), "{}").unwrap();

        let config = Config::default();
        let files = FileFinder::new(&config).find_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.snapshot.yaml", "b.snapshot.json"]);
    }

    #[test]
    fn test_single_file_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unit.json");
        std::fs::write(&path, "{}").unwrap();

        let config = Config::default();
        let files = FileFinder::new(&config).find_files(&path).unwrap();
        assert_eq!(files, vec![SnapshotFile::new(path, SnapshotFormat::Json)]);
    }
}
