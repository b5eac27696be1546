//! @ai:module:intent Scan a project tree and aggregate review markings per file and folder
//! @ai:module:layer application
//! @ai:module:public_api scan_project, ProjectNode, NodeKind, FileSummary, ProjectReport
//! @ai:module:depends_on document, config, annotation, error

use crate::annotation::Severity;
use crate::config::CodemarkConfig;
use crate::document::AnnotatedDocument;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Marking statistics for one document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileSummary {
    pub lines: usize,
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
    pub has_comments: bool,
}

impl FileSummary {
    pub fn from_document(doc: &AnnotatedDocument) -> Self {
        let [(_, green), (_, yellow), (_, red)] = doc.severity_counts();
        Self {
            lines: doc.line_count(),
            green,
            yellow,
            red,
            has_comments: doc.comments().is_some(),
        }
    }
}

/// @ai:intent Kind-specific payload of a tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    Folder { children: Vec<ProjectNode> },
    File { summary: FileSummary },
}

/// @ai:intent A file or folder in the scanned tree
/// @ai:invariant a folder's severities are the union of its children's
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectNode {
    pub name: String,
    pub path: PathBuf,
    pub severities: BTreeSet<Severity>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// @ai:intent Result of scanning a project directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectReport {
    pub root: ProjectNode,
    pub files_loaded: usize,
    /// Binary or oversized files.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<ScanFailure>,
}

/// @ai:intent A file that could not be loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub message: String,
}

impl ProjectNode {
    fn folder(path: &Path) -> Self {
        Self {
            name: node_name(path),
            path: path.to_path_buf(),
            severities: BTreeSet::new(),
            kind: NodeKind::Folder {
                children: Vec::new(),
            },
        }
    }

    /// @ai:intent Find the node for a root-relative path
    /// @ai:effects pure
    pub fn find(&self, relative: &Path) -> Option<&ProjectNode> {
        let mut node = self;
        for component in relative.components() {
            let name = component.as_os_str().to_string_lossy();
            node = match &node.kind {
                NodeKind::Folder { children } => children.iter().find(|c| c.name == name)?,
                NodeKind::File { .. } => return None,
            };
        }
        Some(node)
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Insert a file node below this folder, creating intermediate folders.
    fn insert(&mut self, components: &[String], file: ProjectNode) {
        let NodeKind::Folder { children } = &mut self.kind else {
            return;
        };

        match components {
            [] => children.push(file),
            [head, rest @ ..] => {
                let index = match children.iter().position(|c| &c.name == head && c.is_folder()) {
                    Some(index) => index,
                    None => {
                        children.push(ProjectNode::folder(&self.path.join(head)));
                        children.len() - 1
                    }
                };
                children[index].insert(rest, file);
            }
        }
    }

    /// Recompute folder severities bottom-up and drop empty folders.
    fn aggregate(&mut self) {
        if let NodeKind::Folder { children } = &mut self.kind {
            for child in children.iter_mut() {
                child.aggregate();
            }
            children.retain(|c| !c.is_folder() || !c.severities.is_empty());
            self.severities = children
                .iter()
                .flat_map(|c| c.severities.iter().copied())
                .collect();
        }
    }
}

fn node_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// @ai:intent Load every text file below root and build the marking tree
/// @ai:post binary and oversized files are listed as skipped, unreadable ones as failures
/// @ai:effects fs:read
pub fn scan_project(root: &Path, config: &CodemarkConfig) -> Result<ProjectReport> {
    let excludes = config.exclude_set()?;
    let mut tree = ProjectNode::folder(root);
    let mut files_loaded = 0;
    let mut skipped = Vec::new();
    let mut failures = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let relative = e.path().strip_prefix(root).unwrap_or(e.path());
            relative.as_os_str().is_empty() || !excludes.is_excluded(relative)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if let (Some(limit), Ok(meta)) = (config.max_file_size, entry.metadata()) {
            if meta.len() > limit {
                tracing::debug!("Skipping oversized file {}", path.display());
                skipped.push(path.to_path_buf());
                continue;
            }
        }

        let doc = match AnnotatedDocument::load(path) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                skipped.push(path.to_path_buf());
                continue;
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                failures.push(ScanFailure {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let relative = path.strip_prefix(root).unwrap_or(path);
        let folders: Vec<String> = relative
            .parent()
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        tree.insert(
            &folders,
            ProjectNode {
                name: node_name(path),
                path: path.to_path_buf(),
                severities: doc.distinct_severities(),
                kind: NodeKind::File {
                    summary: FileSummary::from_document(&doc),
                },
            },
        );
        files_loaded += 1;
    }

    tree.aggregate();
    tracing::debug!(
        "Scanned {}: {} documents, {} skipped, {} failed",
        root.display(),
        files_loaded,
        skipped.len(),
        failures.len()
    );

    Ok(ProjectReport {
        root: tree,
        files_loaded,
        skipped,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/util")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("src/main.rs"), ">>>>>CM:GREEN\nfn main() {}\n").unwrap();
        fs::write(root.join("src/util/a.rs"), ">>>>>CM:YELLOW\nfn a() {}\nfn b() {}\n").unwrap();
        fs::write(root.join("logo.png"), [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();
        fs::write(root.join("bad.rs"), ">>>>>CM:BLUE\nx\n").unwrap();
        fs::write(root.join("target/out.rs"), "generated\n").unwrap();
        dir
    }

    #[test]
    fn test_scan_aggregates_folders() {
        let dir = project();
        let report = scan_project(dir.path(), &CodemarkConfig::default()).unwrap();

        assert_eq!(report.files_loaded, 2);
        assert_eq!(
            report.root.severities,
            BTreeSet::from([Severity::Green, Severity::Yellow, Severity::Red])
        );

        let util = report.root.find(Path::new("src/util")).unwrap();
        assert!(util.is_folder());
        assert_eq!(
            util.severities,
            BTreeSet::from([Severity::Yellow, Severity::Red])
        );

        let main = report.root.find(Path::new("src/main.rs")).unwrap();
        assert_eq!(main.severities, BTreeSet::from([Severity::Green]));
        match &main.kind {
            NodeKind::File { summary } => {
                assert_eq!(summary.lines, 1);
                assert_eq!(summary.green, 1);
            }
            NodeKind::Folder { .. } => panic!("expected a file node"),
        }
    }

    #[test]
    fn test_scan_skips_binary_and_records_failures() {
        let dir = project();
        let report = scan_project(dir.path(), &CodemarkConfig::default()).unwrap();

        assert_eq!(report.skipped, vec![dir.path().join("logo.png")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, dir.path().join("bad.rs"));
        assert!(report.root.find(Path::new("target")).is_none());
    }

    #[test]
    fn test_oversized_files_are_skipped() {
        let dir = project();
        let config = CodemarkConfig {
            max_file_size: Some(12),
            ..Default::default()
        };
        let report = scan_project(dir.path(), &config).unwrap();
        assert!(report.skipped.contains(&dir.path().join("src/main.rs")));
    }
}
