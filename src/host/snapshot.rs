// Analysis-unit snapshots written by the host toolchain

use crate::discovery::SnapshotFormat;
use crate::hierarchy::{TypeDeclaration, TypeGraph};
use crate::syntax::{ClassLikeDeclaration, SourceText, TextRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON snapshot {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML snapshot {path}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path} is not a .json, .yaml or .yml snapshot")]
    UnsupportedFormat { path: PathBuf },

    #[error("Snapshot for {file}: {reason}")]
    Invalid { file: PathBuf, reason: String },
}

/// One source file as the host saw it: its text, its classes, and the
/// static type information available for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisUnit {
    /// Source file the snapshot describes
    pub file: PathBuf,

    /// Full text of `file` at snapshot time
    pub source: String,

    #[serde(default)]
    pub classes: Vec<ClassLikeDeclaration>,

    /// `None` when the host could not compute type information
    #[serde(default)]
    pub types: Option<Vec<TypeDeclaration>>,

    /// Where the snapshot was loaded from
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl AnalysisUnit {
    pub fn new(file: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
            classes: Vec::new(),
            types: None,
            origin: None,
        }
    }

    pub fn with_class(mut self, class: ClassLikeDeclaration) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_types(mut self, types: Vec<TypeDeclaration>) -> Self {
        self.types = Some(types);
        self
    }

    /// Load and validate a snapshot; the format follows the extension
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let format = SnapshotFormat::from_extension(path).ok_or_else(|| {
            SnapshotError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
        })?;
        let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut unit = Self::parse(&contents, format, path)?;
        unit.origin = Some(path.to_path_buf());
        unit.validate()?;
        Ok(unit)
    }

    pub fn parse(contents: &str, format: SnapshotFormat, path: &Path) -> Result<Self, SnapshotError> {
        match format {
            SnapshotFormat::Json => {
                serde_json::from_str(contents).map_err(|source| SnapshotError::Json {
                    path: path.to_path_buf(),
                    source,
                })
            }
            SnapshotFormat::Yaml => {
                serde_yaml::from_str(contents).map_err(|source| SnapshotError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Every range must fall inside the source on character boundaries
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let check = |range: TextRange, what: &str| -> Result<(), SnapshotError> {
            if range.start > range.end
                || range.end > self.source.len()
                || !self.source.is_char_boundary(range.start)
                || !self.source.is_char_boundary(range.end)
            {
                return Err(SnapshotError::Invalid {
                    file: self.file.clone(),
                    reason: format!("{} range {} does not fit the source", what, range),
                });
            }
            Ok(())
        };

        for class in &self.classes {
            check(class.range, "class")?;
            for member in &class.members {
                check(member.range, "member")?;
                check(member.name_range, "member name")?;
                for comment in &member.leading_comments {
                    check(*comment, "comment")?;
                }
            }
        }
        Ok(())
    }

    /// The source file on disk; relative paths resolve against the snapshot's directory
    pub fn source_path(&self) -> PathBuf {
        if self.file.is_absolute() {
            return self.file.clone();
        }
        match self.origin.as_deref().and_then(Path::parent) {
            Some(dir) => dir.join(&self.file),
            None => self.file.clone(),
        }
    }

    pub fn source_text(&self) -> SourceText<'_> {
        SourceText::new(&self.source)
    }

    /// Type graph over the unit's types, if it has any type information
    pub fn type_graph(&self) -> Option<TypeGraph> {
        self.types
            .as_ref()
            .map(|types| TypeGraph::from_declarations(types.iter().cloned()))
    }

    pub fn member_count(&self) -> usize {
        self.classes.iter().map(|c| c.members.len()).sum()
    }
}
