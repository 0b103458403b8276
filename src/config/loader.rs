use crate::analysis::PolicyConfiguration;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_NAMES: [&str; 6] = [
    ".overridelint.yml",
    ".overridelint.yaml",
    ".overridelint.toml",
    "overridelint.yml",
    "overridelint.yaml",
    "overridelint.toml",
];

/// Configuration for an overridelint run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories to search for snapshots, relative to the project root
    pub targets: Vec<PathBuf>,

    /// Path patterns to exclude from discovery
    pub exclude: Vec<String>,

    /// Which override declarations are required
    pub policy: PolicyConfiguration,

    pub report: ReportConfig,

    /// Class-name patterns that are never analysed (`*Generated`, `Legacy*`)
    pub skip_classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json, sarif
    pub format: String,

    /// Mark fixable findings in terminal output
    pub show_fix_hints: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![],
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/dist/**".to_string(),
                "**/build/**".to_string(),
            ],
            policy: PolicyConfiguration::default(),
            report: ReportConfig::default(),
            skip_classes: vec![],
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_fix_hints: true,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to parse YAML config {}", path.display())),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to parse TOML config {}", path.display())),
            _ => match serde_yaml::from_str(&contents) {
                Ok(config) => Ok(config),
                Err(_) => toml::from_str(&contents)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to parse config file {}", path.display())),
            },
        }
    }

    /// First config file found in `project_root`, or the defaults
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        for name in DEFAULT_NAMES {
            let path = project_root.join(name);
            if path.is_file() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.exclude
            .iter()
            .any(|pattern| path_glob_match(pattern, &path_str))
    }
}

/// `*` matches any run of characters, `?` exactly one
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Path patterns: `**/dir/**` matches a whole directory component anywhere,
/// `**/name` a trailing component, anything else a wildcard over the path
fn path_glob_match(pattern: &str, path: &str) -> bool {
    if let Some(inner) = pattern
        .strip_prefix("**/")
        .and_then(|rest| rest.strip_suffix("/**"))
    {
        return path
            .split('/')
            .any(|component| wildcard_match(inner, component));
    }

    if let Some(tail) = pattern.strip_prefix("**/") {
        return path
            .rsplit('/')
            .next()
            .map(|last| wildcard_match(tail, last))
            .unwrap_or(false)
            || wildcard_match(&format!("*/{}", tail), path);
    }

    wildcard_match(pattern, path)
}
