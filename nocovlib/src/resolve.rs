//! Mapping profile file names to files on disk.
//!
//! Coverage profiles name files by import path
//! (`example.com/project/pkg/file.go`). Two layouts are supported:
//!
//! - **GOPATH**: the file lives at `$GOPATH/src/<import path>`
//! - **Go module**: the file lives below the directory holding `go.mod`,
//!   at the import path minus the module path

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::NocovError;
use crate::Result;

/// Finds the source file behind a profile's logical file name.
pub trait PathResolver {
    fn resolve(&self, file_name: &str) -> Result<PathBuf>;
}

/// Absolute paths that exist are taken as they are.
fn existing_absolute(file_name: &str) -> Option<PathBuf> {
    let path = Path::new(file_name);
    (path.is_absolute() && path.is_file()).then(|| path.to_path_buf())
}

/// Resolves import paths against one or more GOPATH entries.
#[derive(Debug, Clone)]
pub struct GopathResolver {
    roots: Vec<PathBuf>,
}

impl GopathResolver {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Use `$GOPATH`, falling back to `$HOME/go` like the go tool does.
    pub fn from_env() -> Self {
        let roots: Vec<PathBuf> = std::env::var_os("GOPATH")
            .map(|value| {
                std::env::split_paths(&value)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if !roots.is_empty() {
            return Self::new(roots);
        }

        let fallback = std::env::var_os("HOME")
            .map(|home| vec![PathBuf::from(home).join("go")])
            .unwrap_or_default();
        Self::new(fallback)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl PathResolver for GopathResolver {
    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        if let Some(path) = existing_absolute(file_name) {
            return Ok(path);
        }

        if self.roots.is_empty() {
            return Err(NocovError::PathResolution {
                file: file_name.to_string(),
                message: "GOPATH is not set".to_string(),
            });
        }

        self.roots
            .iter()
            .map(|root| root.join("src").join(file_name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| NocovError::PathResolution {
                file: file_name.to_string(),
                message: format!(
                    "not found under GOPATH {}",
                    std::env::join_paths(&self.roots)
                        .map(|p| p.to_string_lossy().into_owned())
                        .unwrap_or_default()
                ),
            })
    }
}

/// Resolves import paths inside a single Go module.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    /// Directory containing `go.mod`
    pub root: PathBuf,
    /// Module path declared in `go.mod`
    pub module: String,
}

impl ModuleResolver {
    pub fn new(root: impl Into<PathBuf>, module: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            module: module.into(),
        }
    }

    /// Find the module containing `path` by searching upwards for `go.mod`.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(NocovError::ModuleNotFound(path.to_path_buf()));
        }
        let start = fs::canonicalize(path)?;

        for dir in start.ancestors() {
            let go_mod = dir.join("go.mod");
            if !go_mod.is_file() {
                continue;
            }

            let content = fs::read_to_string(&go_mod).map_err(|e| NocovError::FileRead {
                path: go_mod.clone(),
                source: e,
            })?;
            let module = parse_module_path(&content).ok_or_else(|| NocovError::SourceParse {
                path: go_mod.clone(),
                message: "no module directive".to_string(),
            })?;

            log::debug!("using module {} rooted at {}", module, dir.display());
            return Ok(Self::new(dir, module));
        }

        Err(NocovError::ModuleNotFound(path.to_path_buf()))
    }
}

impl PathResolver for ModuleResolver {
    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        if let Some(path) = existing_absolute(file_name) {
            return Ok(path);
        }

        let relative = file_name
            .strip_prefix(self.module.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| NocovError::PathResolution {
                file: file_name.to_string(),
                message: format!("not part of module {}", self.module),
            })?;

        let path = self.root.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(NocovError::PathResolution {
                file: file_name.to_string(),
                message: format!("{} does not exist", path.display()),
            })
        }
    }
}

/// Extract the module path from `go.mod` content.
pub fn parse_module_path(go_mod: &str) -> Option<String> {
    for line in go_mod.lines() {
        let line = match line.find("//") {
            Some(index) => &line[..index],
            None => line,
        };
        let Some(rest) = line.trim().strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_whitespace() || c == '"' || c == '`') {
            continue;
        }
        let module = rest.trim().trim_matches(|c| c == '"' || c == '`');
        if !module.is_empty() {
            return Some(module.to_string());
        }
    }
    None
}
