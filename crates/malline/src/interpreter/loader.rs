//! Template sources: loading raw template text by name.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::Error;

/// Resolves template names to their source text.
pub trait Loader: Debug + Send + Sync {
    /// Load the template called `name`.
    ///
    /// Fails with [`Error::NotFound`] when this loader has no such template.
    fn load(&self, name: &str) -> Result<String, Error>;

    /// Load the first of `names` that exists, returning its name and source.
    ///
    /// Only [`Error::NotFound`] moves on to the next candidate; any other
    /// error is returned immediately.
    fn load_first(&self, names: &[String]) -> Result<(String, String), Error> {
        for name in names {
            match self.load(name) {
                Ok(source) => return Ok((name.clone(), source)),
                Err(error) if error.is_not_found() => {}
                Err(error) => return Err(error),
            }
        }
        Err(Error::NotFound {
            names: names.to_vec(),
            loader: Some(format!("{self:?}")),
        })
    }
}

/// Loads templates from files under one or more base directories.
///
/// Names are joined onto each base path in turn and normalized lexically;
/// a name that is absolute or climbs above its base path with `..` fails
/// with [`Error::SuspiciousPath`] instead of being read.
///
/// ```
/// use malline::{FileSystemLoader, Loader};
///
/// let loader = FileSystemLoader::new(["templates"]);
/// let error = loader.load("../secret.html").unwrap_err();
/// assert!(error.is_security());
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    paths: Vec<PathBuf>,
}

impl FileSystemLoader {
    /// Create a loader searching `paths` in order.
    pub fn new<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// The base directories, in search order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Read `name` under `base`, or `None` if no such file exists.
    fn read(&self, base: &Path, name: &str) -> Result<Option<String>, Error> {
        let path = safe_join(base, name)?;
        if !path.is_file() {
            return Ok(None);
        }
        debug!(path = %path.display(), "reading template file");
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| Error::Io { path, source })
    }

    fn not_found(&self, names: &[String]) -> Error {
        Error::NotFound {
            names: names.to_vec(),
            loader: Some(format!("{self:?}")),
        }
    }
}

impl Loader for FileSystemLoader {
    fn load(&self, name: &str) -> Result<String, Error> {
        for base in &self.paths {
            if let Some(source) = self.read(base, name)? {
                return Ok(source);
            }
        }
        Err(self.not_found(&[name.to_string()]))
    }

    fn load_first(&self, names: &[String]) -> Result<(String, String), Error> {
        for base in &self.paths {
            for name in names {
                if let Some(source) = self.read(base, name)? {
                    return Ok((name.clone(), source));
                }
            }
        }
        Err(self.not_found(names))
    }
}

/// Join `name` onto `base`, refusing results outside `base`.
fn safe_join(base: &Path, name: &str) -> Result<PathBuf, Error> {
    let suspicious = || Error::SuspiciousPath {
        base: base.to_path_buf(),
        path: base.join(name),
    };

    let mut joined = base.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => {
                joined.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(suspicious());
                }
                joined.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return Err(suspicious()),
        }
    }
    Ok(joined)
}

/// Serves templates from an in-memory name to source map.
///
/// ```
/// use malline::{Loader, MemoryLoader};
///
/// let loader = MemoryLoader::new().with("greeting.html", "Hello {{ name }}");
/// assert_eq!(loader.load("greeting.html").unwrap(), "Hello {{ name }}");
/// assert!(loader.load("missing.html").unwrap_err().is_not_found());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    templates: BTreeMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, builder style.
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    /// Add or replace a template.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryLoader {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            templates: iter
                .into_iter()
                .map(|(name, source)| (name.into(), source.into()))
                .collect(),
        }
    }
}

impl Loader for MemoryLoader {
    fn load(&self, name: &str) -> Result<String, Error> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                names: vec![name.to_string()],
                loader: Some("MemoryLoader".to_string()),
            })
    }
}
