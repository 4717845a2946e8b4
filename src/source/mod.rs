/*!
# Fragment sources

Where per-package [`ComponentTree`] fragments come from. Fragments are the
output of the forward parser, one per configuration source, in precedence
order (later overrides earlier).

- [`MemorySource`]: fragments registered in code
- [`DirectorySource`]: one directory per package below the root, holding
  `.json`, `.yaml` and `.yml` files merged in lexical order of their paths
*/

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::ast::ComponentTree;
use crate::core::{read_data_file, DataFormat, LensError, LensResult};

/// Supplier of package fragments
pub trait FragmentSource: Send + Sync {
    /// Known package identifiers, sorted
    fn packages(&self) -> LensResult<Vec<String>>;

    /// Fragments of `package` in precedence order
    fn fragments(&self, package: &str) -> LensResult<Vec<ComponentTree>>;
}

/// In-memory fragments
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    packages: IndexMap<String, Vec<ComponentTree>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment to `package`
    pub fn add(&mut self, package: impl Into<String>, fragment: ComponentTree) -> &mut Self {
        self.packages.entry(package.into()).or_default().push(fragment);
        self
    }

    pub fn with_fragment(mut self, package: impl Into<String>, fragment: ComponentTree) -> Self {
        self.add(package, fragment);
        self
    }
}

impl FragmentSource for MemorySource {
    fn packages(&self) -> LensResult<Vec<String>> {
        let mut packages: Vec<String> = self.packages.keys().cloned().collect();
        packages.sort();
        Ok(packages)
    }

    fn fragments(&self, package: &str) -> LensResult<Vec<ComponentTree>> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| LensError::UnknownPackage(package.to_string()))
    }
}

/// Fragments stored as JSON/YAML files, one directory per package
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fragment files below `package_dir`; an unreadable entry is an error, never skipped
    fn fragment_files(&self, package_dir: &Path) -> LensResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(package_dir).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(package_dir).to_path_buf();
                LensError::Io {
                    path,
                    source: e.into(),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            if matches!(DataFormat::from_path(&path), Some(DataFormat::Json | DataFormat::Yaml)) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Package ids name a single directory directly below the root
fn is_package_name(package: &str) -> bool {
    !package.is_empty()
        && package != "."
        && package != ".."
        && !package.contains(['/', '\\'])
        && !Path::new(package).is_absolute()
}

impl FragmentSource for DirectorySource {
    fn packages(&self) -> LensResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| LensError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut packages: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect();
        packages.sort();
        Ok(packages)
    }

    fn fragments(&self, package: &str) -> LensResult<Vec<ComponentTree>> {
        if !is_package_name(package) {
            return Err(LensError::UnknownPackage(package.to_string()));
        }
        let package_dir = self.root.join(package);
        if !package_dir.is_dir() {
            return Err(LensError::UnknownPackage(package.to_string()));
        }

        let files = self.fragment_files(&package_dir)?;
        info!("Loading {} fragments for {}", files.len(), package);

        files
            .iter()
            .map(|path| {
                debug!("Reading fragment {}", path.display());
                let fragment: ComponentTree = read_data_file(path)?;
                Ok(fragment)
            })
            .collect()
    }
}
