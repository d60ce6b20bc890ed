//! Host project access: catalog and config loading, project metadata, data
//! file discovery.

use crate::error::{CliError, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use xamlgen_codegen::providers::data_file_candidates;
use xamlgen_codegen::{DataFileLocator, ProjectMetadata};

/// Read and deserialize a JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// First `.csproj` in the directory, by file name.
pub fn find_project_file(dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("csproj"))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Metadata for platform detection. A missing project file yields empty
/// metadata, which detection treats as unknown.
pub fn read_metadata(dir: &Path) -> Result<ProjectMetadata> {
    let Some(path) = find_project_file(dir) else {
        debug!(dir = %dir.display(), "no project file found");
        return Ok(ProjectMetadata::default());
    };
    let build_file = fs::read_to_string(&path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    debug!(project = %path.display(), "read project file");
    Ok(ProjectMetadata {
        type_guids: Vec::new(),
        build_file,
    })
}

/// Looks for data files under a project directory.
#[derive(Debug, Clone)]
pub struct FsDataFileLocator {
    root: PathBuf,
}

impl FsDataFileLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataFileLocator for FsDataFileLocator {
    fn find_data_file(&self, model_name: &str) -> Option<String> {
        data_file_candidates(model_name)
            .into_iter()
            .find(|candidate| self.root.join(candidate).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use xamlgen_codegen::{detect_platform, Platform};

    #[test]
    fn test_locator_first_match_wins() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Data")).unwrap();
        fs::write(dir.path().join("Data/Product.json"), "[]").unwrap();
        fs::write(dir.path().join("Products.json"), "[]").unwrap();

        let locator = FsDataFileLocator::new(dir.path());
        assert_eq!(locator.find_data_file("Product").as_deref(), Some("Products.json"));
        assert_eq!(locator.find_data_file("Order"), None);
    }

    #[test]
    fn test_metadata_from_project_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Shop.csproj"),
            "<Project Sdk=\"Microsoft.NET.Sdk\"><PropertyGroup><UseMaui>true</UseMaui></PropertyGroup></Project>",
        )
        .unwrap();

        let metadata = read_metadata(dir.path()).unwrap();
        assert_eq!(detect_platform(&metadata).0, Platform::Maui);
    }

    #[test]
    fn test_missing_project_file() {
        let dir = tempdir().unwrap();
        let metadata = read_metadata(dir.path()).unwrap();
        let (platform, diagnostic) = detect_platform(&metadata);
        assert_eq!(platform, Platform::Wpf);
        assert!(diagnostic.is_some());
    }

    #[test]
    fn test_load_json_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
