use std::path::{Path, PathBuf};

use super::{Region, SourceConfig, SourceHandle, SourceLocation};

/// Resolves regions to their source locations.
///
/// Configured overrides win; otherwise the region's default file name is
/// looked up under the data directory.
#[derive(Debug)]
pub struct SourceRegistry {
    data_dir: PathBuf,
    overrides: SourceConfig,
}

impl SourceRegistry {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: SourceConfig::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: SourceConfig) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn resolve(&self, region: Region) -> SourceHandle {
        let location = self
            .overrides
            .get(region)
            .cloned()
            .unwrap_or_else(|| SourceLocation::File(self.data_dir.join(region.default_file())));

        SourceHandle { region, location }
    }
}
