use anyhow::{Result, bail};
use std::collections::HashMap;

use super::{Region, SourceLocation};

/// Maps region names to source locations (paths or URLs).
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "/data/divvy_2017.csv.gz",
///   "washington": "https://example.com/capital_bikeshare.csv"
/// }
/// ```
#[derive(Debug, Default)]
pub struct SourceConfig {
    entries: HashMap<Region, SourceLocation>,
}

impl SourceConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses the JSON object form. Keys must name known regions, each at
    /// most once across its aliases.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(content)?;

        let mut entries = HashMap::new();
        for (name, location) in raw {
            let region: Region = match name.parse() {
                Ok(region) => region,
                Err(e) => bail!("invalid source config key: {e}"),
            };
            if entries.insert(region, SourceLocation::parse(&location)).is_some() {
                bail!("duplicate source config entry for {region}");
            }
        }

        Ok(Self { entries })
    }

    /// Returns the configured location for `region`, if any.
    pub fn get(&self, region: Region) -> Option<&SourceLocation> {
        self.entries.get(&region)
    }
}
