//! Region sources.
//!
//! [`Region`] is the closed set of datasets the tool knows about.
//! [`SourceRegistry`] resolves a region into a [`SourceHandle`], which can be
//! opened as a byte stream regardless of whether it lives on disk or behind a URL.
//! [`SourceConfig`] holds per-region location overrides read from JSON.

mod config;
mod fetch;
mod registry;

pub use config::SourceConfig;
pub use fetch::fetch_bytes;
pub use registry::SourceRegistry;

use flate2::read::GzDecoder;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{SelectionError, SourceError};

/// One of the fixed set of trip datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Region {
    #[serde(rename = "chicago")]
    Chicago,
    #[serde(rename = "new york city")]
    NewYorkCity,
    #[serde(rename = "washington")]
    Washington,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Chicago, Region::NewYorkCity, Region::Washington];

    pub fn name(self) -> &'static str {
        match self {
            Region::Chicago => "chicago",
            Region::NewYorkCity => "new york city",
            Region::Washington => "washington",
        }
    }

    /// File name used when no override is configured.
    pub fn default_file(self) -> &'static str {
        match self {
            Region::Chicago => "chicago.csv",
            Region::NewYorkCity => "new_york_city.csv",
            Region::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chicago" => Ok(Region::Chicago),
            "new york city" | "new_york_city" | "nyc" => Ok(Region::NewYorkCity),
            "washington" => Ok(Region::Washington),
            other => Err(SelectionError::UnknownRegion(other.to_string())),
        }
    }
}

/// Where a region's rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    File(PathBuf),
    Url(String),
}

impl SourceLocation {
    /// Interprets anything starting with `http` as a URL, everything else as a path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            SourceLocation::Url(raw.to_string())
        } else {
            SourceLocation::File(PathBuf::from(raw))
        }
    }

    fn is_gzip(&self) -> bool {
        match self {
            SourceLocation::File(path) => path.extension().is_some_and(|e| e == "gz"),
            SourceLocation::Url(url) => url.ends_with(".gz"),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::File(path) => write!(f, "{}", path.display()),
            SourceLocation::Url(url) => f.write_str(url),
        }
    }
}

/// A resolved, not yet opened, region source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHandle {
    pub region: Region,
    pub location: SourceLocation,
}

impl SourceHandle {
    /// Opens the source as a readable stream, transparently un-gzipping `.gz` locations.
    pub fn open(&self) -> Result<Box<dyn Read>, SourceError> {
        let raw: Box<dyn Read> = match &self.location {
            SourceLocation::File(path) => Box::new(BufReader::new(File::open(path)?)),
            SourceLocation::Url(url) => Box::new(Cursor::new(fetch_bytes(url)?)),
        };

        if self.location.is_gzip() {
            Ok(Box::new(GzDecoder::new(raw)))
        } else {
            Ok(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_region_parse_aliases() {
        assert_eq!("Chicago".parse::<Region>().unwrap(), Region::Chicago);
        assert_eq!(" New York City ".parse::<Region>().unwrap(), Region::NewYorkCity);
        assert_eq!("nyc".parse::<Region>().unwrap(), Region::NewYorkCity);
        assert_eq!("WASHINGTON".parse::<Region>().unwrap(), Region::Washington);
    }

    #[test]
    fn test_region_parse_unknown() {
        let err = "boston".parse::<Region>().unwrap_err();
        assert_eq!(err, SelectionError::UnknownRegion("boston".to_string()));
    }

    #[test]
    fn test_location_parse() {
        assert_eq!(
            SourceLocation::parse("https://example.com/chicago.csv"),
            SourceLocation::Url("https://example.com/chicago.csv".to_string())
        );
        assert_eq!(
            SourceLocation::parse("data/chicago.csv"),
            SourceLocation::File(PathBuf::from("data/chicago.csv"))
        );
    }

    #[test]
    fn test_open_missing_file_fails() {
        let handle = SourceHandle {
            region: Region::Chicago,
            location: SourceLocation::File(PathBuf::from("/definitely/not/here.csv")),
        };
        assert!(handle.open().is_err());
    }

    #[test]
    fn test_open_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chicago.csv.gz");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"a,b\n1,2\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let handle = SourceHandle {
            region: Region::Chicago,
            location: SourceLocation::File(path),
        };
        let mut content = String::new();
        handle.open().unwrap().read_to_string(&mut content).unwrap();

        assert_eq!(content, "a,b\n1,2\n");
    }
}
