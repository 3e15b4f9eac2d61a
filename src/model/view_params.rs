use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PinsError;

/// Coarse content category derived from a MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    Image,
    Video,
    Document,
    Other,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Image => "image",
            Bucket::Video => "video",
            Bucket::Document => "document",
            Bucket::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    #[default]
    All,
    Images,
    Videos,
    Documents,
    Other,
}

impl FilterType {
    pub fn admits(self, bucket: Bucket) -> bool {
        match self {
            FilterType::All => true,
            FilterType::Images => bucket == Bucket::Image,
            FilterType::Videos => bucket == Bucket::Video,
            FilterType::Documents => bucket == Bucket::Document,
            FilterType::Other => bucket == Bucket::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::All => "all",
            FilterType::Images => "images",
            FilterType::Videos => "videos",
            FilterType::Documents => "documents",
            FilterType::Other => "other",
        }
    }
}

impl FromStr for FilterType {
    type Err = PinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterType::All),
            "images" | "image" => Ok(FilterType::Images),
            "videos" | "video" => Ok(FilterType::Videos),
            "documents" | "document" | "docs" => Ok(FilterType::Documents),
            "other" => Ok(FilterType::Other),
            other => Err(PinsError::validation(format!(
                "unknown filter `{}` (expected all, images, videos, documents, other)",
                other
            ))),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Largest,
    Smallest,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Largest => "largest",
            SortKey::Smallest => "smallest",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
        }
    }
}

impl FromStr for SortKey {
    type Err = PinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "largest" => Ok(SortKey::Largest),
            "smallest" => Ok(SortKey::Smallest),
            "name-asc" | "name-az" => Ok(SortKey::NameAsc),
            "name-desc" | "name-za" => Ok(SortKey::NameDesc),
            other => Err(PinsError::validation(format!(
                "unknown sort `{}` (expected newest, oldest, largest, smallest, name-asc, name-desc)",
                other
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

impl FromStr for ViewMode {
    type Err = PinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(PinsError::validation(format!(
                "unknown view `{}` (expected grid or list)",
                other
            ))),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
