use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level layout of the annotation JSON file.
#[derive(Debug, Deserialize)]
struct AnnotationFile {
    meta: Meta,
    annotation: BTreeMap<String, VideoRecord>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    class_num: usize,
}

/// Per-video metadata from the annotation file.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoRecord {
    /// Integer class label of the video.
    pub class: i64,
    /// Any additional per-video fields, kept as raw JSON.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug)]
pub enum AnnotationError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationError::Io(e) => write!(f, "failed to read annotation file: {}", e),
            AnnotationError::Json(e) => write!(f, "failed to parse annotation file: {}", e),
        }
    }
}

impl std::error::Error for AnnotationError {}

impl From<std::io::Error> for AnnotationError {
    fn from(e: std::io::Error) -> Self {
        AnnotationError::Io(e)
    }
}

impl From<serde_json::Error> for AnnotationError {
    fn from(e: serde_json::Error) -> Self {
        AnnotationError::Json(e)
    }
}

/// Annotation data loaded once when the dataset is opened.
///
/// The video identifiers are kept in sorted order so that integer indices
/// map to the same video across runs.
pub struct Annotations {
    class_num: usize,
    records: BTreeMap<String, VideoRecord>,
    videos: Vec<String>,
}

impl Annotations {
    /// Load and parse the annotation JSON at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AnnotationError> {
        let content = fs::read_to_string(path)?;
        let file: AnnotationFile = serde_json::from_str(&content)?;
        let videos = file.annotation.keys().cloned().collect();
        Ok(Self {
            class_num: file.meta.class_num,
            records: file.annotation,
            videos,
        })
    }

    /// Number of classes declared in `meta.class_num`.
    pub fn class_num(&self) -> usize {
        self.class_num
    }

    /// Sorted video identifiers.
    pub fn videos(&self) -> &[String] {
        &self.videos
    }

    /// Number of annotated videos.
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Record for the video at `index` in sorted-identifier order.
    pub fn get(&self, index: usize) -> Option<(&str, &VideoRecord)> {
        let video_id = self.videos.get(index)?;
        let record = self.records.get(video_id)?;
        Some((video_id, record))
    }

    /// Record for `video_id`, if annotated.
    pub fn record(&self, video_id: &str) -> Option<&VideoRecord> {
        self.records.get(video_id)
    }
}
