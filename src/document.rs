use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{PolysubError, Result};

/// Field every segment carries its source text in.
pub const SOURCE_FIELD: &str = "text";

const SEGMENTS_KEY: &str = "segments";

/// One ASR segment. Every field is kept as loaded; translation only adds fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Segment {
    fields: Map<String, Value>,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(SOURCE_FIELD.to_string(), Value::String(text.into()));
        Self { fields }
    }

    /// Original source text, never a translated field.
    pub fn source_text(&self) -> Result<&str> {
        match self.fields.get(SOURCE_FIELD) {
            Some(Value::String(text)) => Ok(text),
            Some(_) => Err(PolysubError::Segment(format!("'{}' is not a string", SOURCE_FIELD))),
            None => Err(PolysubError::Segment(format!("'{}' field missing", SOURCE_FIELD))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), Value::String(value.into()));
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Segment {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// A subtitle file: the ordered segment list plus any other top-level metadata.
///
/// `segments` is written back at the position it was read from, so the top-level key
/// order of a loaded file is unchanged on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub segments: Vec<Segment>,
    pub metadata: Map<String, Value>,
    segments_position: usize,
}

impl Document {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            metadata: Map::new(),
            segments_position: 0,
        }
    }

    /// Parse and validate subtitle JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;

        let Value::Object(mut root) = value else {
            return Err(PolysubError::InvalidDocument("top level must be an object".to_string()));
        };

        let segments_position = root.keys().position(|key| key == SEGMENTS_KEY).unwrap_or(0);
        let segments = match root.shift_remove(SEGMENTS_KEY) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(PolysubError::InvalidDocument("'segments' must be a list".to_string()));
            }
            None => {
                return Err(PolysubError::InvalidDocument("'segments' key not found".to_string()));
            }
        };

        let segments = segments
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(fields) => Ok(Segment::from(fields)),
                _ => Err(PolysubError::InvalidDocument(format!("segment {} is not an object", idx))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            segments,
            metadata: root,
            segments_position,
        })
    }

    /// Pretty JSON with two-space indentation; non-ASCII text is written as-is.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !tokio::fs::try_exists(path).await? {
            return Err(PolysubError::FileNotFound(path.display().to_string()));
        }

        let content = tokio::fs::read_to_string(path).await?;
        let document = Self::from_json(&content)?;

        info!("Loaded {} segments from {}", document.segments.len(), path.display());
        Ok(document)
    }

    /// Write the document, creating parent directories as needed.
    ///
    /// The file is written to a temporary sibling first and renamed into place.
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_json()?;

        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| PolysubError::Config(format!("Output path has no file name: {}", path.display())))?;
        let temp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

        tokio::fs::write(&temp_path, content.as_bytes()).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!("Wrote {} via {}", path.display(), temp_path.display());
        info!("Saved {} segments to {}", self.segments.len(), path.display());
        Ok(())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let position = self.segments_position.min(self.metadata.len());
        let mut map = serializer.serialize_map(Some(self.metadata.len() + 1))?;

        for (idx, (key, value)) in self.metadata.iter().enumerate() {
            if idx == position {
                map.serialize_entry(SEGMENTS_KEY, &self.segments)?;
            }
            map.serialize_entry(key, value)?;
        }
        if position == self.metadata.len() {
            map.serialize_entry(SEGMENTS_KEY, &self.segments)?;
        }

        map.end()
    }
}
