//! Classified page regions as delivered by upstream layout analysis.

use serde::{Deserialize, Deserializer, Serialize};

/// Region classification. Anything the classifier emits that is not listed
/// here deserializes as `Unknown` and is treated as body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Paragraph,
    Title,
    SectionHeader,
    ListItem,
    Table,
    Figure,
    Header,
    Footer,
    Unknown,
}

impl RegionKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "paragraph" | "text" => Self::Paragraph,
            "title" => Self::Title,
            "section_header" | "section-header" => Self::SectionHeader,
            "list_item" | "list-item" | "list" => Self::ListItem,
            "table" => Self::Table,
            "figure" => Self::Figure,
            "header" => Self::Header,
            "footer" => Self::Footer,
            _ => Self::Unknown,
        }
    }

    /// Title or section header.
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Title | Self::SectionHeader)
    }

    /// Running page furniture, excluded from fixed-size packing.
    pub fn is_page_furniture(&self) -> bool {
        matches!(self, Self::Header | Self::Footer)
    }
}

impl<'de> Deserialize<'de> for RegionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub kind: RegionKind,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub bounds: BoundingBox,
    /// Reading-order rank within the page
    #[serde(default)]
    pub sequence_position: u32,
}

fn default_confidence() -> f32 {
    1.0
}

impl Region {
    pub fn new(kind: RegionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            confidence: default_confidence(),
            bounds: BoundingBox::default(),
            sequence_position: 0,
        }
    }

    /// A region with no text at all (e.g. a pure image).
    pub fn without_text(kind: RegionKind) -> Self {
        Self {
            kind,
            text: None,
            confidence: default_confidence(),
            bounds: BoundingBox::default(),
            sequence_position: 0,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn at_position(mut self, sequence_position: u32) -> Self {
        self.sequence_position = sequence_position;
        self
    }

    /// Raw text, empty when absent.
    pub fn raw_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn trimmed_text(&self) -> &str {
        self.raw_text().trim()
    }

    pub fn has_text(&self) -> bool {
        !self.trimmed_text().is_empty()
    }
}
