//! Core data types for the microstock metadata pipeline.
//!
//! These types carry an image from its analyzed labels to the final
//! title/description/keyword record handed to the exporter.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// One discrete color name assigned to an image.
///
/// The first twelve variants are real colors; the last four are sentinels used
/// when the primary signal is inconclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Cyan,
    Blue,
    Purple,
    Pink,
    Black,
    White,
    Gray,
    /// Too many distinct colors to name one
    Colorful,
    /// Dominated by black, white or gray
    Monochrome,
    /// Nothing bright and saturated enough to classify
    Dark,
    /// No confident signal at all
    Abstract,
}

impl ColorLabel {
    /// Lowercase label as it appears in text and keywords.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorLabel::Red => "red",
            ColorLabel::Orange => "orange",
            ColorLabel::Yellow => "yellow",
            ColorLabel::Green => "green",
            ColorLabel::Teal => "teal",
            ColorLabel::Cyan => "cyan",
            ColorLabel::Blue => "blue",
            ColorLabel::Purple => "purple",
            ColorLabel::Pink => "pink",
            ColorLabel::Black => "black",
            ColorLabel::White => "white",
            ColorLabel::Gray => "gray",
            ColorLabel::Colorful => "colorful",
            ColorLabel::Monochrome => "monochrome",
            ColorLabel::Dark => "dark",
            ColorLabel::Abstract => "abstract",
        }
    }

    /// Black, white and gray.
    pub fn is_achromatic(&self) -> bool {
        matches!(self, ColorLabel::Black | ColorLabel::White | ColorLabel::Gray)
    }

    /// Label with its first letter uppercased, for titles.
    pub fn capitalized(&self) -> String {
        capitalize(self.as_str())
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorLabel {
    type Err = String;

    /// Parse free text from a vision model. Accepts a handful of common
    /// synonyms; anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = match s.trim().to_lowercase().as_str() {
            "red" | "crimson" | "scarlet" => ColorLabel::Red,
            "orange" => ColorLabel::Orange,
            "yellow" | "gold" | "golden" => ColorLabel::Yellow,
            "green" | "lime" => ColorLabel::Green,
            "teal" | "turquoise" => ColorLabel::Teal,
            "cyan" | "aqua" => ColorLabel::Cyan,
            "blue" | "navy" | "azure" => ColorLabel::Blue,
            "purple" | "violet" => ColorLabel::Purple,
            "pink" | "magenta" => ColorLabel::Pink,
            "black" => ColorLabel::Black,
            "white" => ColorLabel::White,
            "gray" | "grey" => ColorLabel::Gray,
            "colorful" | "colourful" | "multicolor" | "multicolored" => ColorLabel::Colorful,
            "monochrome" => ColorLabel::Monochrome,
            "dark" => ColorLabel::Dark,
            "abstract" => ColorLabel::Abstract,
            other => return Err(format!("unknown color label: {other:?}")),
        };
        Ok(label)
    }
}

/// Canonical per-image record of color, shape, style and best-use signals.
///
/// Built by the descriptor merger; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    pub color: ColorLabel,
    pub secondary_colors: Vec<ColorLabel>,
    pub shapes: Vec<String>,
    pub styles: Vec<String>,
    pub best_use: Vec<String>,
}

impl Default for DescriptorSet {
    fn default() -> Self {
        Self {
            color: ColorLabel::Abstract,
            secondary_colors: vec![],
            shapes: vec![],
            styles: vec![],
            best_use: vec![],
        }
    }
}

/// Free-form descriptor returned by a vision model.
///
/// Only `main_color` is mandatory; the lists default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalDescriptor {
    pub main_color: String,
    #[serde(default)]
    pub secondary_colors: Vec<String>,
    #[serde(default)]
    pub shapes: Vec<String>,
    #[serde(default)]
    pub style: Vec<String>,
    #[serde(default)]
    pub mood: Vec<String>,
    #[serde(default)]
    pub best_use: Vec<String>,
}

/// Final synthesized metadata for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub title: String,

    /// Ordered alternatives; the first equals `title`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title_candidates: Vec<String>,

    pub description: String,

    /// Deduplicated (case-insensitive), capped keyword list
    pub keywords: Vec<String>,
}

/// One processed image in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRow {
    pub filename: String,
    #[serde(flatten)]
    pub record: MetadataRecord,
}

/// An image the batch could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub filename: String,
    /// Stable code such as `decode_failed` or `file_not_found`
    pub reason_code: String,
    pub message: String,
}

/// Processing statistics for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchStats {
    /// Images that produced a row
    pub succeeded: usize,

    /// Images recorded as skipped
    pub skipped: usize,

    /// Images whose descriptors came from local analysis only because the
    /// external source was configured but unavailable
    pub external_fallbacks: usize,

    /// Processing rate in images per second
    pub images_per_second: f64,

    /// Total processing time in seconds
    pub total_seconds: f64,
}

/// Everything a batch run produced, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
    pub skipped: Vec<SkippedRow>,
    pub stats: BatchStats,
}

/// Uppercase the first character of each whitespace-separated word.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim entries, drop empty ones and case-insensitive repeats, keeping the
/// first occurrence of each.
pub fn dedup_keep_first<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter_map(|item| {
            let trimmed = item.as_ref().trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_lowercase()) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_label_parse_synonyms() {
        assert_eq!("Grey".parse::<ColorLabel>().unwrap(), ColorLabel::Gray);
        assert_eq!(" navy ".parse::<ColorLabel>().unwrap(), ColorLabel::Blue);
        assert_eq!("violet".parse::<ColorLabel>().unwrap(), ColorLabel::Purple);
        assert!("chartreuse-ish".parse::<ColorLabel>().is_err());
        assert!("".parse::<ColorLabel>().is_err());
    }

    #[test]
    fn test_color_label_serde_lowercase() {
        let json = serde_json::to_string(&ColorLabel::Monochrome).unwrap();
        assert_eq!(json, "\"monochrome\"");
        let parsed: ColorLabel = serde_json::from_str("\"teal\"").unwrap();
        assert_eq!(parsed, ColorLabel::Teal);
    }

    #[test]
    fn test_achromatic() {
        assert!(ColorLabel::Gray.is_achromatic());
        assert!(!ColorLabel::Blue.is_achromatic());
        assert!(!ColorLabel::Dark.is_achromatic());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("smooth shapes"), "Smooth Shapes");
        assert_eq!(title_case("  mesh  "), "Mesh");
        assert_eq!(title_case(""), "");
        assert_eq!(ColorLabel::Blue.capitalized(), "Blue");
    }

    #[test]
    fn test_dedup_keep_first() {
        let out = dedup_keep_first(["Wave", "", "wave", " mesh ", "MESH", "lines"]);
        assert_eq!(out, vec!["Wave", "mesh", "lines"]);
    }

    #[test]
    fn test_external_descriptor_defaults_lists() {
        let parsed: ExternalDescriptor =
            serde_json::from_str(r#"{"main_color":"blue","shapes":["waves"]}"#).unwrap();
        assert_eq!(parsed.main_color, "blue");
        assert_eq!(parsed.shapes, vec!["waves"]);
        assert!(parsed.mood.is_empty());
    }

    #[test]
    fn test_batch_row_flattens_record() {
        let row = BatchRow {
            filename: "a.jpg".to_string(),
            record: MetadataRecord {
                title: "T".to_string(),
                title_candidates: vec![],
                description: "D".to_string(),
                keywords: vec!["k".to_string()],
            },
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"filename\":\"a.jpg\""));
        assert!(json.contains("\"title\":\"T\""));
        assert!(!json.contains("title_candidates"));
    }
}
