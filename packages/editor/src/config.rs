use crate::EditorError;
use liveedit_vdom::StyleMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "liveedit.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Attribute carrying the per-page edit key
    #[serde(default = "default_edit_key_attribute")]
    pub edit_key_attribute: String,

    /// Attribute carrying the page namespace
    #[serde(default = "default_page_key_attribute")]
    pub page_key_attribute: String,

    /// Gesture that opens an edit session
    #[serde(default)]
    pub trigger: TriggerGesture,

    /// Tags rendered as images (compared case-insensitively)
    #[serde(default = "default_image_tags")]
    pub image_tags: Vec<String>,

    /// Primary value channel of image nodes
    #[serde(default = "default_image_source_attribute")]
    pub image_source_attribute: String,

    /// Attributes that override the image source and are suppressed while
    /// a session previews new values
    #[serde(default = "default_suppressed_attributes")]
    pub suppressed_attributes: Vec<String>,

    /// Prefix of the marker attribute holding a suppressed value
    #[serde(default = "default_suppressed_marker_prefix")]
    pub suppressed_marker_prefix: String,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerGesture {
    Click,
    #[default]
    DoubleClick,
    ContextMenu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightConfig {
    #[serde(default = "default_highlight_duration_ms")]
    pub duration_ms: u64,

    /// Inline style properties layered over the node while highlighted
    #[serde(default = "default_highlight_styles")]
    pub styles: StyleMap,
}

fn default_edit_key_attribute() -> String {
    "data-edit-key".to_string()
}

fn default_page_key_attribute() -> String {
    "data-page-key".to_string()
}

fn default_image_tags() -> Vec<String> {
    vec!["img".to_string()]
}

fn default_image_source_attribute() -> String {
    "src".to_string()
}

fn default_suppressed_attributes() -> Vec<String> {
    vec!["srcset".to_string()]
}

fn default_suppressed_marker_prefix() -> String {
    "data-liveedit-suppressed-".to_string()
}

fn default_highlight_duration_ms() -> u64 {
    1500
}

fn default_highlight_styles() -> StyleMap {
    [
        ("outline", "2px solid #3b82f6"),
        ("outline-offset", "4px"),
        ("background-color", "rgba(59, 130, 246, 0.12)"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_image_tag(&self, tag: &str) -> bool {
        self.image_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Marker attribute recording the suppressed value of `attribute`
    pub fn marker_for(&self, attribute: &str) -> String {
        format!("{}{}", self.suppressed_marker_prefix, attribute)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            edit_key_attribute: default_edit_key_attribute(),
            page_key_attribute: default_page_key_attribute(),
            trigger: TriggerGesture::default(),
            image_tags: default_image_tags(),
            image_source_attribute: default_image_source_attribute(),
            suppressed_attributes: default_suppressed_attributes(),
            suppressed_marker_prefix: default_suppressed_marker_prefix(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl HighlightConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_highlight_duration_ms(),
            styles: default_highlight_styles(),
        }
    }
}
