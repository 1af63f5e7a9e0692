use serde::{Deserialize, Serialize};

/// Label a shortcut shows once its original is gone.
pub const DEFAULT_BROKEN_SHORTCUT_LABEL: &str = "<missing original>";

/// Tunables for canvas editing and loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Alias given to shortcuts whose original cannot be resolved.
    pub broken_shortcut_label: String,
    /// Offset applied to both axes when pasting or duplicating items.
    pub paste_offset: f64,
    /// Remove links together with the behaviour or portal they attach to.
    pub cascade_link_removal: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            broken_shortcut_label: DEFAULT_BROKEN_SHORTCUT_LABEL.to_owned(),
            paste_offset: 20.0,
            cascade_link_removal: true,
        }
    }
}

impl CanvasConfig {
    /// Defaults overridden by `WEAVE_BROKEN_LABEL` and `WEAVE_PASTE_OFFSET`.
    ///
    /// Unparsable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(label) = std::env::var("WEAVE_BROKEN_LABEL") {
            config.broken_shortcut_label = label;
        }
        if let Some(offset) = std::env::var("WEAVE_PASTE_OFFSET")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.paste_offset = offset;
        }
        config
    }

    #[must_use]
    pub fn with_broken_shortcut_label(mut self, label: impl Into<String>) -> Self {
        self.broken_shortcut_label = label.into();
        self
    }

    #[must_use]
    pub fn with_paste_offset(mut self, offset: f64) -> Self {
        self.paste_offset = offset;
        self
    }

    #[must_use]
    pub fn with_cascade_link_removal(mut self, cascade: bool) -> Self {
        self.cascade_link_removal = cascade;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.broken_shortcut_label, "<missing original>");
        assert_eq!(config.paste_offset, 20.0);
        assert!(config.cascade_link_removal);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: CanvasConfig = serde_json::from_value(json!({ "paste_offset": 5.0 })).unwrap();
        assert_eq!(config.paste_offset, 5.0);
        assert_eq!(config.broken_shortcut_label, DEFAULT_BROKEN_SHORTCUT_LABEL);
    }

    #[test]
    fn builder_overrides() {
        let config = CanvasConfig::default()
            .with_broken_shortcut_label("??")
            .with_paste_offset(0.0)
            .with_cascade_link_removal(false);
        assert_eq!(config.broken_shortcut_label, "??");
        assert_eq!(config.paste_offset, 0.0);
        assert!(!config.cascade_link_removal);
    }
}
