use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Viewports narrower than this use the compact preset.
pub const COMPACT_VIEWPORT_BREAKPOINT: f32 = 768.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Regular,
    Compact,
}

impl LayoutMode {
    pub fn for_viewport(width: f32) -> Self {
        if width < COMPACT_VIEWPORT_BREAKPOINT {
            Self::Compact
        } else {
            Self::Regular
        }
    }
}

/// Node size and spacing constants for one display mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizePreset {
    pub node_width: f32,
    pub node_height: f32,
    pub rank_spacing: f32,
    pub node_spacing: f32,
    pub couple_gap: f32,
    pub row_padding: f32,
    pub collision_gap: f32,
}

impl SizePreset {
    pub fn regular() -> Self {
        Self {
            node_width: 180.0,
            node_height: 180.0,
            rank_spacing: 120.0,
            node_spacing: 80.0,
            couple_gap: 40.0,
            row_padding: 80.0,
            collision_gap: 60.0,
        }
    }

    pub fn compact() -> Self {
        Self {
            node_width: 140.0,
            node_height: 160.0,
            rank_spacing: 100.0,
            node_spacing: 40.0,
            couple_gap: 20.0,
            row_padding: 40.0,
            collision_gap: 30.0,
        }
    }

    /// Center-to-center distance between the two members of a couple.
    pub fn couple_distance(&self) -> f32 {
        self.node_width + self.couple_gap
    }

    /// Minimum center-to-center distance between same-row neighbors.
    pub fn collision_distance(&self) -> f32 {
        self.node_width + self.collision_gap
    }

    pub fn min_row_gap(&self) -> f32 {
        self.node_height + self.row_padding
    }
}

/// Thresholds and pass counts of the refinement stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    pub orphan_year_threshold: i32,
    pub row_tolerance: f32,
    pub same_level_snap: f32,
    pub spouse_alignment_tolerance: f32,
    pub magnet_threshold: f32,
    pub vertical_passes: usize,
    pub collision_passes: usize,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            orphan_year_threshold: 15,
            row_tolerance: 10.0,
            same_level_snap: 50.0,
            spouse_alignment_tolerance: 50.0,
            magnet_threshold: 1.0,
            vertical_passes: 3,
            collision_passes: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeLayoutConfig {
    pub mode: LayoutMode,
    pub regular: SizePreset,
    pub compact: SizePreset,
    pub tuning: TuningConfig,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Regular,
            regular: SizePreset::regular(),
            compact: SizePreset::compact(),
            tuning: TuningConfig::default(),
        }
    }
}

impl TreeLayoutConfig {
    pub fn for_mode(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    /// The preset selected by the current mode.
    pub fn preset(&self) -> &SizePreset {
        match self.mode {
            LayoutMode::Regular => &self.regular,
            LayoutMode::Compact => &self.compact,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: TreeLayoutConfig,
    pub theme: Theme,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SizePresetFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    rank_spacing: Option<f32>,
    node_spacing: Option<f32>,
    couple_gap: Option<f32>,
    row_padding: Option<f32>,
    collision_gap: Option<f32>,
}

impl SizePresetFile {
    fn apply(self, preset: &mut SizePreset) {
        if let Some(v) = self.node_width {
            preset.node_width = v;
        }
        if let Some(v) = self.node_height {
            preset.node_height = v;
        }
        if let Some(v) = self.rank_spacing {
            preset.rank_spacing = v;
        }
        if let Some(v) = self.node_spacing {
            preset.node_spacing = v;
        }
        if let Some(v) = self.couple_gap {
            preset.couple_gap = v;
        }
        if let Some(v) = self.row_padding {
            preset.row_padding = v;
        }
        if let Some(v) = self.collision_gap {
            preset.collision_gap = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TuningFile {
    orphan_year_threshold: Option<i32>,
    row_tolerance: Option<f32>,
    same_level_snap: Option<f32>,
    spouse_alignment_tolerance: Option<f32>,
    magnet_threshold: Option<f32>,
    vertical_passes: Option<usize>,
    collision_passes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeFile {
    father_color: Option<String>,
    mother_color: Option<String>,
    node_type: Option<String>,
    edge_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    mode: Option<LayoutMode>,
    regular: Option<SizePresetFile>,
    compact: Option<SizePresetFile>,
    tuning: Option<TuningFile>,
    theme: Option<ThemeFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config {}", path.display()))
}

/// Overlays a JSON (or JSON5) config document onto the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents).map_err(|json5_err| {
            anyhow::anyhow!("{json_err} (JSON5 fallback also failed: {json5_err})")
        })?,
    };

    let mut config = Config::default();
    if let Some(mode) = parsed.mode {
        config.layout.mode = mode;
    }
    if let Some(preset) = parsed.regular {
        preset.apply(&mut config.layout.regular);
    }
    if let Some(preset) = parsed.compact {
        preset.apply(&mut config.layout.compact);
    }

    if let Some(tuning) = parsed.tuning {
        let target = &mut config.layout.tuning;
        if let Some(v) = tuning.orphan_year_threshold {
            target.orphan_year_threshold = v;
        }
        if let Some(v) = tuning.row_tolerance {
            target.row_tolerance = v;
        }
        if let Some(v) = tuning.same_level_snap {
            target.same_level_snap = v;
        }
        if let Some(v) = tuning.spouse_alignment_tolerance {
            target.spouse_alignment_tolerance = v;
        }
        if let Some(v) = tuning.magnet_threshold {
            target.magnet_threshold = v;
        }
        if let Some(v) = tuning.vertical_passes {
            target.vertical_passes = v;
        }
        if let Some(v) = tuning.collision_passes {
            target.collision_passes = v;
        }
    }

    if let Some(theme) = parsed.theme {
        if let Some(v) = theme.father_color {
            config.theme.father_color = v;
        }
        if let Some(v) = theme.mother_color {
            config.theme.mother_color = v;
        }
        if let Some(v) = theme.node_type {
            config.theme.node_type = v;
        }
        if let Some(v) = theme.edge_type {
            config.theme.edge_type = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_breakpoint_selects_compact() {
        assert_eq!(LayoutMode::for_viewport(375.0), LayoutMode::Compact);
        assert_eq!(LayoutMode::for_viewport(767.9), LayoutMode::Compact);
        assert_eq!(LayoutMode::for_viewport(768.0), LayoutMode::Regular);
        assert_eq!(LayoutMode::for_viewport(1440.0), LayoutMode::Regular);
    }

    #[test]
    fn preset_follows_mode() {
        let config = TreeLayoutConfig::for_mode(LayoutMode::Compact);
        assert_eq!(config.preset().node_width, 140.0);
        assert_eq!(config.preset().couple_distance(), 160.0);
        assert_eq!(config.preset().collision_distance(), 170.0);
        assert_eq!(config.preset().min_row_gap(), 200.0);

        let config = config.with_mode(LayoutMode::Regular);
        assert_eq!(config.preset().couple_distance(), 220.0);
        assert_eq!(config.preset().collision_distance(), 240.0);
        assert_eq!(config.preset().min_row_gap(), 260.0);
    }

    #[test]
    fn overlays_partial_config() {
        let config = parse_config(
            r##"{
                "mode": "compact",
                "compact": { "nodeWidth": 120 },
                "tuning": { "orphanYearThreshold": 20, "collisionPasses": 3 },
                "theme": { "fatherColor": "#123456" }
            }"##,
        )
        .expect("config should parse");
        assert_eq!(config.layout.mode, LayoutMode::Compact);
        assert_eq!(config.layout.compact.node_width, 120.0);
        assert_eq!(config.layout.compact.node_height, 160.0);
        assert_eq!(config.layout.regular, SizePreset::regular());
        assert_eq!(config.layout.tuning.orphan_year_threshold, 20);
        assert_eq!(config.layout.tuning.collision_passes, 3);
        assert_eq!(config.layout.tuning.vertical_passes, 3);
        assert_eq!(config.theme.father_color, "#123456");
        assert_eq!(config.theme.mother_color, Theme::default().mother_color);
    }

    #[test]
    fn accepts_json5_syntax() {
        let config = parse_config("{ mode: 'compact', regular: { coupleGap: 10, }, }")
            .expect("json5 config should parse");
        assert_eq!(config.layout.mode, LayoutMode::Compact);
        assert_eq!(config.layout.regular.couple_gap, 10.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_config("mode = compact").is_err());
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.layout, TreeLayoutConfig::default());
    }
}
