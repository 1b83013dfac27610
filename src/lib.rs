#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod person;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{
    Config, LayoutMode, SizePreset, TreeLayoutConfig, TuningConfig, load_config,
    parse_config,
};
pub use layout::{
    FamilyLayout, LayoutEdge, Position, PositionMap, PositionedNode, Relation,
    compute_family_layout,
};
pub use layout_dump::{FlowDump, layout_dump_json, write_layout_dump};
pub use person::{PersonId, PersonRecord, PersonsError, birth_year, parse_persons};
pub use theme::Theme;

/// Everything one layout call needs besides the person list.
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub layout: TreeLayoutConfig,
    pub theme: Theme,
    pub pretty: bool,
}

impl LayoutOptions {
    pub fn regular() -> Self {
        Self::for_mode(LayoutMode::Regular)
    }

    pub fn compact() -> Self {
        Self::for_mode(LayoutMode::Compact)
    }

    pub fn for_mode(mode: LayoutMode) -> Self {
        Self {
            layout: TreeLayoutConfig::for_mode(mode),
            ..Default::default()
        }
    }

    /// Picks the preset the way the tree screen does on resize.
    pub fn for_viewport(width: f32) -> Self {
        Self::for_mode(LayoutMode::for_viewport(width))
    }
}

impl From<Config> for LayoutOptions {
    fn from(config: Config) -> Self {
        Self {
            layout: config.layout,
            theme: config.theme,
            pretty: false,
        }
    }
}

/// Parses the backend's person list and returns the render-ready JSON.
pub fn layout_with_options(input: &str, options: &LayoutOptions) -> anyhow::Result<String> {
    let persons = parse_persons(input)?;
    let layout = compute_family_layout(&persons, &options.layout);
    layout_dump_json(&layout, &options.theme, options.pretty)
}
