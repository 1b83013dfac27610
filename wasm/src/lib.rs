use family_tree_layout::{LayoutMode, LayoutOptions, layout_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FamilyTreeOptions {
    compact: Option<bool>,
    viewport_width: Option<f32>,
    father_color: Option<String>,
    mother_color: Option<String>,
}

fn build_layout_options(options: FamilyTreeOptions) -> LayoutOptions {
    // An explicit flag beats the viewport guess.
    let mode = match (options.compact, options.viewport_width) {
        (Some(true), _) => LayoutMode::Compact,
        (Some(false), _) => LayoutMode::Regular,
        (None, Some(width)) => LayoutMode::for_viewport(width),
        (None, None) => LayoutMode::Regular,
    };
    let mut layout_options = LayoutOptions::for_mode(mode);

    if let Some(color) = options.father_color {
        layout_options.theme.father_color = color;
    }
    if let Some(color) = options.mother_color {
        layout_options.theme.mother_color = color;
    }

    layout_options
}

#[wasm_bindgen]
pub fn layout_family_tree(persons_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FamilyTreeOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        FamilyTreeOptions::default()
    };

    let layout_options = build_layout_options(options);
    layout_with_options(persons_json, &layout_options).map_err(|error| JsValue::from_str(&format!("{error:#}")))
}
