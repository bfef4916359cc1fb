//! Explorer settings loaded from TOML.

use serde::Deserialize;

use crate::error::Result;

/// Explorer configuration; every field has a built-in default so a partial
/// (or empty) TOML document is valid.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
	/// `[visual]` table.
	pub visual: VisualConfig,
	/// `[interaction]` table.
	pub interaction: InteractionConfig,
}

/// Sizing, widths and emphasis colors used when resolving the view model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
	/// Node size at importance 0.
	pub min_node_size: f64,
	/// Node size at importance 1.
	pub max_node_size: f64,
	/// Multiplier applied to node sizes in 3D mode.
	pub depth_size_scale: f64,
	/// Edge width at strength 0.
	pub base_edge_width: f64,
	/// Extra width per unit of strength.
	pub strength_width_scale: f64,
	/// Size multiplier for the selected node, and width multiplier for every
	/// on-path or highlighted edge.
	pub emphasis_scale: f64,
	/// Opacity of items outside the focus while a selection is active.
	pub dim_opacity: f64,
	/// Hex colour of the selected node.
	pub selected_color: String,
	/// Hex colour of path nodes and edges.
	pub path_color: String,
	/// Hex colour of the selected node's neighbourhood.
	pub highlight_color: String,
}

impl Default for VisualConfig {
	fn default() -> Self {
		Self {
			min_node_size: 4.0,
			max_node_size: 14.0,
			depth_size_scale: 1.5,
			base_edge_width: 0.5,
			strength_width_scale: 2.5,
			emphasis_scale: 1.6,
			dim_opacity: 0.25,
			selected_color: "#ffd166".to_string(),
			path_color: "#ef476f".to_string(),
			highlight_color: "#06d6a0".to_string(),
		}
	}
}

/// Interaction controller settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// Maximum number of view states kept for undo.
	pub history_limit: usize,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self { history_limit: 50 }
	}
}

impl ExplorerConfig {
	/// Parses a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_document_uses_defaults() {
		let config = ExplorerConfig::from_toml_str("").unwrap();
		assert_eq!(config, ExplorerConfig::default());
	}

	#[test]
	fn test_partial_override() {
		let config = ExplorerConfig::from_toml_str(
			r##"
			[visual]
			max_node_size = 20.0
			path_color = "#ff0000"

			[interaction]
			history_limit = 5
			"##,
		)
		.unwrap();
		assert_eq!(config.visual.max_node_size, 20.0);
		assert_eq!(config.visual.min_node_size, 4.0);
		assert_eq!(config.visual.path_color, "#ff0000");
		assert_eq!(config.interaction.history_limit, 5);
	}

	#[test]
	fn test_invalid_document() {
		let err = ExplorerConfig::from_toml_str("[visual]\nmax_node_size = \"big\"").unwrap_err();
		assert!(err.to_string().contains("Configuration error"));
	}
}
