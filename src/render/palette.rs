//! Fixed visual vocabulary for the closed node/edge enumerations.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::graph::{Category, NodeType, Relationship};

/// An opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Color {
	/// Colour from its three channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Parses `#rrggbb` or `#rgb` (leading `#` optional).
	pub fn from_hex(hex: &str) -> Option<Self> {
		let hex = hex.trim().trim_start_matches('#');
		let channel = |s: &str| u8::from_str_radix(s, 16).ok();
		match hex.len() {
			6 if hex.is_ascii() => Some(Self::rgb(
				channel(&hex[0..2])?,
				channel(&hex[2..4])?,
				channel(&hex[4..6])?,
			)),
			3 if hex.is_ascii() => {
				let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
				Some(Self::rgb(short(0)?, short(1)?, short(2)?))
			}
			_ => None,
		}
	}

	/// Lowercase `#rrggbb`.
	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	/// CSS `rgba(...)` string with the given alpha.
	pub fn to_rgba(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl Serialize for Color {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

/// Fallback for clusters without a usable color.
pub const NEUTRAL: Color = Color::rgb(0x7f, 0x7f, 0x7f);

/// Default node fill.
pub fn category_color(category: Category) -> Color {
	match category {
		Category::Requirements => Color::rgb(0x1f, 0x77, 0xb4),
		Category::Architecture => Color::rgb(0xff, 0x7f, 0x0e),
		Category::Development => Color::rgb(0x2c, 0xa0, 0x2c),
		Category::Integration => Color::rgb(0xd6, 0x27, 0x28),
		Category::Analytics => Color::rgb(0x94, 0x67, 0xbd),
		Category::Process => Color::rgb(0x17, 0xbe, 0xcf),
	}
}

/// Marker drawn for a node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
	/// Concepts.
	Circle,
	/// Requirements.
	Square,
	/// Components.
	Hexagon,
	/// Decisions.
	Diamond,
	/// Issues.
	Triangle,
	/// Solutions.
	Star,
	/// People.
	Pentagon,
	/// Documents.
	Rectangle,
}

/// Shape for a node type; one distinct shape per type.
pub fn type_shape(node_type: NodeType) -> NodeShape {
	match node_type {
		NodeType::Concept => NodeShape::Circle,
		NodeType::Requirement => NodeShape::Square,
		NodeType::Component => NodeShape::Hexagon,
		NodeType::Decision => NodeShape::Diamond,
		NodeType::Issue => NodeShape::Triangle,
		NodeType::Solution => NodeShape::Star,
		NodeType::Person => NodeShape::Pentagon,
		NodeType::Document => NodeShape::Rectangle,
	}
}

/// Default edge stroke.
pub fn relationship_color(relationship: Relationship) -> Color {
	match relationship {
		Relationship::RelatesTo => Color::rgb(100, 180, 255),
		Relationship::DependsOn => Color::rgb(0xf4, 0xa2, 0x61),
		Relationship::Implements => Color::rgb(0x2a, 0x9d, 0x8f),
		Relationship::ConflictsWith => Color::rgb(0xe6, 0x39, 0x46),
		Relationship::Influences => Color::rgb(0xb3, 0x88, 0xeb),
		Relationship::DerivedFrom => Color::rgb(0x8d, 0x99, 0xae),
	}
}

/// Dash/gap lengths; empty means a solid line.
pub fn relationship_dash(relationship: Relationship) -> &'static [f64] {
	match relationship {
		Relationship::RelatesTo | Relationship::Implements => &[],
		Relationship::DependsOn => &[8.0, 4.0],
		Relationship::ConflictsWith => &[2.0, 3.0],
		Relationship::Influences => &[6.0, 3.0, 2.0, 3.0],
		Relationship::DerivedFrom => &[4.0, 4.0],
	}
}
