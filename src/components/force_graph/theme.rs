//! Visual theming for the force graph.
//!
//! Per-group colors come from the node group config; the theme holds what is
//! shared by every group: background, label text, layer opacities.

/// Opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	pub fn to_css(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Shared visual style.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	/// Label text drawn on node bodies.
	pub label_color: Color,
	/// Label text drawn on satellites.
	pub satellite_label_color: Color,
	/// Fill of nodes whose group has no style.
	pub fallback_node_color: Color,
	pub glow_opacity: f64,
	pub body_opacity: f64,
	/// Node outline width in screen pixels.
	pub body_stroke_width: f64,
	pub font_family: &'static str,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(251, 249, 245),
			label_color: Color::rgb(255, 255, 255),
			satellite_label_color: Color::rgb(36, 72, 85),
			fallback_node_color: Color::rgb(160, 170, 175),
			glow_opacity: 0.25,
			body_opacity: 0.85,
			body_stroke_width: 3.0,
			font_family: "Inter, system-ui, sans-serif",
		}
	}
}

impl Theme {
	/// Canvas `font` shorthand for a bold label of the given size.
	pub fn font(&self, size: f64) -> String {
		format!("600 {}px {}", size, self.font_family)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn colors_render_as_lowercase_hex() {
		assert_eq!(Color::rgb(36, 72, 85).to_css(), "#244855");
		assert_eq!(Theme::default().background.to_css(), "#fbf9f5");
	}

	#[test]
	fn font_shorthand_is_bold_at_the_requested_size() {
		assert_eq!(Theme::default().font(9.0), "600 9px Inter, system-ui, sans-serif");
	}
}
