//! Visual theming for the background.
//!
//! Colors, the weighted node palette, and the per-element styles the
//! renderer reads. Nothing here affects geometry or distance thresholds.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Build from a packed `0xRRGGBB` value.
	pub const fn hex(rgb: u32) -> Self {
		Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

pub const CYAN: Color = Color::hex(0x00ffcc);
pub const BLUE: Color = Color::hex(0x3b8cff);
pub const PINK: Color = Color::hex(0xff006e);
pub const WHITE: Color = Color::hex(0xffffff);

/// Palette where each color is picked with a relative weight.
#[derive(Clone, Debug)]
pub struct WeightedPalette {
	entries: Vec<(Color, f64)>,
	total: f64,
}

impl WeightedPalette {
	pub fn new(entries: Vec<(Color, f64)>) -> Self {
		let total = entries.iter().map(|(_, w)| w.max(0.0)).sum::<f64>();
		Self { entries, total }
	}

	/// Mostly cyan, some blue, a few pink accents.
	pub fn neon() -> Self {
		Self::new(vec![(CYAN, 0.60), (BLUE, 0.25), (PINK, 0.15)])
	}

	/// Map a uniform sample in `[0, 1)` to a palette color.
	pub fn pick(&self, sample: f64) -> Color {
		let mut threshold = sample.clamp(0.0, 1.0) * self.total;
		for &(color, weight) in &self.entries {
			let weight = weight.max(0.0);
			if threshold < weight {
				return color;
			}
			threshold -= weight;
		}
		self.entries.last().map(|&(c, _)| c).unwrap_or(WHITE)
	}
}

/// A sphere-like dot drawn as a solid core plus a faint halo.
#[derive(Clone, Debug)]
pub struct DotStyle {
	/// Core radius in world units.
	pub core_radius: f32,
	/// Halo radius in world units.
	pub halo_radius: f32,
	/// Halo opacity (core is opaque).
	pub halo_alpha: f64,
}

/// Line set style.
#[derive(Clone, Debug)]
pub struct LineStyle {
	pub color: Color,
	/// Stroke width in CSS pixels.
	pub width: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub palette: WeightedPalette,
	pub node: DotStyle,
	pub static_edge: LineStyle,
	pub cursor_edge: LineStyle,
	pub cursor: DotStyle,
	pub cursor_core_color: Color,
	pub cursor_halo_color: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			palette: WeightedPalette::neon(),
			node: DotStyle {
				core_radius: 0.07,
				halo_radius: 0.22,
				halo_alpha: 0.08,
			},
			static_edge: LineStyle {
				color: CYAN.with_alpha(0.13),
				width: 1.0,
			},
			cursor_edge: LineStyle {
				color: CYAN.with_alpha(0.45),
				width: 1.0,
			},
			cursor: DotStyle {
				core_radius: 0.10,
				halo_radius: 0.30,
				halo_alpha: 0.12,
			},
			cursor_core_color: WHITE,
			cursor_halo_color: CYAN,
		}
	}
}
