//! Figure styling.
//!
//! A `Theme` is passed explicitly to every draw call; there is no process-wide
//! plotting state.

use plotters::prelude::*;

/// Seaborn's "pastel" palette.
const PASTEL: [RGBColor; 10] = [
    RGBColor(0xa1, 0xc9, 0xf4),
    RGBColor(0xff, 0xb4, 0x82),
    RGBColor(0x8d, 0xe5, 0xa1),
    RGBColor(0xff, 0x9f, 0x9b),
    RGBColor(0xd0, 0xbb, 0xff),
    RGBColor(0xde, 0xbb, 0x9b),
    RGBColor(0xfa, 0xb0, 0xe4),
    RGBColor(0xcf, 0xcf, 0xcf),
    RGBColor(0xff, 0xfe, 0xa3),
    RGBColor(0xb9, 0xf2, 0xf0),
];

#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Vec<RGBColor>,
    /// Plot-area fill behind the grid.
    pub background: RGBColor,
    pub grid: RGBColor,
    pub text: RGBColor,
    pub font_family: &'static str,
    pub font_size: u32,
    pub marker_radius: u32,
    pub line_width: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::pastel()
    }
}

impl Theme {
    /// Pastel markers on a light grey grid, monospace text.
    pub fn pastel() -> Self {
        Self {
            palette: PASTEL.to_vec(),
            background: RGBColor(0xea, 0xea, 0xf2),
            grid: WHITE,
            text: RGBColor(0x26, 0x26, 0x26),
            font_family: "monospace",
            font_size: 12,
            marker_radius: 5,
            line_width: 2,
        }
    }

    /// Palette color for `tone`, wrapping around.
    pub fn tone(&self, tone: usize) -> RGBColor {
        if self.palette.is_empty() {
            return BLACK;
        }
        self.palette[tone % self.palette.len()]
    }

    pub fn font(&self, size: u32) -> FontDesc<'static> {
        (self.font_family, size).into_font()
    }

    pub fn bold_font(&self, size: u32) -> FontDesc<'static> {
        self.font(size).style(FontStyle::Bold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tones_wrap_around_the_palette() {
        let theme = Theme::pastel();
        assert_eq!(theme.tone(0), RGBColor(0xa1, 0xc9, 0xf4));
        assert_eq!(theme.tone(12), theme.tone(2));
    }
}
