use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color, IntoFont, RGBColor, ShapeStyle, TextStyle};

use crate::transform::colors::shift;

pub const FONT_FAMILY: &str = "sans-serif";
pub const FONT_COLOR: RGBColor = RGBColor(0x85, 0x87, 0x96);
pub const GRID_COLOR: RGBColor = RGBColor(234, 236, 244);
pub const FALLBACK_COLOR: &str = "#858796";

/// How much darker than its fill a bar or slice outline is.
const BORDER_DARKEN: i32 = 30;

/// `#rrggbb` (or `rrggbb`) to a plotters color; anything else is the fallback grey.
pub fn rgb(hex: &str) -> RGBColor {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let parsed = (digits.len() == 6)
        .then(|| u32::from_str_radix(digits, 16).ok())
        .flatten();
    match parsed {
        Some(v) => RGBColor((v >> 16) as u8, (v >> 8) as u8, v as u8),
        None => FONT_COLOR,
    }
}

pub fn fill(hex: &str) -> ShapeStyle {
    rgb(hex).filled()
}

pub fn border(hex: &str) -> ShapeStyle {
    rgb(&shift(hex, BORDER_DARKEN)).stroke_width(1)
}

pub fn title_font() -> TextStyle<'static> {
    (FONT_FAMILY, 20).into_font().color(&FONT_COLOR)
}

pub fn label_font() -> TextStyle<'static> {
    (FONT_FAMILY, 13).into_font().color(&FONT_COLOR)
}

pub fn data_label_font() -> TextStyle<'static> {
    centered((FONT_FAMILY, 13).into_font().color(&RGBColor(255, 255, 255)))
}

pub fn centered(style: TextStyle<'static>) -> TextStyle<'static> {
    style.pos(Pos::new(HPos::Center, VPos::Center))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(rgb("#ffa532"), RGBColor(255, 165, 50));
        assert_eq!(rgb("2c7db7"), RGBColor(44, 125, 183));
        assert_eq!(rgb("navy"), FONT_COLOR);
        assert_eq!(rgb("#fff"), FONT_COLOR);
    }
}
