//! Dashboard palettes and the helpers that spread them over a series.

use serde::Deserialize;

pub const COLORS: [&str; 5] = ["#ffa532", "#29689c", "#2d91d2", "#68b0c8", "#ffc423"];
pub const LIGHTENED_COLORS: [&str; 5] = ["#ffc85d", "#3586ca", "#34a7f2", "#9fd8ee", "#ffc423"];
pub const DARKENED_COLORS: [&str; 5] = ["#d48533", "#275e91", "#277eb7", "#5693a7", "#ffc423"];

pub const BLUES: &[&str] = &["36A0FC", "7FCDC6", "6468DB"];
pub const GREENS: &[&str] = &["61E294"];
pub const PURPLES: &[&str] = &["473DA4", "80569C"];
pub const REDS: &[&str] = &["C80487", "B02940"];
pub const YELLOWS: &[&str] = &["F9C80E", "AAD246"];

/// Which palette zone series are colored from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    #[default]
    Brand,
    Shades,
}

impl Palette {
    pub fn zone_colors(self, n: usize) -> Vec<String> {
        match self {
            Palette::Brand => cycle(n, &COLORS).into_iter().map(str::to_string).collect(),
            Palette::Shades => cycle(n, &interleaved_shades(usize::MAX)),
        }
    }
}

/// `palette[i % palette.len()]` for every `i` in `0..n`. An empty palette
/// yields an empty sequence.
pub fn cycle<T: Clone>(n: usize, palette: &[T]) -> Vec<T> {
    if palette.is_empty() {
        return Vec::new();
    }
    (0..n).map(|i| palette[i % palette.len()].clone()).collect()
}

/// Take shade 0 of every family, then shade 1, then shade 2 (skipping
/// families that have run out) and keep the first `n`. Never repeats.
pub fn interleaved_shades(n: usize) -> Vec<String> {
    let families = [BLUES, YELLOWS, PURPLES, GREENS, REDS];
    (0..3)
        .flat_map(|shade| families.iter().filter_map(move |family| family.get(shade)))
        .take(n)
        .map(|hex| format!("#{hex}"))
        .collect()
}

/// Darken a hex color by `delta` per channel (lighten with a negative delta).
///
/// Each channel becomes `|channel - delta|` capped at 255: darkening past
/// black reflects back up instead of stopping at zero. A leading character is
/// only stripped from inputs longer than six characters, and an unparsable
/// color counts as black.
pub fn shift(color: &str, delta: i32) -> String {
    let hex = if color.chars().count() > 6 {
        let mut chars = color.chars();
        chars.next();
        chars.as_str()
    } else {
        color
    };

    let rgb = parse_hex_prefix(hex);
    let channel = |c: u32| -> u32 { (i64::from(c) - i64::from(delta)).unsigned_abs().min(255) as u32 };

    format!(
        "#{:02x}{:02x}{:02x}",
        channel((rgb >> 16) & 0xFF),
        channel((rgb >> 8) & 0xFF),
        channel(rgb & 0xFF)
    )
}

/// Leading hexadecimal digits of `s` as a 32-bit pattern; 0 when there are none.
fn parse_hex_prefix(s: &str) -> u32 {
    let s = s.trim_start();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    let value = s
        .chars()
        .map_while(|c| c.to_digit(16))
        .fold(0u32, |acc, d| acc.wrapping_mul(16).wrapping_add(d));

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_repeats_palette() {
        let colors = cycle(7, &COLORS);
        assert_eq!(colors.len(), 7);
        for (i, color) in colors.iter().enumerate() {
            assert_eq!(*color, COLORS[i % COLORS.len()]);
        }
    }

    #[test]
    fn cycle_is_total() {
        assert!(cycle(0, &COLORS).is_empty());
        assert!(cycle::<&str>(3, &[]).is_empty());
        assert_eq!(cycle(3, &["#000"]), vec!["#000"; 3]);
    }

    #[test]
    fn interleaves_families_by_shade() {
        assert_eq!(
            interleaved_shades(7),
            vec!["#36A0FC", "#F9C80E", "#473DA4", "#61E294", "#C80487", "#7FCDC6", "#AAD246"]
        );
        assert_eq!(interleaved_shades(usize::MAX).len(), 10);
        assert!(interleaved_shades(0).is_empty());
    }

    #[test]
    fn shades_palette_cycles_after_running_out() {
        let colors = Palette::Shades.zone_colors(12);
        assert_eq!(colors[10], "#36A0FC");
        assert_eq!(Palette::Brand.zone_colors(6)[5], "#ffa532");
    }

    #[test]
    fn shift_darkens_each_channel() {
        assert_eq!(shift("#ffffff", 10), "#f5f5f5");
        assert_eq!(shift("#ffa532", 20), "#eb911e");
        assert_eq!(shift("ffa532", 20), "#eb911e");
    }

    #[test]
    fn shift_lightening_caps_at_white() {
        assert_eq!(shift("#ffa532", -20), "#ffb946");
    }

    #[test]
    fn shift_reflects_at_black() {
        assert_eq!(shift("#050505", 10), "#050505");
        assert_eq!(shift("#000000", 300), "#ffffff");
    }

    #[test]
    fn shift_treats_short_or_bad_input_as_black() {
        assert_eq!(shift("#fff", 10), "#0a0a0a");
        assert_eq!(shift("zzzzzzz", 16), "#101010");
    }
}
