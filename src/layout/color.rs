use rand::Rng;

/// Random hue at 80% saturation and 50% lightness, as `#rrggbb`.
pub(crate) fn random_color<R: Rng>(rng: &mut R) -> String {
    let (r, g, b) = hsl_to_rgb(random_hue(rng), 0.8, 0.5);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Whole degrees in `0..=360`, from 256 evenly spaced steps.
pub(crate) fn random_hue<R: Rng>(rng: &mut R) -> f32 {
    (360.0 * rng.random_range(0..=255u32) as f32 / 255.0).floor()
}

pub(crate) fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

pub(crate) fn parse_hex_color(hex: &str) -> Option<tiny_skia::Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(tiny_skia::Color::from_rgba8(r, g, b, 255))
    } else {
        None
    }
}
