use eframe::egui::Color32;

// Endpoints of the warm cubehelix ramp: (hue degrees, saturation,
// lightness). Hue is interpolated over the long path, -100 up to 80.
const WARM_START: (f32, f32, f32) = (-100.0, 0.75, 0.35);
const WARM_END: (f32, f32, f32) = (80.0, 1.50, 0.80);

/// Maps a confidence in [0, 100] to the warm scale. Absent and zero
/// confidence map to pure white; everything else is clamped into the
/// scale's [0, 1] domain after dividing by 100.
pub fn confidence_color(confidence: Option<f32>) -> Color32 {
    match confidence {
        None => Color32::WHITE,
        Some(value) if value == 0.0 => Color32::WHITE,
        Some(value) => interpolate_warm(value / 100.0),
    }
}

/// Warm perceptual scale over [0, 1], shared by edges and nodes in both
/// render modes.
pub fn interpolate_warm(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let hue = WARM_START.0 + (WARM_END.0 - WARM_START.0) * t;
    let saturation = WARM_START.1 + (WARM_END.1 - WARM_START.1) * t;
    let lightness = WARM_START.2 + (WARM_END.2 - WARM_START.2) * t;
    cubehelix_to_rgb(hue, saturation, lightness)
}

fn cubehelix_to_rgb(hue_deg: f32, saturation: f32, lightness: f32) -> Color32 {
    let h = (hue_deg + 120.0).to_radians();
    let l = lightness;
    let a = saturation * l * (1.0 - l);
    let (sin_h, cos_h) = h.sin_cos();

    let r = l + a * (-0.14861 * cos_h + 1.78277 * sin_h);
    let g = l + a * (-0.29227 * cos_h - 0.90649 * sin_h);
    let b = l + a * (1.97294 * cos_h);
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
