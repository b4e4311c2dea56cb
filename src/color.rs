use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Diverging colour scale (RdBu) for correlation values
// ---------------------------------------------------------------------------

/// Red → white → blue anchors, evenly spaced over [-1, 1].
const RDBU: [(u8, u8, u8); 11] = [
    (103, 0, 31),
    (178, 24, 43),
    (214, 96, 77),
    (244, 165, 130),
    (253, 219, 199),
    (247, 247, 247),
    (209, 229, 240),
    (146, 197, 222),
    (67, 147, 195),
    (33, 102, 172),
    (5, 48, 97),
];

/// Colour for cells with an undefined coefficient.
pub const UNDEFINED: Color32 = Color32::from_gray(160);

/// Fixed-range colour scale: `zmin` maps to the first anchor, `zmax` to the
/// last. Values outside the range are clamped.
#[derive(Debug, Clone, Copy)]
pub struct DivergingScale {
    pub zmin: f64,
    pub zmax: f64,
}

impl Default for DivergingScale {
    fn default() -> Self {
        Self {
            zmin: -1.0,
            zmax: 1.0,
        }
    }
}

impl DivergingScale {
    /// Interpolate between the two nearest anchors in linear RGB.
    pub fn color_for(&self, value: f64) -> Color32 {
        if !value.is_finite() || self.zmax <= self.zmin {
            return UNDEFINED;
        }
        let t = ((value - self.zmin) / (self.zmax - self.zmin)).clamp(0.0, 1.0);
        let scaled = t * (RDBU.len() - 1) as f64;
        let lo = (scaled.floor() as usize).min(RDBU.len() - 2);
        let frac = (scaled - lo as f64) as f32;

        let mixed = anchor(lo).mix(anchor(lo + 1), frac);
        let rgb: Srgb = Srgb::from_linear(mixed);
        Color32::from_rgb(
            (rgb.red * 255.0).round() as u8,
            (rgb.green * 255.0).round() as u8,
            (rgb.blue * 255.0).round() as u8,
        )
    }

    /// Label colour readable on top of `color_for(value)`.
    pub fn text_color_for(&self, value: f64) -> Color32 {
        let t = (value - self.zmin) / (self.zmax - self.zmin);
        if (t - 0.5).abs() > 0.3 {
            Color32::WHITE
        } else {
            Color32::BLACK
        }
    }
}

fn anchor(i: usize) -> LinSrgb {
    let (r, g, b) = RDBU[i];
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_the_outer_anchors() {
        let scale = DivergingScale::default();
        assert_eq!(scale.color_for(-1.0), Color32::from_rgb(103, 0, 31));
        assert_eq!(scale.color_for(1.0), Color32::from_rgb(5, 48, 97));
        assert_eq!(scale.color_for(0.0), Color32::from_rgb(247, 247, 247));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let scale = DivergingScale::default();
        assert_eq!(scale.color_for(-5.0), scale.color_for(-1.0));
        assert_eq!(scale.color_for(5.0), scale.color_for(1.0));
        assert_eq!(scale.color_for(f64::NAN), UNDEFINED);
    }

    #[test]
    fn labels_contrast_with_cells() {
        let scale = DivergingScale::default();
        assert_eq!(scale.text_color_for(0.0), Color32::BLACK);
        assert_eq!(scale.text_color_for(0.95), Color32::WHITE);
        assert_eq!(scale.text_color_for(-0.95), Color32::WHITE);
    }
}
