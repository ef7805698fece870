//! Fixed four-band palette for the pigment field.

/// Band breakpoints on the clamped B value.
pub const INK_BAND: f32 = 0.1;
pub const CRIMSON_BAND: f32 = 0.3;
pub const GOLD_BAND: f32 = 0.5;

/// Glow modulation in [0, 1] at wall-clock `time` seconds.
#[inline]
pub fn glow(time: f32, pulse_speed: f32) -> f32 {
    0.5 + 0.5 * (time * pulse_speed).sin()
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map a pigment value to an opaque RGBA color.
///
/// - `[0, 0.1)`: ink (26,26,26) toward crimson (180,16,46)
/// - `[0.1, 0.3)`: crimson toward gold (255,215,0)
/// - `[0.3, 0.5)`: gold toward ivory (255,255,240)
/// - `[0.5, 1]`: ivory with a glow pulse scaled by `B - 0.5`
pub fn shade(b: f32, glow: f32) -> [u8; 4] {
    let v = b.clamp(0.0, 1.0);

    let (r, g, bl) = if v < INK_BAND {
        let t = v / INK_BAND;
        (lerp(26.0, 180.0, t), lerp(26.0, 16.0, t), lerp(26.0, 46.0, t))
    } else if v < CRIMSON_BAND {
        let t = (v - INK_BAND) / (CRIMSON_BAND - INK_BAND);
        (lerp(180.0, 255.0, t), lerp(16.0, 215.0, t), lerp(46.0, 0.0, t))
    } else if v < GOLD_BAND {
        let t = (v - CRIMSON_BAND) / (GOLD_BAND - CRIMSON_BAND);
        (255.0, lerp(215.0, 255.0, t), lerp(0.0, 240.0, t))
    } else {
        let boost = glow * 0.3 * (v - GOLD_BAND) * 2.0;
        (
            (255.0 + boost * 30.0).min(255.0),
            (255.0 - boost * 10.0).min(255.0),
            (240.0 - boost * 40.0).max(200.0),
        )
    };

    [r as u8, g as u8, bl as u8, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_endpoints() {
        assert_eq!(shade(0.0, 0.0), [26, 26, 26, 255]);
        assert_eq!(shade(0.1, 0.0), [180, 16, 46, 255]);
        assert_eq!(shade(0.3, 0.0), [255, 215, 0, 255]);
        assert_eq!(shade(0.5, 1.0), [255, 255, 240, 255]);
    }

    #[test]
    fn test_bands_interpolate_linearly() {
        assert_eq!(shade(0.05, 0.0), [103, 21, 36, 255]);
        assert_eq!(shade(0.2, 0.0), [217, 115, 23, 255]);
        assert_eq!(shade(0.4, 0.0), [255, 235, 120, 255]);
    }

    #[test]
    fn test_glow_modulates_highlights_only() {
        // Full glow at B = 1: boost = 0.3.
        assert_eq!(shade(1.0, 1.0), [255, 252, 228, 255]);
        assert_eq!(shade(1.0, 0.0), [255, 255, 240, 255]);
        assert_eq!(shade(0.2, 1.0), shade(0.2, 0.0));
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        assert_eq!(shade(-3.0, 0.5), shade(0.0, 0.5));
        assert_eq!(shade(7.0, 0.5), shade(1.0, 0.5));
    }

    #[test]
    fn test_glow_range() {
        assert!((glow(0.0, 2.0) - 0.5).abs() < 1e-6);
        let peak = glow(std::f32::consts::FRAC_PI_4, 2.0);
        assert!((peak - 1.0).abs() < 1e-6);
        for i in 0..100 {
            let g = glow(i as f32 * 0.37, 2.0);
            assert!((0.0..=1.0).contains(&g));
        }
    }
}
