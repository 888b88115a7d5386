//! Color value type.
//!
//! Straight (non-premultiplied) RGBA with `f32` components in `[0, 1]`,
//! the layout paints hand to a GPU backend.

// ============================================================================
// Color
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn new_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Color from 8-bit channels.
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    /// Grey of intensity `i`.
    pub fn mono(i: f32, a: f32) -> Self {
        Self::new(i, i, i, a)
    }

    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    pub fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Color from hue, saturation and lightness, all in `[0, 1]`.
    ///
    /// The hue wraps; saturation and lightness are clamped.
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let mut h = h % 1.0;
        if h < 0.0 {
            h += 1.0;
        }
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let m1 = 2.0 * l - m2;
        Self::new(
            hue(h + 1.0 / 3.0, m1, m2).clamp(0.0, 1.0),
            hue(h, m1, m2).clamp(0.0, 1.0),
            hue(h - 1.0 / 3.0, m1, m2).clamp(0.0, 1.0),
            a,
        )
    }

    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::hsla(h, s, l, 1.0)
    }

    /// Same color with alpha replaced.
    pub fn with_opacity(&self, a: f32) -> Self {
        Self { a, ..*self }
    }

    /// Color channels scaled by alpha.
    pub fn premultiplied(&self) -> Self {
        Self::new(self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }

    /// Linear interpolation towards `c`, `k` clamped to `[0, 1]`.
    pub fn gradient(&self, c: &Color, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        let ik = 1.0 - k;
        Self::new(
            self.r * ik + c.r * k,
            self.g * ik + c.g * k,
            self.b * ik + c.b * k,
            self.a * ik + c.a * k,
        )
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::transparent()
    }
}

fn hue(mut h: f32, m1: f32, m2: f32) -> f32 {
    if h < 0.0 {
        h += 1.0;
    } else if h > 1.0 {
        h -= 1.0;
    }
    if h < 1.0 / 6.0 {
        m1 + (m2 - m1) * h * 6.0
    } else if h < 3.0 / 6.0 {
        m2
    } else if h < 4.0 / 6.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - h) * 6.0
    } else {
        m1
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < EPS
            && (a.g - b.g).abs() < EPS
            && (a.b - b.b).abs() < EPS
            && (a.a - b.a).abs() < EPS
    }

    #[test]
    fn test_rgba8() {
        let c = Color::rgba8(255, 0, 51, 255);
        assert!(close(c, Color::new(1.0, 0.0, 0.2, 1.0)));
        assert_eq!(Color::rgb8(0, 0, 0), Color::black());
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(Color::hsl(0.0, 1.0, 0.5), Color::new_rgb(1.0, 0.0, 0.0)));
        assert!(close(Color::hsl(1.0 / 3.0, 1.0, 0.5), Color::new_rgb(0.0, 1.0, 0.0)));
        assert!(close(Color::hsl(2.0 / 3.0, 1.0, 0.5), Color::new_rgb(0.0, 0.0, 1.0)));
        // Hue wraps around.
        assert!(close(Color::hsl(-1.0, 1.0, 0.5), Color::hsl(0.0, 1.0, 0.5)));
        // Zero saturation is grey.
        assert!(close(Color::hsl(0.3, 0.0, 0.25), Color::mono(0.25, 1.0)));
    }

    #[test]
    fn test_gradient_clamps() {
        let a = Color::black();
        let b = Color::white();
        assert!(close(a.gradient(&b, 0.5), Color::mono(0.5, 1.0)));
        assert_eq!(a.gradient(&b, 2.0), b);
        assert_eq!(a.gradient(&b, -1.0), a);
    }

    #[test]
    fn test_opacity_and_premultiply() {
        let c = Color::white().with_opacity(0.5);
        assert_eq!(c.a, 0.5);
        assert_eq!(c.premultiplied().to_array(), [0.5, 0.5, 0.5, 0.5]);
    }
}
