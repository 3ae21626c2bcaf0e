/// 8-bit RGB colour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLUE: Rgb = Rgb::new(0, 121, 241);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Converts hue/saturation/value to RGB.
    ///
    /// All three inputs are fractions; the hue wraps, so `1.25` is the same as `0.25`.
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let saturation = saturation.clamp(0.0, 1.0);
        let value = value.clamp(0.0, 1.0);
        if saturation == 0.0 {
            let v = channel(value);
            return Rgb::new(v, v, v);
        }

        let h = (hue - hue.floor()) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * f);
        let t = value * (1.0 - saturation * (1.0 - f));

        let (r, g, b) = match sector as u8 {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

fn channel(fraction: f64) -> u8 {
    (fraction * 255.0 + 0.5) as u8
}
