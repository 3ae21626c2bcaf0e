use crate::math::Rgb;
use kurbo::Point;

/// Immediate-mode drawing surface the simulation renders through
pub trait Canvas {
    /// Draws a filled circle
    fn draw_circle(&mut self, center: Point, radius: f64, color: Rgb);
}

/// Software RGBA8 framebuffer
pub struct PixelCanvas {
    width: usize,
    height: usize,
    pixel_data: Vec<u8>,
}

impl PixelCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        PixelCanvas {
            width,
            height,
            pixel_data: vec![0u8; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw pixels, row-major, 4 bytes per pixel with separate alpha
    pub fn pixels(&self) -> &[u8] {
        &self.pixel_data
    }

    /// Fills the whole buffer with an opaque colour
    pub fn clear(&mut self, color: Rgb) {
        for pixel in self.pixel_data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    /// Colour at `(x, y)`, or `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        let p = &self.pixel_data[offset..offset + 4];
        Some(Rgb::new(p[0], p[1], p[2]))
    }

    fn put_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        let offset = (y * self.width + x) * 4;
        self.pixel_data[offset..offset + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
    }
}

impl Canvas for PixelCanvas {
    /// Fills every pixel whose centre lies inside the circle, clipped to the buffer
    fn draw_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        if self.width == 0 || self.height == 0 || radius <= 0.0 {
            return;
        }

        // Bounding box of the circle, clamped to the buffer
        let min_x = (center.x - radius).floor().max(0.0);
        let max_x = (center.x + radius).ceil().min(self.width as f64 - 1.0);
        let min_y = (center.y - radius).floor().max(0.0);
        let max_y = (center.y + radius).ceil().min(self.height as f64 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let radius_squared = radius * radius;
        for y in min_y as usize..=max_y as usize {
            let dy = y as f64 + 0.5 - center.y;
            for x in min_x as usize..=max_x as usize {
                let dx = x as f64 + 0.5 - center.x;
                if dx * dx + dy * dy <= radius_squared {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }
}
