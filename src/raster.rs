//! Software rasterizer backing the on-screen starfield.
//!
//! Pixels persist between frames so the translucent fade painted at the
//! start of every tick leaves fading afterimages behind moving stars.

use iced::image;
use iced::{Color, Point, Rectangle};

use crate::surface::{sample_stops, ColorStop, Surface};

pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl Raster {
    /// A black raster. Zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Raster {
            width,
            height,
            pixels: vec![[0.0; 3]; width as usize * height as usize],
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.iter_mut() {
            *pixel = [0.0; 3];
        }
    }

    /// BGRA bytes, the layout `image::Handle::from_pixels` expects.
    pub fn to_bgra(&self) -> Vec<u8> {
        let quantize = |v: f32| (v.max(0.0).min(1.0) * 255.0).round() as u8;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for [r, g, b] in self.pixels.iter().copied() {
            bytes.extend_from_slice(&[quantize(b), quantize(g), quantize(r), 255]);
        }
        bytes
    }

    pub fn to_handle(&self) -> image::Handle {
        image::Handle::from_pixels(self.width, self.height, self.to_bgra())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Blends a premultiplied `[r, g, b, a]` over the pixel at `(x, y)`.
    fn blend(&mut self, x: u32, y: u32, src: [f32; 4]) {
        let index = self.index(x, y);
        let pixel = &mut self.pixels[index];
        let keep = 1.0 - src[3];
        pixel[0] = src[0] + pixel[0] * keep;
        pixel[1] = src[1] + pixel[1] * keep;
        pixel[2] = src[2] + pixel[2] * keep;
    }

    /// Pixel rows and columns touched by a disc, clipped to the raster.
    fn disc_bounds(&self, center: Point, radius: f32) -> Option<(u32, u32, u32, u32)> {
        let reach = radius + 1.0;
        let x0 = (center.x - reach).floor().max(0.0);
        let y0 = (center.y - reach).floor().max(0.0);
        let x1 = (center.x + reach).ceil().min(self.width as f32);
        let y1 = (center.y + reach).ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl Surface for Raster {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        let x0 = rect.x.max(0.0).round() as u32;
        let y0 = rect.y.max(0.0).round() as u32;
        let x1 = ((rect.x + rect.width).round().max(0.0) as u32).min(self.width);
        let y1 = ((rect.y + rect.height).round().max(0.0) as u32).min(self.height);
        let src = [color.r * color.a, color.g * color.a, color.b * color.a, color.a];

        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, src);
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        if !(radius > 0.0) || color.a <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = match self.disc_bounds(center, radius) {
            Some(bounds) => bounds,
            None => return,
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let distance = (x as f32 + 0.5 - center.x).hypot(y as f32 + 0.5 - center.y);
                // one pixel of anti-aliased edge
                let coverage = (radius + 0.5 - distance).max(0.0).min(1.0);
                if coverage > 0.0 {
                    let a = color.a * coverage;
                    self.blend(x, y, [color.r * a, color.g * a, color.b * a, a]);
                }
            }
        }
    }

    fn fill_radial_gradient(&mut self, center: Point, radius: f32, stops: &[ColorStop]) {
        if !(radius > 0.0) || stops.is_empty() {
            return;
        }
        let (x0, y0, x1, y1) = match self.disc_bounds(center, radius) {
            Some(bounds) => bounds,
            None => return,
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let distance = (x as f32 + 0.5 - center.x).hypot(y as f32 + 0.5 - center.y);
                if distance <= radius {
                    self.blend(x, y, sample_stops(stops, distance / radius));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::surface::glow_stops;

    fn square(side: f32) -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: side,
            height: side,
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn translucent_black_fades_existing_pixels() {
        let mut raster = Raster::new(4, 4);
        raster.fill_rect(square(4.0), Color::WHITE);
        raster.fill_rect(square(4.0), Color::from_rgba(0.0, 0.0, 0.0, 0.2));

        let pixel = raster.pixel(3, 3).unwrap();
        assert!(close(pixel[0], 0.8));
        assert!(close(pixel[2], 0.8));
    }

    #[test]
    fn circle_covers_its_center_and_not_far_pixels() {
        let mut raster = Raster::new(20, 20);
        raster.fill_circle(Point::new(10.0, 10.0), 3.0, Color::from_rgb(1.0, 0.0, 0.0));

        let center = raster.pixel(10, 10).unwrap();
        assert!(close(center[0], 1.0));
        assert!(close(center[1], 0.0));
        assert_eq!(raster.pixel(0, 0).unwrap(), [0.0; 3]);
    }

    #[test]
    fn shapes_outside_the_raster_are_clipped() {
        let mut raster = Raster::new(8, 8);
        raster.fill_circle(Point::new(-50.0, 400.0), 5.0, Color::WHITE);
        raster.fill_radial_gradient(Point::new(100.0, 100.0), 3.0, &glow_stops(Rgb::WHITE));
        raster.fill_circle(Point::new(4.0, 4.0), 0.0, Color::WHITE);

        assert!(raster.to_bgra().chunks(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn glow_is_brightest_at_the_core() {
        let mut raster = Raster::new(40, 40);
        raster.fill_radial_gradient(Point::new(20.0, 20.0), 15.0, &glow_stops(Rgb::WHITE));

        let core = raster.pixel(20, 20).unwrap()[0];
        let halo = raster.pixel(27, 20).unwrap()[0];
        let rim = raster.pixel(34, 20).unwrap()[0];
        assert!(core > halo && halo > rim);
        assert!(rim < 0.1);
    }

    #[test]
    fn bgra_layout_swaps_red_and_blue() {
        let mut raster = Raster::new(1, 1);
        raster.fill_rect(square(1.0), Color::from_rgb(1.0, 0.0, 0.0));
        assert_eq!(raster.to_bgra(), vec![0, 0, 255, 255]);
    }

    #[test]
    fn zero_sized_raster_still_has_a_pixel() {
        let raster = Raster::new(0, 0);
        assert_eq!(raster.size(), (1, 1));
    }
}
