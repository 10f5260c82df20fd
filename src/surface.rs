//! The immediate-mode drawing surface the starfield paints onto.

use iced::{Color, Point, Rectangle};

use crate::color::Rgb;

/// A color at a normalized offset along a radial gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

impl ColorStop {
    pub fn new(offset: f32, color: Color) -> Self {
        ColorStop { offset, color }
    }
}

/// 2D drawing context with alpha-blended fills.
///
/// Dimensions are queried on every frame, so implementors may change size
/// between ticks.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn fill_rect(&mut self, rect: Rectangle, color: Color);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Fills a disc of `radius` with a gradient from `center` outwards.
    /// `stops` are ordered by offset in `[0, 1]`.
    fn fill_radial_gradient(&mut self, center: Point, radius: f32, stops: &[ColorStop]);

    fn center(&self) -> Point {
        Point::new(self.width() / 2.0, self.height() / 2.0)
    }
}

/// Halo stops: solid at the core, fading to transparent black at the rim.
pub fn glow_stops(color: Rgb) -> [ColorStop; 4] {
    [
        ColorStop::new(0.0, color.opaque()),
        ColorStop::new(0.1, color.with_alpha(0.8)),
        ColorStop::new(0.4, color.with_alpha(0.2)),
        ColorStop::new(1.0, Color::TRANSPARENT),
    ]
}

/// Samples `stops` at `t`, interpolating premultiplied channels.
///
/// Returns a premultiplied `[r, g, b, a]`.
pub fn sample_stops(stops: &[ColorStop], t: f32) -> [f32; 4] {
    let premultiplied = |c: Color| [c.r * c.a, c.g * c.a, c.b * c.a, c.a];

    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return [0.0; 4],
    };
    if t <= first.offset {
        return premultiplied(first.color);
    }
    if t >= last.offset {
        return premultiplied(last.color);
    }

    for pair in stops.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if t <= to.offset {
            let span = to.offset - from.offset;
            let k = if span > 0.0 {
                (t - from.offset) / span
            } else {
                1.0
            };
            let a = premultiplied(from.color);
            let b = premultiplied(to.color);
            return [
                a[0] + (b[0] - a[0]) * k,
                a[1] + (b[1] - a[1]) * k,
                a[2] + (b[2] - a[2]) * k,
                a[3] + (b[3] - a[3]) * k,
            ];
        }
    }

    premultiplied(last.color)
}
