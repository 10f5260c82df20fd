use rand::Rng;

use iced::{Color, Rectangle, Size};

use crate::color::Rgb;
use crate::error::ColorError;
use crate::parameters::Parameters;
use crate::star::Star;
use crate::surface::Surface;

/// Alpha of the black wash painted over the surface every frame.
pub const FADE_ALPHA: f32 = 0.2;

/// A change notification from one of the control channels, carrying the
/// raw control value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterChange {
    Speed(f32),
    Color(String),
    Density(u32),
    Trail(u32),
    Glow(u32),
}

/// Owns the stars and the parameters they are updated and drawn with.
pub struct Starfield<R> {
    stars: Vec<Star>,
    parameters: Parameters,
    rng: R,
    width: f32,
}

impl<R: Rng> Starfield<R> {
    /// Builds `parameters.density` stars for a surface `width` wide.
    pub fn new(parameters: Parameters, width: f32, rng: R) -> Self {
        let mut field = Starfield {
            stars: Vec::new(),
            parameters,
            rng,
            width,
        };
        field.rebuild();
        field
    }

    /// Discards every star and creates a fresh collection.
    pub fn rebuild(&mut self) {
        let count = self.parameters.density as usize;
        let speed_factor = self.parameters.speed_factor();

        let mut stars = Vec::with_capacity(count);
        for _ in 0..count {
            stars.push(Star::new(&mut self.rng, self.width, speed_factor));
        }
        self.stars = stars;
        tracing::debug!(count, "rebuilt star collection");
    }

    /// Fades the previous frame, then updates and draws every star.
    pub fn tick<S: Surface>(&mut self, surface: &mut S) {
        let bounds = Size::new(surface.width(), surface.height());
        self.width = bounds.width;

        surface.fill_rect(
            Rectangle {
                x: 0.0,
                y: 0.0,
                width: bounds.width,
                height: bounds.height,
            },
            Color::from_rgba(0.0, 0.0, 0.0, FADE_ALPHA),
        );

        let parameters = &self.parameters;
        let rng = &mut self.rng;
        for star in self.stars.iter_mut() {
            star.update(parameters, bounds, rng);
            star.draw(surface, parameters);
        }
    }

    pub fn apply(&mut self, change: ParameterChange) -> Result<(), ColorError> {
        tracing::debug!(?change, "parameter change");
        match change {
            ParameterChange::Speed(speed) => self.set_speed(speed),
            ParameterChange::Color(hex) => self.set_color(hex.parse()?),
            ParameterChange::Density(density) => self.set_density(density),
            ParameterChange::Trail(trail) => self.parameters.trail = trail,
            ParameterChange::Glow(glow) => self.parameters.glow = glow,
        }
        Ok(())
    }

    /// Stars pick up the new speed factor at their next reset.
    pub fn set_speed(&mut self, speed: f32) {
        self.parameters.speed = speed;
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.parameters.color = color;
    }

    pub fn set_density(&mut self, density: u32) {
        self.parameters.density = density;
        self.rebuild();
    }

    /// Replaces every parameter and rebuilds the collection.
    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.width = parameters.width as f32;
        self.parameters = parameters;
        self.rebuild();
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}
