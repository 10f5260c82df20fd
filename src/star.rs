use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::TAU;

use iced::{Point, Size};

use crate::parameters::{max_trail_len, Parameters};
use crate::surface::{glow_stops, Surface};

/// Opacity of the newest trail echo.
const TRAIL_OPACITY: f32 = 0.7;
const TRAIL_SCALE: f32 = 1.5;

/// A past position of a star, with the depth it had at the time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A single star flying outward from the center of the surface.
///
/// Positions are offsets from the surface center.
#[derive(Clone, Debug)]
pub struct Star {
    x: f32,
    y: f32,
    z: f32,
    dx: f32,
    dy: f32,
    speed: f32,
    size: f32,
    trail: VecDeque<TrailSample>,
}

impl Star {
    pub fn new<R: Rng>(rng: &mut R, width: f32, speed_factor: f32) -> Self {
        let mut star = Star {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            dx: 1.0,
            dy: 0.0,
            speed: 0.0,
            size: 0.0,
            trail: VecDeque::new(),
        };
        star.reset(rng, width, speed_factor);
        star
    }

    /// Sends the star back to the center with fresh depth, heading, speed
    /// and size, dropping its trail.
    pub fn reset<R: Rng>(&mut self, rng: &mut R, width: f32, speed_factor: f32) {
        let angle = rng.gen_range(0.0..TAU);

        self.x = 0.0;
        self.y = 0.0;
        self.z = rng.gen::<f32>() * width;
        self.speed = rng.gen_range(2.0..7.0) * speed_factor;
        self.size = rng.gen_range(0.5..2.5);
        self.dx = angle.cos();
        self.dy = angle.sin();
        self.trail.clear();
    }

    pub fn update<R: Rng>(&mut self, parameters: &Parameters, bounds: Size, rng: &mut R) {
        if parameters.trail > 0 {
            self.trail.push_back(TrailSample {
                x: self.x,
                y: self.y,
                z: self.z,
            });
            let max_len = max_trail_len(parameters.trail);
            while self.trail.len() > max_len {
                self.trail.pop_front();
            }
        } else {
            self.trail.clear();
        }

        self.x += self.dx * self.speed;
        self.y += self.dy * self.speed;

        if self.distance() > corner_radius(bounds) {
            self.reset(rng, bounds.width, parameters.speed_factor());
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, parameters: &Parameters) {
        let width = surface.width();
        let center = surface.center();
        let position = Point::new(center.x + self.x, center.y + self.y);
        let size = self.size * depth_scale(width, self.z) * 2.0;
        let color = parameters.color;

        if parameters.trail > 0 && !self.trail.is_empty() {
            let len = self.trail.len() as f32;
            for (i, sample) in self.trail.iter().enumerate() {
                let age = i as f32 / len;
                let radius = self.size * depth_scale(width, sample.z) * TRAIL_SCALE * age;
                surface.fill_circle(
                    Point::new(center.x + sample.x, center.y + sample.y),
                    radius,
                    color.with_alpha(age * TRAIL_OPACITY),
                );
            }
        }

        if parameters.glow > 0 {
            let radius = size * (1.0 + parameters.glow as f32 / 5.0);
            surface.fill_radial_gradient(position, radius, &glow_stops(color));
        }

        surface.fill_circle(position, size, color.opaque());
    }

    pub fn distance(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

#[cfg(test)]
impl Star {
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn direction(&self) -> (f32, f32) {
        (self.dx, self.dy)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn trail(&self) -> &VecDeque<TrailSample> {
        &self.trail
    }
}

/// Distance from the center of `bounds` to a corner.
pub fn corner_radius(bounds: Size) -> f32 {
    (bounds.width / 2.0).hypot(bounds.height / 2.0)
}

/// Stars with a larger depth are drawn smaller.
pub fn depth_scale(width: f32, z: f32) -> f32 {
    (width - z) / width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recorder::{DrawCommand, Recorder};
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BOUNDS: Size = Size {
        width: 800.0,
        height: 600.0,
    };

    fn star_at(x: f32, y: f32) -> Star {
        Star {
            x,
            y,
            z: 0.0,
            dx: 1.0,
            dy: 0.0,
            speed: 3.0,
            size: 1.0,
            trail: VecDeque::new(),
        }
    }

    fn with_trail(trail: u32) -> Parameters {
        Parameters {
            trail,
            ..Parameters::default()
        }
    }

    #[test]
    fn reset_from_fixed_sequence() {
        // an all-zero source yields the lower bound of every range
        let mut rng = StepRng::new(0, 0);
        let star = Star::new(&mut rng, 800.0, 0.5);

        assert_eq!(star.position(), (0.0, 0.0));
        assert_eq!(star.z, 0.0);
        assert_eq!(star.direction(), (1.0, 0.0));
        assert_eq!(star.speed(), 1.0);
        assert_eq!(star.size, 0.5);
    }

    #[test]
    fn corner_radius_of_800_by_600_is_500() {
        assert!((corner_radius(BOUNDS) - 500.0).abs() < 1e-3);
    }

    #[test]
    fn stays_inside_the_corner_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut star = star_at(401.0, 1.0);

        star.update(&with_trail(0), BOUNDS, &mut rng);
        assert_eq!(star.position(), (404.0, 1.0));
    }

    #[test]
    fn resets_beyond_the_corner_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut star = star_at(451.0, 301.0);
        star.update(&with_trail(80), BOUNDS, &mut rng);

        assert_eq!(star.position(), (0.0, 0.0));
        assert!(star.trail().is_empty());
    }

    #[test]
    fn trail_saturates_at_cap() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut star = star_at(0.0, 0.0);
        let parameters = with_trail(80);

        for _ in 0..20 {
            star.update(&parameters, BOUNDS, &mut rng);
        }

        assert_eq!(star.trail().len(), 9);
        // oldest first
        assert_eq!(star.trail().front().unwrap().x, 33.0);
        assert_eq!(star.trail().back().unwrap().x, 57.0);
    }

    #[test]
    fn zero_trail_clears_history_immediately() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut star = star_at(0.0, 0.0);
        for _ in 0..5 {
            star.update(&with_trail(50), BOUNDS, &mut rng);
        }
        assert_eq!(star.trail().len(), 5);

        star.update(&with_trail(0), BOUNDS, &mut rng);
        assert!(star.trail().is_empty());
    }

    #[test]
    fn nearer_stars_are_drawn_larger() {
        let parameters = Parameters {
            trail: 0,
            glow: 0,
            ..Parameters::default()
        };
        let mut near = star_at(0.0, 0.0);
        let mut far = star_at(0.0, 0.0);
        near.z = 0.0;
        far.z = 600.0;

        let mut surface = Recorder::new(800.0, 600.0);
        near.draw(&mut surface, &parameters);
        far.draw(&mut surface, &parameters);

        let circles = surface.circles();
        assert_eq!(circles[0].1, 2.0);
        assert_eq!(circles[1].1, 0.5);
        assert_eq!(circles[0].0, Point::new(400.0, 300.0));
    }

    #[test]
    fn draws_trail_then_glow_then_core() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut star = star_at(10.0, -20.0);
        let parameters = Parameters {
            trail: 30,
            glow: 5,
            ..Parameters::default()
        };
        for _ in 0..4 {
            star.update(&parameters, BOUNDS, &mut rng);
        }

        let mut surface = Recorder::new(800.0, 600.0);
        star.draw(&mut surface, &parameters);

        assert_eq!(surface.commands.len(), 4 + 1 + 1);
        let trail: Vec<(f32, f32)> = surface.commands[..4]
            .iter()
            .map(|command| match command {
                DrawCommand::Circle { radius, color, .. } => (*radius, color.a),
                other => panic!("expected trail circle, got {:?}", other),
            })
            .collect();
        // older echoes are smaller and fainter
        assert_eq!(trail[0], (0.0, 0.0));
        assert!(trail.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));
        assert!(trail[3].1 < TRAIL_OPACITY);

        match &surface.commands[4] {
            DrawCommand::Gradient { center, radius, .. } => {
                assert_eq!(*center, Point::new(422.0, 280.0));
                assert_eq!(*radius, 4.0);
            }
            other => panic!("expected glow, got {:?}", other),
        }
        match &surface.commands[5] {
            DrawCommand::Circle { radius, color, .. } => {
                assert_eq!(*radius, 2.0);
                assert_eq!(color.a, 1.0);
            }
            other => panic!("expected core, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn direction_is_unit_after_reset(seed in any::<u64>(), factor in 0.0f32..5.0) {
            let mut rng = StdRng::seed_from_u64(seed);
            let star = Star::new(&mut rng, 1024.0, factor);
            let (dx, dy) = star.direction();
            prop_assert!((dx.hypot(dy) - 1.0).abs() < 1e-5);
            prop_assert!(star.z >= 0.0 && star.z < 1024.0);
        }

        #[test]
        fn trail_never_exceeds_cap(seed in any::<u64>(), trail in 0u32..=100, steps in 0usize..60) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut star = Star::new(&mut rng, BOUNDS.width, 1.0);
            let parameters = with_trail(trail);
            for _ in 0..steps {
                star.update(&parameters, BOUNDS, &mut rng);
                prop_assert!(star.trail().len() <= max_trail_len(trail));
            }
        }
    }
}
