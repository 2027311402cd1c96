// Simple particle struct to keep track of individual position, velocity,
// and the look it was given when it was spawned

use crate::color::Color;
use crate::surface::Surface;
use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    size: f64,
    opacity: f64,
    color: Color,
}

impl Particle {
    pub const MIN_SIZE: f64 = 0.5;
    pub const MAX_SIZE: f64 = 2.5;
    pub const MAX_SPEED: f64 = 0.25;
    pub const MIN_OPACITY: f64 = 0.3;
    pub const MAX_OPACITY: f64 = 0.7;

    pub fn new(
        pos_x: f64,
        pos_y: f64,
        vel_x: f64,
        vel_y: f64,
        size: f64,
        opacity: f64,
        color: Color,
    ) -> Particle {
        Particle {
            pos: [pos_x, pos_y],
            vel: [vel_x, vel_y],
            size,
            opacity,
            color,
        }
    }

    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: Vector2<f64>, palette: [Color; 2]) -> Particle {
        let mut p = Particle::new(0.0, 0.0, 0.0, 0.0, Self::MIN_SIZE, Self::MIN_OPACITY, palette[0]);
        p.reset(rng, bounds, palette);
        p
    }

    // Every draw is independent, position covers the whole surface
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: Vector2<f64>, palette: [Color; 2]) {
        self.pos = [rng.gen::<f64>() * bounds[0], rng.gen::<f64>() * bounds[1]];
        self.size = rng.gen::<f64>() * (Self::MAX_SIZE - Self::MIN_SIZE) + Self::MIN_SIZE;
        self.vel = [
            (rng.gen::<f64>() - 0.5) * 2.0 * Self::MAX_SPEED,
            (rng.gen::<f64>() - 0.5) * 2.0 * Self::MAX_SPEED,
        ];
        self.opacity = rng.gen::<f64>() * (Self::MAX_OPACITY - Self::MIN_OPACITY) + Self::MIN_OPACITY;
        self.color = if rng.gen::<f64>() > 0.5 {
            palette[0]
        } else {
            palette[1]
        };
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn update(
        &mut self,
        bounds: Vector2<f64>,
        pointer: Vector2<f64>,
        pointer_radius: f64,
        repulsion: f64,
    ) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);

        // Reflect, don't clamp. The particle may sit one step outside until
        // the flipped velocity carries it back.
        if self.pos[0] < 0.0 || self.pos[0] > bounds[0] {
            self.vel[0] *= -1.0;
        }
        if self.pos[1] < 0.0 || self.pos[1] > bounds[1] {
            self.vel[1] *= -1.0;
        }

        let to_pointer = vecmath::vec2_sub(pointer, self.pos);
        if vecmath::vec2_len(to_pointer) < pointer_radius {
            self.pos = vecmath::vec2_sub(self.pos, vecmath::vec2_scale(to_pointer, repulsion));
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.draw_filled_circle(self.pos[0], self.pos[1], self.size, self.color, self.opacity);
    }
}
