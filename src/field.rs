// The particle field: a fixed pool of particles advanced once per frame,
// drawn to a surface and joined by fading lines when two of them are close.

use crate::color::Color;
use crate::error::FieldError;
use crate::particle::Particle;
use crate::surface::Surface;
use rand::Rng;
use vecmath::Vector2;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldConfig {
    particle_count: u32,
    pointer_radius: f64,
    repulsion: f64,
    link_distance: f64,
    link_max_opacity: f64,
    link_width: f64,
    link_color: Color,
    palette: [Color; 2],
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            particle_count: FieldConfig::PARTICLE_COUNT,
            pointer_radius: FieldConfig::POINTER_RADIUS,
            repulsion: FieldConfig::REPULSION,
            link_distance: FieldConfig::LINK_DISTANCE,
            link_max_opacity: FieldConfig::LINK_MAX_OPACITY,
            link_width: FieldConfig::LINK_WIDTH,
            link_color: Color::ORANGE,
            palette: [Color::ORANGE, Color::TEAL],
        }
    }
}

// Setters and getters exposed to JS. Colors cross the boundary as RRGGBBAA.
#[wasm_bindgen]
impl FieldConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FieldConfig {
        FieldConfig::default()
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    pub fn set_particle_count(&mut self, count: u32) {
        self.particle_count = count;
    }

    pub fn pointer_radius(&self) -> f64 {
        self.pointer_radius
    }

    pub fn set_pointer_radius(&mut self, radius: f64) {
        self.pointer_radius = radius;
    }

    pub fn repulsion(&self) -> f64 {
        self.repulsion
    }

    pub fn set_repulsion(&mut self, repulsion: f64) {
        self.repulsion = repulsion;
    }

    pub fn link_distance(&self) -> f64 {
        self.link_distance
    }

    pub fn set_link_distance(&mut self, distance: f64) {
        self.link_distance = distance;
    }

    pub fn set_link_max_opacity(&mut self, opacity: f64) {
        self.link_max_opacity = opacity;
    }

    pub fn set_link_width(&mut self, width: f64) {
        self.link_width = width;
    }

    pub fn set_link_color(&mut self, rgba: u32) {
        self.link_color = Color::from_u32(rgba);
    }

    pub fn set_palette(&mut self, first: u32, second: u32) {
        self.palette = [Color::from_u32(first), Color::from_u32(second)];
    }
}

impl FieldConfig {
    pub const PARTICLE_COUNT: u32 = 100;
    pub const POINTER_RADIUS: f64 = 100.0;
    pub const REPULSION: f64 = 0.01;
    pub const LINK_DISTANCE: f64 = 150.0;
    pub const LINK_MAX_OPACITY: f64 = 0.15;
    pub const LINK_WIDTH: f64 = 0.5;

    pub fn palette(&self) -> [Color; 2] {
        self.palette
    }

    pub fn link_color(&self) -> Color {
        self.link_color
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if self.particle_count == 0 {
            return Err(FieldError::InvalidConfig(
                "particle_count must be at least 1".to_owned(),
            ));
        }
        let values = [
            ("pointer_radius", self.pointer_radius),
            ("repulsion", self.repulsion),
            ("link_distance", self.link_distance),
            ("link_max_opacity", self.link_max_opacity),
            ("link_width", self.link_width),
        ];
        for (name, value) in values.iter() {
            if !value.is_finite() || *value < 0.0 {
                return Err(FieldError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.link_distance == 0.0 {
            return Err(FieldError::InvalidConfig(
                "link_distance must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A line between two particles closer than the link distance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub opacity: f64,
}

pub struct ParticleField {
    config: FieldConfig,
    bounds: Vector2<f64>,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Spawns the whole pool up front. Nothing is added or removed afterwards.
    pub fn new<R: Rng + ?Sized>(
        config: FieldConfig,
        bounds: Vector2<f64>,
        rng: &mut R,
    ) -> Result<ParticleField, FieldError> {
        config.validate()?;
        let palette = config.palette();
        let particles = (0..config.particle_count)
            .map(|_| Particle::spawn(rng, bounds, palette))
            .collect();
        Ok(ParticleField {
            config,
            bounds,
            particles,
        })
    }

    /// Builds a field around an existing pool; `particle_count` follows the pool.
    pub fn with_particles(
        mut config: FieldConfig,
        bounds: Vector2<f64>,
        particles: Vec<Particle>,
    ) -> Result<ParticleField, FieldError> {
        config.particle_count = particles.len() as u32;
        config.validate()?;
        Ok(ParticleField {
            config,
            bounds,
            particles,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn bounds(&self) -> Vector2<f64> {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    // Only the bounds change. A particle left outside a shrunken area has
    // its velocity flipped every frame, so it jitters in place by one step
    // until the bounds grow back past it.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = [width, height];
    }

    pub fn update(&mut self, pointer: Vector2<f64>) {
        let bounds = self.bounds;
        let radius = self.config.pointer_radius;
        let repulsion = self.config.repulsion;
        for particle in &mut self.particles {
            particle.update(bounds, pointer, radius, repulsion);
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for particle in &self.particles {
            particle.draw(surface);
        }
    }

    /// Every unordered pair closer than `link_distance`, with opacity fading
    /// linearly to zero at the threshold.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let n = self.particles.len();
        let max_distance = self.config.link_distance;
        let max_opacity = self.config.link_max_opacity;
        (0..n)
            .flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
            .filter_map(move |(a, b)| {
                let offset = vecmath::vec2_sub(self.particles[a].pos, self.particles[b].pos);
                let distance = vecmath::vec2_len(offset);
                if distance < max_distance {
                    Some(Link {
                        a,
                        b,
                        distance,
                        opacity: max_opacity * (1.0 - distance / max_distance),
                    })
                } else {
                    None
                }
            })
    }

    pub fn draw_links<S: Surface + ?Sized>(&self, surface: &mut S) {
        let color = self.config.link_color;
        let width = self.config.link_width;
        for link in self.links() {
            surface.draw_line(
                self.particles[link.a].pos,
                self.particles[link.b].pos,
                color,
                link.opacity,
                width,
            );
        }
    }

    /// One full frame: clear, move, draw particles, draw links.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S, pointer: Vector2<f64>) {
        surface.clear();
        self.update(pointer);
        self.draw(surface);
        self.draw_links(surface);
    }
}
