use crate::{
    color::Rgba,
    surface::{Layer, Paint, Rect, Shape, Style, Surface},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Effects age by frame, not by song time.
pub const PARTICLE_STEP: f32 = 1.0 / 60.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    size: f32,
    color: Rgba,
    age: f32,
    life: f32,
}

impl Particle {
    fn advance(&mut self, dt: f32, gravity: f32, drag: f32) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.vy += gravity * dt;

        let keep = (1.0 - drag * dt).max(0.0);
        self.vx *= keep;
        self.vy *= keep;
        self.age += dt;
    }

    pub fn remaining(&self) -> f32 {
        (1.0 - self.age / self.life).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.life
    }
}

pub struct Emitter {
    particles: Vec<Particle>,
    layer: Layer,
    gravity: f32,
    drag: f32,
    rng: StdRng,
}

impl Emitter {
    fn new(layer: Layer, gravity: f32, drag: f32) -> Self {
        Self {
            particles: Vec::new(),
            layer,
            gravity,
            drag,
            rng: StdRng::seed_from_u64(rand::random()),
        }
    }

    pub fn notes() -> Self {
        Self::new(Layer::Foreground, 0.0, 1.5)
    }

    pub fn keys() -> Self {
        Self::new(Layer::KeyEffects, 400.0, 3.0)
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..self
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// `(x, w)` is the note span, `y` the hit line and `h` the key row height.
    #[allow(clippy::too_many_arguments)]
    pub fn emit_note(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgba,
        velocity: u8,
        up: bool,
        down: bool,
    ) {
        if !(x.is_finite() && y.is_finite() && w > 0.0 && h > 0.0) {
            return;
        }

        let strength = velocity.min(127) as f32 / 127.0;
        let count = 1 + velocity.min(127) as usize * 3 / 127;

        for (enabled, sign, origin) in [(up, -1.0, y), (down, 1.0, y + h)] {
            if !enabled {
                continue;
            }

            for _ in 0..count {
                let speed = self.rng.random_range(60.0_f32..180.0) * (0.5 + strength);
                let particle = Particle {
                    x: x + w * self.rng.random::<f32>(),
                    y: origin,
                    vx: self.rng.random_range(-30.0_f32..30.0),
                    vy: sign * speed,
                    size: h * self.rng.random_range(0.015_f32..0.035),
                    color,
                    age: 0.0,
                    life: self.rng.random_range(0.4_f32..0.9),
                };
                self.particles.push(particle);
            }
        }
    }

    pub fn emit_impact(&mut self, key: Rect, color: Rgba) {
        if key.is_empty() || !(key.x.is_finite() && key.y.is_finite()) {
            return;
        }

        for _ in 0..8 {
            let particle = Particle {
                x: key.x + key.w * self.rng.random::<f32>(),
                y: key.y + key.h * self.rng.random_range(0.0_f32..0.2),
                vx: self.rng.random_range(-60.0_f32..60.0),
                vy: -self.rng.random_range(80.0_f32..220.0),
                size: key.w * self.rng.random_range(0.08_f32..0.16),
                color: color.lighten(60),
                age: 0.0,
                life: self.rng.random_range(0.25_f32..0.5),
            };
            self.particles.push(particle);
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        let (gravity, drag) = (self.gravity, self.drag);

        for particle in &mut self.particles {
            particle.advance(dt, gravity, drag);
        }

        self.particles.retain(|particle| !particle.is_expired());
    }

    pub fn render<S: Surface>(&self, surface: &mut S) -> Result<(), String> {
        for particle in &self.particles {
            let remaining = particle.remaining();
            let style = Style::fill(self.layer, Paint::Solid(particle.color))
                .with_alpha(particle.color.a * remaining);

            surface.draw(
                &Shape::Circle {
                    x: particle.x,
                    y: particle.y,
                    r: particle.size * (0.5 + 0.5 * remaining),
                },
                &style,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recorder::Recorder;

    fn steps_past(life: f32) -> usize {
        (life / PARTICLE_STEP).ceil() as usize + 1
    }

    #[test]
    fn note_particles_drain_to_zero() {
        let mut e = Emitter::notes().with_seed(7);
        for i in 0..10 {
            e.emit_note(i as f32 * 10.0, 300.0, 10.0, 90.0, Rgba::WHITE, 127, true, true);
        }
        assert_eq!(e.len(), 10 * 4 * 2);

        for _ in 0..steps_past(0.9) {
            e.update(PARTICLE_STEP);
        }
        assert_eq!(e.len(), 0);
    }

    #[test]
    fn impact_particles_drain_to_zero() {
        let mut e = Emitter::keys().with_seed(1);
        e.emit_impact(Rect::new(0.0, 500.0, 10.0, 90.0), Rgba::rgb(200, 10, 10));
        assert_eq!(e.len(), 8);

        for _ in 0..steps_past(0.5) {
            e.update(PARTICLE_STEP);
        }
        assert!(e.is_empty());
    }

    #[test]
    fn particles_fade_and_move() {
        let mut e = Emitter::notes().with_seed(3);
        e.emit_note(0.0, 300.0, 10.0, 90.0, Rgba::WHITE, 0, true, false);
        let before = e.particles[0].clone();

        e.update(PARTICLE_STEP);
        let after = &e.particles[0];
        assert!(after.y < before.y);
        assert!(after.remaining() < before.remaining());
    }

    #[test]
    fn degenerate_emissions_are_ignored() {
        let mut e = Emitter::notes().with_seed(3);
        e.emit_note(f32::NAN, 300.0, 10.0, 90.0, Rgba::WHITE, 100, true, true);
        e.emit_note(0.0, 300.0, 0.0, 90.0, Rgba::WHITE, 100, true, true);
        e.emit_note(0.0, 300.0, 10.0, 90.0, Rgba::WHITE, 100, false, false);
        assert!(e.is_empty());

        let mut k = Emitter::keys().with_seed(3);
        k.emit_impact(Rect::new(0.0, 0.0, 0.0, 10.0), Rgba::WHITE);
        assert!(k.is_empty());
    }

    #[test]
    fn bad_step_does_not_age() {
        let mut e = Emitter::notes().with_seed(3);
        e.emit_note(0.0, 300.0, 10.0, 90.0, Rgba::WHITE, 0, true, false);
        e.update(f32::NAN);
        e.update(-1.0);
        assert_eq!(e.particles[0].remaining(), 1.0);
    }

    #[test]
    fn renders_on_its_own_layer() {
        let mut e = Emitter::keys().with_seed(9);
        e.emit_impact(Rect::new(0.0, 500.0, 10.0, 90.0), Rgba::WHITE);

        let mut r = Recorder::new(100.0, 600.0);
        e.render(&mut r).unwrap();
        assert_eq!(r.calls.len(), 8);
        assert_eq!(r.on(Layer::KeyEffects).count(), 8);
    }
}
