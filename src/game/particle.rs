//! Particle bursts shown when a pair matches and during the victory cascade.

use rand::Rng;

/// Particles spawned per burst.
pub const BURST_SIZE: usize = 15;
const GRAVITY: f64 = 0.2;
const DECAY: f64 = 0.02;

pub struct Particle {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    /// Remaining life in (0,1]; doubles as the draw alpha.
    pub life: f64,
    pub size: f64,
    hue: f64,
}

impl Particle {
    pub fn new(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            vx: rng.gen_range(-4.0..4.0),
            vy: rng.gen_range(-4.0..4.0) - 2.0,
            life: 1.0,
            size: rng.gen_range(2.0..8.0),
            hue: rng.gen_range(0.0..360.0),
        }
    }

    /// Integrate one step; false once the particle is spent.
    pub fn update(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.life -= DECAY;
        self.life > 0.0
    }

    pub fn color(&self) -> String {
        format!("hsl({}, 70%, 60%)", self.hue as i32)
    }
}

/// Spawn one burst centered on (x, y).
pub fn burst(x: f64, y: f64, rng: &mut impl Rng) -> Vec<Particle> {
    (0..BURST_SIZE).map(|_| Particle::new(x, y, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn burst_spawns_fifteen_particles_at_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let particles = burst(40.0, 60.0, &mut rng);
        assert_eq!(particles.len(), BURST_SIZE);
        for p in &particles {
            assert_eq!((p.x, p.y), (40.0, 60.0));
            assert_eq!(p.life, 1.0);
        }
    }

    #[test]
    fn update_reports_death_when_life_runs_out() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut p = Particle::new(0.0, 0.0, &mut rng);
        p.life = DECAY;
        assert!(!p.update(), "life hitting zero must report death");
        assert!(p.life <= 0.0);
    }

    #[test]
    fn update_applies_gravity_each_step() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = Particle::new(0.0, 0.0, &mut rng);
        let vy0 = p.vy;
        p.update();
        assert!((p.vy - (vy0 + GRAVITY)).abs() < 1e-12);
        p.update();
        assert!((p.vy - (vy0 + 2.0 * GRAVITY)).abs() < 1e-12);
    }

    #[test]
    fn particle_survives_roughly_fifty_steps() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut p = Particle::new(0.0, 0.0, &mut rng);
        let mut steps = 0;
        while p.update() {
            steps += 1;
            assert!(steps < 60, "particle should have decayed by now");
        }
        assert!((49..=50).contains(&steps), "died after {steps} steps");
    }
}
