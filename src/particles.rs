// particles.rs - Decorative particle group
//
// Particles get a random local transform once, at construction. After that
// the only thing that moves is the group's own rotation.
use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

/// One decorative shape; its transform never changes after scattering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Euler angles (XYZ order), each in [0, pi]
    pub rotation: Vec3,
    pub scale: f32,
}

impl Particle {
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.position)
    }
}

/// Ordered collection of particles sharing one group-level rotation
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleGroup {
    particles: Vec<Particle>,
    rotation: Vec3,
}

impl ParticleGroup {
    /// Scatter `count` particles uniformly in a cube of side `spread`
    /// centred at the origin, with per-axis rotation in [0, pi] and a
    /// uniform scale drawn from `scale_range`
    pub fn scatter<R: Rng + ?Sized>(
        count: usize,
        spread: f32,
        scale_range: [f32; 2],
        rng: &mut R,
    ) -> Self {
        let half = spread * 0.5;
        let [min_scale, max_scale] = scale_range;

        let particles = (0..count)
            .map(|_| Particle {
                position: Vec3::new(
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                ),
                rotation: Vec3::new(
                    rng.random_range(0.0..=PI),
                    rng.random_range(0.0..=PI),
                    rng.random_range(0.0..=PI),
                ),
                scale: rng.random_range(min_scale..=max_scale),
            })
            .collect();

        Self {
            particles,
            rotation: Vec3::ZERO,
        }
    }

    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self {
            particles,
            rotation: Vec3::ZERO,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Group rotation as XYZ Euler angles, each wrapped into [0, 2*pi)
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Advance the group's x and y rotation by `step` radians
    pub fn advance(&mut self, step: f32) {
        self.rotation.x = (self.rotation.x + step).rem_euclid(TAU);
        self.rotation.y = (self.rotation.y + step).rem_euclid(TAU);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        ))
    }
}
