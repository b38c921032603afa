use glam::Vec3;
use rand::Rng;

use crate::camera::PerspectiveCamera;
use crate::config::BackdropConfig;
use crate::particles::ParticleGroup;
use crate::types::{InstanceRaw, SceneUniform, Vertex};

/// Flat-shaded triangle list shared by every particle
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    vertices: Vec<Vertex>,
}

impl Geometry {
    /// Regular octahedron with its vertices `radius` away from the origin
    pub fn octahedron(radius: f32) -> Self {
        let signs = [-1.0f32, 1.0];
        let mut vertices = Vec::with_capacity(24);

        for sx in signs {
            for sy in signs {
                for sz in signs {
                    vertices.extend(face(
                        Vec3::new(sx * radius, 0.0, 0.0),
                        Vec3::new(0.0, sy * radius, 0.0),
                        Vec3::new(0.0, 0.0, sz * radius),
                    ));
                }
            }
        }

        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

/// One triangle wound counter-clockwise when seen from outside
fn face(a: Vec3, b: Vec3, c: Vec3) -> [Vertex; 3] {
    let centroid = (a + b + c) / 3.0;
    let mut normal = (b - a).cross(c - a).normalize();
    let (b, c) = if normal.dot(centroid) < 0.0 {
        normal = -normal;
        (c, b)
    } else {
        (b, c)
    };
    let n = normal.to_array();
    [
        Vertex { position: a.to_array(), normal: n },
        Vertex { position: b.to_array(), normal: n },
        Vertex { position: c.to_array(), normal: n },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
}

/// Scene graph: one particle group plus the lights shining on it
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub ambient: AmbientLight,
    pub point: PointLight,
    pub group: ParticleGroup,
    geometry: Geometry,
    material: Material,
}

impl Scene {
    pub fn build<R: Rng + ?Sized>(config: &BackdropConfig, rng: &mut R) -> Self {
        let group = ParticleGroup::scatter(
            config.particle_count,
            config.spread,
            config.scale_range,
            rng,
        );

        Self::with_group(config, group)
    }

    pub fn with_group(config: &BackdropConfig, group: ParticleGroup) -> Self {
        Self {
            ambient: AmbientLight {
                color: config.ambient_light.color,
                intensity: config.ambient_light.intensity,
            },
            point: PointLight {
                color: config.point_light.color,
                intensity: config.point_light.intensity,
                position: Vec3::from_array(config.point_light.position),
            },
            group,
            geometry: Geometry::octahedron(config.particle_radius),
            material: Material {
                color: config.particle_color,
                opacity: 1.0,
            },
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Static per-particle transforms for instanced drawing
    pub fn instances(&self) -> Vec<InstanceRaw> {
        self.group
            .particles()
            .iter()
            .map(|p| InstanceRaw::new(p.model_matrix()))
            .collect()
    }

    /// Per-frame uniform as seen from `camera`
    pub fn uniform(&self, camera: &PerspectiveCamera) -> SceneUniform {
        let [r, g, b] = self.material.color;
        SceneUniform {
            view_proj: camera.view_projection().to_cols_array_2d(),
            group_model: self.group.model_matrix().to_cols_array_2d(),
            base_color: [r, g, b, self.material.opacity],
            ambient: scaled(self.ambient.color, self.ambient.intensity),
            light_position: self.point.position.extend(1.0).to_array(),
            light_color: scaled(self.point.color, self.point.intensity),
        }
    }
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [color[0] * intensity, color[1] * intensity, color[2] * intensity, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn octahedron_has_eight_outward_faces() {
        let geometry = Geometry::octahedron(0.15);
        assert_eq!(geometry.vertex_count(), 24);

        for tri in geometry.vertices().chunks(3) {
            let a = Vec3::from_array(tri[0].position);
            let b = Vec3::from_array(tri[1].position);
            let c = Vec3::from_array(tri[2].position);
            let winding = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(winding.dot(centroid) > 0.0);
            assert!(Vec3::from_array(tri[0].normal).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn octahedron_vertices_sit_on_radius() {
        for v in Geometry::octahedron(2.0).vertices() {
            assert!((Vec3::from_array(v.position).length() - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn build_uses_config() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = BackdropConfig::default();
        let scene = Scene::build(&config, &mut rng);

        assert_eq!(scene.group.len(), 500);
        assert_eq!(scene.instances().len(), 500);
        assert!(scene.point.intensity > scene.ambient.intensity);
        assert_eq!(scene.material().color, config.particle_color);
    }

    #[test]
    fn uniform_tracks_group_rotation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut scene = Scene::build(&BackdropConfig::default(), &mut rng);
        let camera = PerspectiveCamera::new(&CameraConfig::default(), 1.0);

        let still = scene.uniform(&camera);
        assert_eq!(still.group_model, glam::Mat4::IDENTITY.to_cols_array_2d());

        scene.group.advance(0.5);
        let turned = scene.uniform(&camera);
        assert_ne!(turned.group_model, still.group_model);
        assert_eq!(turned.view_proj, still.view_proj);
    }

    #[test]
    fn uniform_premultiplies_light_intensity() {
        let mut rng = StdRng::seed_from_u64(1);
        let scene = Scene::build(&BackdropConfig::default(), &mut rng);
        let camera = PerspectiveCamera::new(&CameraConfig::default(), 1.0);
        let uniform = scene.uniform(&camera);

        assert_eq!(uniform.ambient, [0.4, 0.4, 0.4, 1.0]);
        assert_eq!(uniform.light_position, [10.0, 10.0, 10.0, 1.0]);
    }
}
