//! Line-of-sight probes

use serde::{Deserialize, Serialize};
use void_core::EntityId;

/// Where an actor is looking from and towards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Viewpoint
    pub origin: [f32; 3],
    /// View direction (need not be normalized)
    pub direction: [f32; 3],
}

impl Aim {
    /// Create an aim
    pub fn new(origin: [f32; 3], direction: [f32; 3]) -> Self {
        Self { origin, direction }
    }

    /// Aim from `origin` towards `point`
    pub fn at(origin: [f32; 3], point: [f32; 3]) -> Self {
        Self {
            origin,
            direction: [point[0] - origin[0], point[1] - origin[1], point[2] - origin[2]],
        }
    }
}

/// Result of a probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Distance along the probe
    pub distance: f32,
    /// Object that was hit
    pub hit_object: EntityId,
    /// Hit point in world space
    pub impact_point: [f32; 3],
}

/// World query used to find what an actor is looking at
pub trait WorldProbe {
    /// Cast from `origin` along `direction` up to `max_distance`, skipping
    /// `ignore` (the probing actor itself). Returns the nearest hit.
    fn probe(&self, origin: [f32; 3], direction: [f32; 3], max_distance: f32, ignore: EntityId) -> Option<ProbeHit>;
}

pub(crate) fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

fn normalize(v: [f32; 3]) -> Option<[f32; 3]> {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len <= f32::EPSILON {
        return None;
    }
    Some([v[0] / len, v[1] / len, v[2] / len])
}

/// Probeable sphere
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sphere {
    entity: EntityId,
    center: [f32; 3],
    radius: f32,
}

/// World made of spheres, one per entity
#[derive(Debug, Clone, Default)]
pub struct SphereWorld {
    spheres: Vec<Sphere>,
}

impl SphereWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entity's sphere
    pub fn insert(&mut self, entity: EntityId, center: [f32; 3], radius: f32) {
        self.remove(entity);
        self.spheres.push(Sphere {
            entity,
            center,
            radius: radius.max(0.0),
        });
    }

    /// Move an entity
    pub fn move_to(&mut self, entity: EntityId, center: [f32; 3]) -> bool {
        match self.spheres.iter_mut().find(|sphere| sphere.entity == entity) {
            Some(sphere) => {
                sphere.center = center;
                true
            }
            None => false,
        }
    }

    /// Remove an entity
    pub fn remove(&mut self, entity: EntityId) -> bool {
        let before = self.spheres.len();
        self.spheres.retain(|sphere| sphere.entity != entity);
        self.spheres.len() != before
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl WorldProbe for SphereWorld {
    fn probe(&self, origin: [f32; 3], direction: [f32; 3], max_distance: f32, ignore: EntityId) -> Option<ProbeHit> {
        let dir = normalize(direction)?;

        let mut nearest: Option<ProbeHit> = None;
        for sphere in &self.spheres {
            if sphere.entity == ignore {
                continue;
            }

            // Ray-sphere intersection with a unit direction
            let oc = [
                origin[0] - sphere.center[0],
                origin[1] - sphere.center[1],
                origin[2] - sphere.center[2],
            ];
            let b = oc[0] * dir[0] + oc[1] * dir[1] + oc[2] * dir[2];
            let c = oc[0] * oc[0] + oc[1] * oc[1] + oc[2] * oc[2] - sphere.radius * sphere.radius;
            let discriminant = b * b - c;
            if discriminant < 0.0 {
                continue;
            }
            let root = discriminant.sqrt();
            let t = if -b - root >= 0.0 { -b - root } else { -b + root };
            if t < 0.0 || t > max_distance {
                continue;
            }
            if nearest.map_or(true, |hit| t < hit.distance) {
                nearest = Some(ProbeHit {
                    distance: t,
                    hit_object: sphere.entity,
                    impact_point: [
                        origin[0] + dir[0] * t,
                        origin[1] + dir[1] * t,
                        origin[2] + dir[2] * t,
                    ],
                });
            }
        }
        nearest
    }
}
