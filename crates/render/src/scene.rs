use glam::{IVec3, Vec3};
use std::collections::BTreeMap;
use voxelkit_common::{GridCoord, Viewer};
use voxelkit_kernel::{BlockKind, VisualHandle, VisualSink};

/// Half the edge of a block visual (unit cubes centered on the cell).
const HALF_BLOCK: f32 = 0.5;

/// A ray in world space. `direction` is expected to be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from the viewer's eye along its look direction.
    pub fn from_viewer(viewer: &Viewer) -> Self {
        Self::new(viewer.position, viewer.forward())
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest visual hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub handle: VisualHandle,
    /// Cell the visual was created for.
    pub coord: GridCoord,
    /// Outward unit normal of the face that was hit, when the backend knows it.
    pub normal: Option<IVec3>,
    pub distance: f32,
}

/// Renderer-side ray intersection against block visuals.
pub trait RayQuery {
    /// Nearest visual among `targets` hit by `ray` within `max_distance`.
    fn query_ray(&self, ray: &Ray, max_distance: f32, targets: &[VisualHandle]) -> Option<RayHit>;
}

/// A drawable held by the headless scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub coord: GridCoord,
    pub kind: BlockKind,
    pub color: u32,
}

/// In-memory scene: tracks block visuals as unit cubes and answers ray queries.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    objects: BTreeMap<VisualHandle, SceneObject>,
    next_id: u64,
    created: u64,
    removed: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, handle: VisualHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total visuals ever created and removed.
    pub fn churn(&self) -> (u64, u64) {
        (self.created, self.removed)
    }

    pub fn objects(&self) -> impl Iterator<Item = (VisualHandle, &SceneObject)> {
        self.objects.iter().map(|(h, o)| (*h, o))
    }
}

impl VisualSink for HeadlessScene {
    fn create_visual(&mut self, coord: GridCoord, kind: BlockKind) -> VisualHandle {
        self.next_id += 1;
        self.created += 1;
        let handle = VisualHandle(self.next_id);
        let color = kind.props().color.unwrap_or(0xFF00FF);
        self.objects.insert(handle, SceneObject { coord, kind, color });
        tracing::trace!(?handle, %coord, %kind, "visual created");
        handle
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.objects.remove(&handle).is_some() {
            self.removed += 1;
            tracing::trace!(?handle, "visual removed");
        } else {
            tracing::warn!(?handle, "remove requested for unknown visual");
        }
    }
}

impl RayQuery for HeadlessScene {
    fn query_ray(&self, ray: &Ray, max_distance: f32, targets: &[VisualHandle]) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for handle in targets {
            let Some(object) = self.objects.get(handle) else {
                continue;
            };
            let center = object.coord.center();
            let Some((distance, normal)) = ray_box_entry(
                ray,
                center - Vec3::splat(HALF_BLOCK),
                center + Vec3::splat(HALF_BLOCK),
            ) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(RayHit {
                    handle: *handle,
                    coord: object.coord,
                    normal: Some(normal),
                    distance,
                });
            }
        }
        best
    }
}

/// Slab test returning the entry distance and the outward normal of the
/// entry face. Boxes containing the origin are not hit: their faces point
/// away from the viewer.
fn ray_box_entry(ray: &Ray, min: Vec3, max: Vec3) -> Option<(f32, IVec3)> {
    let inv = |d: f32| if d.abs() < 1e-6 { f32::MAX } else { 1.0 / d };
    let inv_dir = Vec3::new(
        inv(ray.direction.x),
        inv(ray.direction.y),
        inv(ray.direction.z),
    );

    let t1 = (min - ray.origin) * inv_dir;
    let t2 = (max - ray.origin) * inv_dir;
    let near = t1.min(t2);
    let far = t1.max(t2);

    let t_enter = near.max_element();
    let t_exit = far.min_element();
    if t_exit < t_enter || t_enter < 0.0 {
        return None;
    }

    let axis = if near.x >= near.y && near.x >= near.z {
        0
    } else if near.y >= near.z {
        1
    } else {
        2
    };
    let mut normal = IVec3::ZERO;
    normal[axis] = if ray.direction[axis] > 0.0 { -1 } else { 1 };
    Some((t_enter, normal))
}
