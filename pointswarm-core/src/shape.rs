//! Procedural expansion of one anchor point into a truncated octahedron.
//!
//! The geometry shaders build the same shape on the GPU and spell out the
//! same tables; the client tests keep the two in sync. The functions here are
//! the CPU reference for the tables.
//!
//! The shape has 24 vertex slots, grouped in six clusters of four (top,
//! bottom, left, right, front, back). Each cluster is one square face, and
//! the eight hexagons connect them. Every face is listed as a triangle strip
//! winding counter-clockwise when seen from outside.

use glam::{Mat4, Vec3, Vec4};

pub const VERTEX_COUNT: usize = 24;

/// Ambient term added to every face.
pub const AMBIENT: f32 = 0.3;

/// Share of the shape scale the phase variant keeps at phase 0.
pub const PHASE_SCALE_FLOOR: f32 = 0.5;

/// Offsets in units of the half diagonal. `±2` stands for `±h` and `±1` for
/// `±diag / 2`.
pub const OFFSET_PATTERN: [[i8; 3]; VERTEX_COUNT] = [
    // top
    [0, 2, 1],
    [1, 2, 0],
    [-1, 2, 0],
    [0, 2, -1],
    // bottom
    [0, -2, 1],
    [-1, -2, 0],
    [1, -2, 0],
    [0, -2, -1],
    // left
    [-2, 0, 1],
    [-2, 1, 0],
    [-2, -1, 0],
    [-2, 0, -1],
    // right
    [2, 0, 1],
    [2, -1, 0],
    [2, 1, 0],
    [2, 0, -1],
    // front
    [0, -1, 2],
    [1, 0, 2],
    [-1, 0, 2],
    [0, 1, 2],
    // back
    [0, -1, -2],
    [-1, 0, -2],
    [1, 0, -2],
    [0, 1, -2],
];

pub static QUADS: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [8, 9, 10, 11],
    [12, 13, 14, 15],
    [16, 17, 18, 19],
    [20, 21, 22, 23],
];

/// Winding matters: reordering any of these flips the face for back-face
/// culling.
pub static HEXAGONS: [[usize; 6]; 8] = [
    [0, 19, 1, 17, 14, 12],
    [0, 2, 19, 9, 18, 8],
    [2, 3, 9, 23, 11, 21],
    [1, 14, 3, 15, 23, 22],
    [17, 16, 12, 4, 13, 6],
    [18, 8, 16, 10, 4, 5],
    [15, 13, 22, 6, 20, 7],
    [11, 21, 10, 20, 5, 7],
];

/// The two lengths derived from the shape scale `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeScale {
    pub h: f32,
    pub diag: f32,
}

impl ShapeScale {
    pub fn new(a: f32) -> Self {
        Self {
            h: 2.0 * 2.0_f32.sqrt() / 2.0 * a,
            diag: (2.0 * a * a).sqrt(),
        }
    }

    /// Resolves one entry of [`OFFSET_PATTERN`].
    pub fn offset(&self, pattern: [i8; 3]) -> Vec3 {
        let resolve = |unit: i8| match unit.abs() {
            2 => f32::from(unit.signum()) * self.h,
            1 => f32::from(unit.signum()) * self.diag / 2.0,
            _ => 0.0,
        };
        Vec3::new(resolve(pattern[0]), resolve(pattern[1]), resolve(pattern[2]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    Quad,
    Hexagon,
}

/// One face of an expanded shape, as a triangle strip over vertex slots.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub kind: FaceKind,
    pub strip: &'static [usize],
}

impl Face {
    /// Triangles of the strip, with the odd ones flipped so every triangle
    /// keeps the strip's winding.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.strip.windows(3).enumerate().map(|(i, w)| {
            if i % 2 == 0 {
                [w[0], w[1], w[2]]
            } else {
                [w[1], w[0], w[2]]
            }
        })
    }
}

/// All 14 faces, quads first.
pub fn faces() -> impl Iterator<Item = Face> {
    QUADS
        .iter()
        .map(|strip| Face {
            kind: FaceKind::Quad,
            strip,
        })
        .chain(HEXAGONS.iter().map(|strip| Face {
            kind: FaceKind::Hexagon,
            strip,
        }))
}

/// An anchor expanded into concrete vertices. Lives only for one draw.
#[derive(Debug, Clone)]
pub struct ExpandedShape {
    pub vertices: [Vec3; VERTEX_COUNT],
}

impl ExpandedShape {
    /// Expands around `center`, which is expected in camera space.
    pub fn new(center: Vec3, a: f32) -> Self {
        let scale = ShapeScale::new(a);
        Self {
            vertices: OFFSET_PATTERN.map(|pattern| center + scale.offset(pattern)),
        }
    }

    /// Expands a world space point as seen through `view`.
    pub fn in_view(world: Vec3, view: Mat4, a: f32) -> Self {
        Self::new(view.transform_point3(world), a)
    }

    pub fn center(&self) -> Vec3 {
        self.vertices.iter().copied().sum::<Vec3>() / VERTEX_COUNT as f32
    }

    /// Normal from the first three vertices of the face's strip.
    pub fn face_normal(&self, face: &Face) -> Vec3 {
        let v0 = self.vertices[face.strip[0]];
        let v1 = self.vertices[face.strip[1]];
        let v2 = self.vertices[face.strip[2]];
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }
}

/// The fixed light: world up, carried into camera space.
pub fn light_direction(view: Mat4) -> Vec3 {
    (view * Vec4::new(0.0, 1.0, 0.0, 0.0)).truncate()
}

/// Flat shading. The diffuse term is intentionally left unclamped, so faces
/// turned away from the light darken below the ambient level.
pub fn shade(base: Vec3, normal: Vec3, light: Vec3) -> Vec3 {
    base * normal.dot(light) + base * AMBIENT
}

/// Shape scale used by the phase variant.
pub fn blend_scale(a: f32, phase: f32) -> f32 {
    a * (PHASE_SCALE_FLOOR + (1.0 - PHASE_SCALE_FLOOR) * phase)
}

/// Base colour used by the phase variant.
pub fn blend_color(base: Vec3, accent: Vec3, phase: f32) -> Vec3 {
    base.lerp(accent, phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALES: [f32; 4] = [0.05, 0.1, 1.0, 7.5];
    const CENTERS: [Vec3; 3] = [Vec3::ZERO, Vec3::new(3.0, -2.0, 10.0), Vec3::new(-40.0, 0.5, -0.25)];

    #[test]
    fn test_counts() {
        for a in SCALES {
            for center in CENTERS {
                let shape = ExpandedShape::new(center, a);
                assert_eq!(shape.vertices.len(), VERTEX_COUNT);
                assert_eq!(faces().filter(|f| f.kind == FaceKind::Quad).count(), 6);
                assert_eq!(faces().filter(|f| f.kind == FaceKind::Hexagon).count(), 8);
            }
        }
    }

    #[test]
    fn test_every_slot_is_used_by_three_faces() {
        let mut uses = [0; VERTEX_COUNT];
        for face in faces() {
            for &index in face.strip {
                uses[index] += 1;
            }
        }
        assert!(uses.iter().all(|&count| count == 3), "{uses:?}");
    }

    #[test]
    fn test_h_equals_full_diagonal() {
        let scale = ShapeScale::new(1.0);
        assert!((scale.h - 2.0_f32.sqrt()).abs() < 1e-6);
        assert!((scale.h - scale.diag).abs() < 1e-6);
    }

    #[test]
    fn test_hexagon_normals_are_outward() {
        for a in SCALES {
            for center in CENTERS {
                let shape = ExpandedShape::new(center, a);
                for face in faces() {
                    let v0 = shape.vertices[face.strip[0]];
                    let v1 = shape.vertices[face.strip[1]];
                    let v2 = shape.vertices[face.strip[2]];
                    assert!((v1 - v0).cross(v2 - v0).length_squared() > 0.0);

                    let normal = shape.face_normal(&face);
                    let face_center = face.strip.iter().map(|&i| shape.vertices[i]).sum::<Vec3>()
                        / face.strip.len() as f32;
                    assert!(normal.dot(face_center - shape.center()) > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_faces_are_planar_and_consistently_wound() {
        let shape = ExpandedShape::new(Vec3::new(1.0, 2.0, 3.0), 1.0);
        for face in faces() {
            let normal = shape.face_normal(&face);
            let origin = shape.vertices[face.strip[0]];
            for &index in face.strip {
                assert!((shape.vertices[index] - origin).dot(normal).abs() < 1e-4);
            }
            for [a, b, c] in face.triangles() {
                let (a, b, c) = (shape.vertices[a], shape.vertices[b], shape.vertices[c]);
                assert!((b - a).cross(c - a).dot(normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_edges_have_length_a() {
        let a = 2.0;
        let shape = ExpandedShape::new(Vec3::ZERO, a);
        for quad in QUADS {
            let edge = shape.vertices[quad[0]].distance(shape.vertices[quad[1]]);
            assert!((edge - a).abs() < 1e-4);
        }
    }

    #[test]
    fn test_neighbours_in_fixed_layout_touch() {
        let a = 1.0;
        let layout = crate::anchor::fixed_layout(a);
        let origin = ExpandedShape::new(layout[0].position, a);
        let right = ExpandedShape::new(layout[1].position, a);
        // The right square of one shape coincides with the left square of the next.
        for (r, l) in QUADS[3].iter().zip(QUADS[2]) {
            let touching = right.vertices.iter().any(|v| v.abs_diff_eq(origin.vertices[*r], 1e-4));
            assert!(touching, "slot {r} / {l}");
        }
    }

    #[test]
    fn test_view_space_expansion() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let shape = ExpandedShape::in_view(Vec3::ZERO, view, 1.0);
        assert!(shape.center().abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }

    #[test]
    fn test_shading_is_unclamped() {
        let base = Vec3::new(0.2, 0.4, 1.0);
        let light = Vec3::Y;
        assert!(shade(base, Vec3::Y, light).abs_diff_eq(base * 1.3, 1e-6));
        assert!(shade(base, Vec3::X, light).abs_diff_eq(base * AMBIENT, 1e-6));
        let below = shade(base, Vec3::NEG_Y, light);
        assert!(below.abs_diff_eq(base * -0.7, 1e-6));
        assert!(below.max_element() < 0.0);
    }

    #[test]
    fn test_light_follows_view() {
        assert_eq!(light_direction(Mat4::IDENTITY), Vec3::Y);
        let view = Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2);
        assert!(light_direction(view).abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_phase_blends() {
        assert_eq!(blend_scale(2.0, 0.0), 1.0);
        assert_eq!(blend_scale(2.0, 1.0), 2.0);
        assert_eq!(blend_color(Vec3::ZERO, Vec3::ONE, 0.25), Vec3::splat(0.25));
    }
}
