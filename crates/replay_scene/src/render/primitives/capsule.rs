//! Procedural capsule geometry
//!
//! A capsule is swept as three stacked regions: a top cap, a (possibly
//! conical) body and a bottom cap. Every region produces its own rings of
//! `radial_segments + 1` vertices, the extra vertex duplicating the seam so
//! texture coordinates wrap cleanly. Adjacent rings inside a region are joined
//! by quads split into two triangles.
//!
//! The cone half-angle `alpha = acos((r_bottom - r_top) / height)` decides
//! where the caps meet the body. With equal radii it is a right angle and the
//! body is a plain cylinder.

use std::f32::consts::{FRAC_PI_2, PI};

use super::mesh::{Mesh, Vertex};

const EPSILON: f32 = 1e-6;

/// Builder for capsule meshes
///
/// `height` is the length of the body between the two cap centers; the caps
/// extend it by `radius_top` above and `radius_bottom` below. Parameters are
/// clamped on [`build`](Self::build) so malformed input degrades to a
/// degenerate mesh rather than failing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleBuilder {
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    top_cap_segments: u32,
    bottom_cap_segments: u32,
}

impl Default for CapsuleBuilder {
    fn default() -> Self {
        Self {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 2.0,
            radial_segments: 16,
            height_segments: 2,
            top_cap_segments: 6,
            bottom_cap_segments: 6,
        }
    }
}

impl CapsuleBuilder {
    /// Capsule with equal cap radii and default tessellation
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius_top: radius, radius_bottom: radius, height, ..Self::default() }
    }

    /// Use distinct top and bottom radii
    pub fn radii(mut self, top: f32, bottom: f32) -> Self {
        self.radius_top = top;
        self.radius_bottom = bottom;
        self
    }

    /// Segments around the long axis (tessellation)
    pub fn radial_segments(mut self, segments: u32) -> Self {
        self.radial_segments = segments;
        self
    }

    /// Segments along the body (subdivisions)
    pub fn height_segments(mut self, segments: u32) -> Self {
        self.height_segments = segments;
        self
    }

    /// Segments of both caps (cap detail)
    pub fn cap_segments(mut self, segments: u32) -> Self {
        self.top_cap_segments = segments;
        self.bottom_cap_segments = segments;
        self
    }

    /// Segments of the top cap only
    pub fn top_cap_segments(mut self, segments: u32) -> Self {
        self.top_cap_segments = segments;
        self
    }

    /// Segments of the bottom cap only
    pub fn bottom_cap_segments(mut self, segments: u32) -> Self {
        self.bottom_cap_segments = segments;
        self
    }

    /// Number of vertices [`build`](Self::build) will produce
    pub fn vertex_count(&self) -> usize {
        let p = self.clamped();
        let rings = p.top_cap_segments + p.height_segments + p.bottom_cap_segments + 3;
        rings as usize * (p.radial_segments as usize + 1)
    }

    /// Number of indices [`build`](Self::build) will produce
    pub fn index_count(&self) -> usize {
        let p = self.clamped();
        let rows = p.top_cap_segments + p.height_segments + p.bottom_cap_segments;
        p.radial_segments as usize * rows as usize * 6
    }

    fn clamped(&self) -> Self {
        let non_negative = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            radius_top: non_negative(self.radius_top),
            radius_bottom: non_negative(self.radius_bottom),
            height: non_negative(self.height),
            radial_segments: self.radial_segments.max(3),
            height_segments: self.height_segments.max(1),
            top_cap_segments: self.top_cap_segments.max(1),
            bottom_cap_segments: self.bottom_cap_segments.max(1),
        }
    }

    /// Generate the mesh, centered on the origin with its long axis along +Y
    pub fn build(&self) -> Mesh {
        let p = self.clamped();
        let (r_top, r_bottom, height) = (p.radius_top, p.radius_bottom, p.height);
        let radial = p.radial_segments;
        let half_height = height / 2.0;

        let alpha = cone_half_angle(r_top, r_bottom, height);
        let (sin_alpha, cos_alpha) = alpha.sin_cos();

        let cone_height = height + cos_alpha * r_top - cos_alpha * r_bottom;
        let slope = if cone_height.abs() > EPSILON {
            sin_alpha * (r_bottom - r_top) / cone_height
        } else {
            0.0
        };

        let top_rim = (r_top * sin_alpha, half_height + r_top * cos_alpha);
        let bottom_rim = (r_bottom * sin_alpha, -half_height + r_bottom * cos_alpha);
        let cone_length = (top_rim.0 - bottom_rim.0).hypot(top_rim.1 - bottom_rim.1);

        let top_arc = r_top * alpha;
        let bottom_arc = r_bottom * (PI - alpha);
        let mut total_length = top_arc + cone_length + bottom_arc;
        if total_length <= EPSILON {
            total_length = 1.0;
        }

        let mut vertices = Vec::with_capacity(self.vertex_count());
        let mut indices = Vec::with_capacity(self.index_count());
        let mut traveled = 0.0;

        // Top cap: pole down to where the body starts
        let first = vertices.len() as u32;
        for y in 0..=p.top_cap_segments {
            let t = y as f32 / p.top_cap_segments as f32;
            let a = FRAC_PI_2 - alpha * t;
            let (sin_a, cos_a) = a.sin_cos();
            let v = 1.0 - (traveled + top_arc * t) / total_length;
            push_ring(&mut vertices, radial, cos_a * r_top, half_height + sin_a * r_top, v, |sin_t, cos_t| {
                [cos_a * sin_t, sin_a, cos_a * cos_t]
            });
        }
        connect_rings(&mut indices, first, radial, p.top_cap_segments);
        traveled += top_arc;

        // Body
        let first = vertices.len() as u32;
        for y in 0..=p.height_segments {
            let t = y as f32 / p.height_segments as f32;
            let ring_radius = sin_alpha * (t * (r_bottom - r_top) + r_top);
            let ring_y = half_height + cos_alpha * r_top - t * cone_height;
            let v = 1.0 - (traveled + cone_length * t) / total_length;
            let norm = (1.0 + slope * slope).sqrt();
            push_ring(&mut vertices, radial, ring_radius, ring_y, v, |sin_t, cos_t| {
                [sin_t / norm, slope / norm, cos_t / norm]
            });
        }
        connect_rings(&mut indices, first, radial, p.height_segments);
        traveled += cone_length;

        // Bottom cap: body edge down to the pole
        let first = vertices.len() as u32;
        for y in 0..=p.bottom_cap_segments {
            let t = y as f32 / p.bottom_cap_segments as f32;
            let a = (FRAC_PI_2 - alpha) - (PI - alpha) * t;
            let (sin_a, cos_a) = a.sin_cos();
            let v = 1.0 - (traveled + bottom_arc * t) / total_length;
            push_ring(&mut vertices, radial, cos_a * r_bottom, -half_height + sin_a * r_bottom, v, |sin_t, cos_t| {
                [cos_a * sin_t, sin_a, cos_a * cos_t]
            });
        }
        connect_rings(&mut indices, first, radial, p.bottom_cap_segments);

        // Clockwise front faces
        indices.reverse();

        Mesh::new(vertices, indices)
    }
}

fn cone_half_angle(r_top: f32, r_bottom: f32, height: f32) -> f32 {
    let difference = r_bottom - r_top;
    let ratio = if height > EPSILON {
        difference / height
    } else if difference.abs() <= EPSILON {
        0.0
    } else {
        difference.signum()
    };
    ratio.clamp(-1.0, 1.0).acos()
}

fn push_ring<F>(vertices: &mut Vec<Vertex>, radial: u32, ring_radius: f32, ring_y: f32, v: f32, normal: F)
where
    F: Fn(f32, f32) -> [f32; 3],
{
    for x in 0..=radial {
        let u = x as f32 / radial as f32;
        let (sin_t, cos_t) = (u * 2.0 * PI).sin_cos();
        vertices.push(Vertex::new(
            [ring_radius * sin_t, ring_y, ring_radius * cos_t],
            normal(sin_t, cos_t),
            [u, v],
        ));
    }
}

fn connect_rings(indices: &mut Vec<u32>, first: u32, radial: u32, segments: u32) {
    let stride = radial + 1;
    for y in 0..segments {
        for x in 0..radial {
            let i1 = first + y * stride + x;
            let i2 = first + (y + 1) * stride + x;
            let i3 = first + (y + 1) * stride + x + 1;
            let i4 = first + y * stride + x + 1;
            indices.extend_from_slice(&[i1, i2, i4, i2, i3, i4]);
        }
    }
}
