//! Latitude/longitude sphere mesh with equirectangular UVs.

use glam::Vec3;

/// CPU-side unit sphere. Scale with the model matrix for other radii.
pub struct SphereMesh {
    pub positions: Vec<Vec3>,
    /// Same as positions on a unit sphere.
    pub normals: Vec<Vec3>,
    /// `u` wraps west to east, `v` runs north (0) to south (1).
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// Generate a unit sphere with `width_segments` around the equator and
/// `height_segments` from pole to pole.
///
/// The seam column is duplicated so UVs do not wrap backwards, and pole
/// rows emit a single triangle per quad. Triangles wind counter-clockwise
/// seen from outside.
pub fn generate_uv_sphere(width_segments: u32, height_segments: u32) -> SphereMesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let cols = ws + 1;
    let vertex_count = (cols * (hs + 1)) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let (sin_t, cos_t) = (v * std::f32::consts::PI).sin_cos();
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (sin_p, cos_p) = (u * std::f32::consts::TAU).sin_cos();
            positions.push(Vec3::new(-cos_p * sin_t, cos_t, sin_p * sin_t));
            uvs.push([u, v]);
        }
    }

    let mut indices = Vec::with_capacity((ws * (hs - 1) * 6) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * cols + ix + 1;
            let b = iy * cols + ix;
            let c = (iy + 1) * cols + ix;
            let d = (iy + 1) * cols + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    SphereMesh {
        normals: positions.clone(),
        positions,
        uvs,
        indices,
    }
}
