//! Regular-grid chunk meshes
//!
//! A chunk at resolution `n` is an `n x n` vertex grid spanning its square
//! footprint. Heights are sampled on a grid padded by one step on every side
//! so edge normals see the neighbouring terrain and match the adjacent chunk
//! at the same resolution.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use super::height_source::HeightSource;
use crate::math::Aabb;

/// GPU-ready terrain vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Geometry owned by one chunk at one resolution
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
    resolution: u32,
    bounds: Aabb,
}

/// Result of a mesh build
pub struct MeshBuild {
    pub mesh: ChunkMesh,
    /// Vertices whose height source had no data and were placed at 0.0
    pub missing_samples: usize,
}

impl ChunkMesh {
    /// Build a `resolution x resolution` mesh over the rectangle
    /// `[origin, origin + extent]` (x/z), sampling `source` in world space.
    pub fn build(origin: Vec2, extent: Vec2, resolution: u32, source: &dyn HeightSource) -> MeshBuild {
        let res = resolution.max(2) as usize;
        let padded = res + 2;
        let last = (res - 1) as f32;

        // Padded coordinate p maps to vertex index p - 1
        let offset = |p: usize, size: f32| -> f32 {
            match p {
                0 => -size / last,
                p if p == padded - 1 => size + size / last,
                p => size * ((p - 1) as f32 / last),
            }
        };
        let cx = |p: usize| offset(p, extent.x);
        let cz = |p: usize| offset(p, extent.y);

        let mut heights = Vec::with_capacity(padded * padded);
        let mut missing_samples = 0;
        for pz in 0..padded {
            let z = origin.y + cz(pz);
            for px in 0..padded {
                let x = origin.x + cx(px);
                let h = match source.try_height(x, z) {
                    Some(h) if h.is_finite() => h,
                    _ => {
                        let inner = (1..=res).contains(&px) && (1..=res).contains(&pz);
                        if inner {
                            missing_samples += 1;
                        }
                        0.0
                    }
                };
                heights.push(h);
            }
        }

        let at = |px: usize, pz: usize| heights[pz * padded + px];

        let mut vertices = Vec::with_capacity(res * res);
        let mut bounds = Aabb::empty();
        for vz in 0..res {
            for vx in 0..res {
                let (px, pz) = (vx + 1, vz + 1);
                let position = Vec3::new(origin.x + cx(px), at(px, pz), origin.y + cz(pz));

                // Central differences over the padded grid
                let dx = cx(px + 1) - cx(px - 1);
                let dz = cz(pz + 1) - cz(pz - 1);
                let normal = Vec3::new(
                    (at(px - 1, pz) - at(px + 1, pz)) * dz,
                    dx * dz,
                    (at(px, pz - 1) - at(px, pz + 1)) * dx,
                )
                .try_normalize()
                .unwrap_or(Vec3::Y);

                bounds.expand(position);
                vertices.push(TerrainVertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    uv: [vx as f32 / last, vz as f32 / last],
                });
            }
        }

        let quads = res - 1;
        let mut indices = Vec::with_capacity(quads * quads * 6);
        for z in 0..quads {
            for x in 0..quads {
                let i0 = (z * res + x) as u32;
                let i1 = i0 + 1;
                let i2 = i0 + res as u32;
                let i3 = i2 + 1;

                // Counter-clockwise seen from +Y
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        MeshBuild {
            mesh: ChunkMesh {
                vertices,
                indices,
                resolution: res as u32,
                bounds,
            },
            missing_samples,
        }
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertices per side
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Bounds of the built surface
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer contents for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
