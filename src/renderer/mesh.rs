//! CPU-side meshes: OBJ parsing, procedural fallbacks and GPU upload.

use std::path::Path;

use wgpu::util::DeviceExt;

use crate::chess::PieceKind;
use crate::error::AssetError;
use crate::math::{Aabb, Vec3};

/// Vertex with position and normal at shader locations 0 and 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// An indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Vertex and index buffers of an uploaded mesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

fn parse_index(token: &str, len: usize, line: usize) -> Result<usize, AssetError> {
    let raw: i64 = token.parse().map_err(|_| AssetError::Obj {
        line,
        message: format!("bad index `{token}`"),
    })?;
    let index = if raw < 0 { len as i64 + raw } else { raw - 1 };
    if index < 0 || index as usize >= len {
        return Err(AssetError::Obj {
            line,
            message: format!("index {raw} out of range"),
        });
    }
    Ok(index as usize)
}

fn parse_vec3(parts: &[&str], line: usize) -> Result<[f32; 3], AssetError> {
    let mut out = [0.0; 3];
    for (axis, value) in out.iter_mut().enumerate() {
        let token = parts.get(axis + 1).ok_or_else(|| AssetError::Obj {
            line,
            message: "expected three components".to_string(),
        })?;
        *value = token.parse().map_err(|_| AssetError::Obj {
            line,
            message: format!("bad number `{token}`"),
        })?;
    }
    Ok(out)
}

impl Mesh {
    /// Parses Wavefront OBJ text (`v`, `vn`, `f`; polygons are fan-triangulated).
    /// Faces without normals get a flat face normal.
    pub fn parse_obj(text: &str) -> Result<Mesh, AssetError> {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut mesh = Mesh::default();

        for (index, raw_line) in text.lines().enumerate() {
            let line = index + 1;
            let parts: Vec<&str> = raw_line.split_whitespace().collect();
            match parts.first().copied() {
                Some("v") => positions.push(parse_vec3(&parts, line)?),
                Some("vn") => normals.push(Vec3::from(parse_vec3(&parts, line)?).normalize().0),
                Some("f") => {
                    if parts.len() < 4 {
                        return Err(AssetError::Obj {
                            line,
                            message: "face needs at least three vertices".to_string(),
                        });
                    }
                    let mut corners = Vec::with_capacity(parts.len() - 1);
                    for token in &parts[1..] {
                        let mut fields = token.split('/');
                        let position =
                            parse_index(fields.next().unwrap_or_default(), positions.len(), line)?;
                        let normal = match fields.nth(1) {
                            Some(field) if !field.is_empty() => {
                                Some(parse_index(field, normals.len(), line)?)
                            }
                            _ => None,
                        };
                        corners.push((position, normal));
                    }

                    for i in 1..corners.len() - 1 {
                        let triangle = [corners[0], corners[i], corners[i + 1]];
                        let [a, b, c] = triangle.map(|(p, _)| Vec3::from(positions[p]));
                        let flat = (b - a).cross(&(c - a)).normalize().0;
                        for (position, normal) in triangle {
                            mesh.indices.push(mesh.vertices.len() as u32);
                            mesh.vertices.push(MeshVertex {
                                position: positions[position],
                                normal: normal.map_or(flat, |n| normals[n]),
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        if mesh.indices.is_empty() {
            return Err(AssetError::EmptyMesh);
        }
        Ok(mesh)
    }

    pub fn load_obj(path: &Path) -> Result<Mesh, AssetError> {
        let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_obj(&text)
    }

    /// Box spanning `[0, size]` on every axis with outward face normals.
    pub fn cuboid(size: [f32; 3]) -> Mesh {
        let [x, y, z] = size;
        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[0.0, 0.0, z], [x, 0.0, z], [x, y, z], [0.0, y, z]]),
            ([0.0, 0.0, -1.0], [[0.0, 0.0, 0.0], [0.0, y, 0.0], [x, y, 0.0], [x, 0.0, 0.0]]),
            ([1.0, 0.0, 0.0], [[x, 0.0, 0.0], [x, y, 0.0], [x, y, z], [x, 0.0, z]]),
            ([-1.0, 0.0, 0.0], [[0.0, 0.0, 0.0], [0.0, 0.0, z], [0.0, y, z], [0.0, y, 0.0]]),
            ([0.0, 1.0, 0.0], [[0.0, y, 0.0], [0.0, y, z], [x, y, z], [x, y, 0.0]]),
            ([0.0, -1.0, 0.0], [[0.0, 0.0, 0.0], [x, 0.0, 0.0], [x, 0.0, z], [0.0, 0.0, z]]),
        ];

        let mut mesh = Mesh::default();
        for (normal, corners) in faces {
            let base = mesh.vertices.len() as u32;
            mesh.vertices
                .extend(corners.map(|position| MeshVertex { position, normal }));
            mesh.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Solid of revolution around +z. `profile` lists `(radius, height)` pairs
    /// from bottom to top.
    pub fn lathe(profile: &[[f32; 2]], segments: u32) -> Mesh {
        let mut mesh = Mesh::default();
        let step = std::f32::consts::TAU / segments as f32;

        for pair in profile.windows(2) {
            let [[r0, z0], [r1, z1]] = [pair[0], pair[1]];
            // slope of the profile edge tilts the normal up or down
            let (dr, dz) = (r1 - r0, z1 - z0);
            let slope = Vec3::new(dz, 0.0, -dr).normalize();

            for segment in 0..segments {
                let base = mesh.vertices.len() as u32;
                for angle in [segment as f32 * step, (segment + 1) as f32 * step] {
                    let (sin, cos) = angle.sin_cos();
                    let normal = [slope.x() * cos, slope.x() * sin, slope.z()];
                    mesh.vertices.push(MeshVertex {
                        position: [r0 * cos, r0 * sin, z0],
                        normal,
                    });
                    mesh.vertices.push(MeshVertex {
                        position: [r1 * cos, r1 * sin, z1],
                        normal,
                    });
                }
                mesh.indices
                    .extend([base, base + 2, base + 3, base, base + 3, base + 1]);
            }
        }
        mesh
    }

    /// Procedural stand-in used when no OBJ file is available for `kind`.
    pub fn piece(kind: PieceKind) -> Mesh {
        let profile: &[[f32; 2]] = match kind {
            PieceKind::Pawn => &[
                [0.0, 0.0],
                [0.45, 0.0],
                [0.4, 0.15],
                [0.2, 0.3],
                [0.15, 0.6],
                [0.3, 0.7],
                [0.3, 0.95],
                [0.0, 1.05],
            ],
            PieceKind::Rook => &[
                [0.0, 0.0],
                [0.5, 0.0],
                [0.45, 0.2],
                [0.32, 0.35],
                [0.32, 1.0],
                [0.45, 1.1],
                [0.45, 1.35],
                [0.0, 1.35],
            ],
            PieceKind::Knight => &[
                [0.0, 0.0],
                [0.5, 0.0],
                [0.45, 0.2],
                [0.25, 0.4],
                [0.35, 0.9],
                [0.2, 1.3],
                [0.1, 1.45],
                [0.0, 1.45],
            ],
            PieceKind::Bishop => &[
                [0.0, 0.0],
                [0.5, 0.0],
                [0.45, 0.2],
                [0.2, 0.4],
                [0.18, 1.0],
                [0.32, 1.25],
                [0.15, 1.55],
                [0.0, 1.65],
            ],
            PieceKind::Queen => &[
                [0.0, 0.0],
                [0.55, 0.0],
                [0.5, 0.2],
                [0.25, 0.45],
                [0.2, 1.2],
                [0.4, 1.5],
                [0.3, 1.75],
                [0.0, 1.85],
            ],
            PieceKind::King => &[
                [0.0, 0.0],
                [0.55, 0.0],
                [0.5, 0.2],
                [0.25, 0.45],
                [0.22, 1.3],
                [0.38, 1.55],
                [0.12, 1.75],
                [0.12, 2.0],
                [0.0, 2.05],
            ],
        };
        Self::lathe(profile, 24)
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| v.position))
    }

    /// Translates the mesh so the point at fraction `anchor` of its bounds
    /// lands on the origin. `(0.5, 0.5, 0.0)` centres a piece on its base.
    pub fn anchor(&mut self, anchor: [f32; 3]) {
        let Some(bounds) = self.bounds() else {
            return;
        };
        let size = bounds.size();
        let offset: [f32; 3] = std::array::from_fn(|axis| bounds.min[axis] + anchor[axis] * size[axis]);
        for vertex in &mut self.vertices {
            for axis in 0..3 {
                vertex.position[axis] -= offset[axis];
            }
        }
    }

    pub fn upload(&self, device: &wgpu::Device, label: &str) -> GpuMesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# a single triangle
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";

    #[test]
    fn test_parse_triangle_with_normals() {
        let mesh = Mesh::parse_obj(TRIANGLE).expect("valid obj");
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_quad_is_fan_triangulated_with_flat_normals() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = Mesh::parse_obj(obj).expect("valid obj");
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = Mesh::parse_obj(obj).expect("valid obj");
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Mesh::parse_obj("v 0 0\n"), Err(AssetError::Obj { line: 1, .. })));
        assert!(matches!(
            Mesh::parse_obj("v 0 0 0\nf 1 2 3\n"),
            Err(AssetError::Obj { line: 2, .. })
        ));
        assert!(matches!(Mesh::parse_obj("v 0 0 0\n"), Err(AssetError::EmptyMesh)));
    }

    #[test]
    fn test_anchor_puts_board_top_at_zero() {
        let mut board = Mesh::cuboid([9.0, 9.0, 0.5]);
        board.anchor([0.0, 0.0, 1.0]);
        let bounds = board.bounds().expect("non-empty");
        assert_eq!(bounds.min, [0.0, 0.0, -0.5]);
        assert_eq!(bounds.max, [9.0, 9.0, 0.0]);
    }

    #[test]
    fn test_piece_meshes_stand_on_origin() {
        for kind in PieceKind::ALL {
            let mut mesh = Mesh::piece(kind);
            mesh.anchor([0.5, 0.5, 0.0]);
            let bounds = mesh.bounds().expect("non-empty");
            assert!(bounds.min[2].abs() < 1e-6);
            let center = bounds.center();
            assert!(center[0].abs() < 1e-4 && center[1].abs() < 1e-4, "{kind:?}");
        }
    }
}
