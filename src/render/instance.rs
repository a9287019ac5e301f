//! Instance records for pooled bodies and star fields

use bytemuck::{Pod, Zeroable};

use crate::sim::{MotionBody, ObjectPool, StarField};

/// Per-body instance data (one record per asteroid or torus knot)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub position: [f32; 3],
    /// Pulse factor applied to the mesh
    pub scale: f32,
    /// Orientation quaternion (x, y, z, w)
    pub rotation: [f32; 4],
    /// Shader time uniform
    pub age: f32,
    /// 0 = asteroid, 1 = torus knot
    pub kind: u32,
    pub _pad: [u32; 2],
}

impl InstanceRaw {
    pub fn from_body(body: &MotionBody) -> Self {
        Self {
            position: body.position.to_array(),
            scale: body.scale,
            rotation: body.orientation.to_array(),
            age: body.age,
            kind: body.kind().code(),
            _pad: [0; 2],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            2 => Float32x3,
            3 => Float32,
            4 => Float32x4,
            5 => Float32,
            6 => Uint32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Star point relative to its field origin (add the origin in the shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct StarVertex {
    pub position: [f32; 3],
}

impl StarVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Instance records for every body, asteroids first
pub fn body_instances(pool: &ObjectPool) -> Vec<InstanceRaw> {
    pool.bodies().map(InstanceRaw::from_body).collect()
}

/// Local-space points of a field; upload once, move with the field origin
pub fn star_vertices(field: &StarField) -> Vec<StarVertex> {
    field
        .points()
        .iter()
        .map(|p| StarVertex {
            position: p.to_array(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PoolConfig;

    #[test]
    fn test_instance_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<InstanceRaw>() % 16, 0);
        assert_eq!(InstanceRaw::desc().attributes.len(), 5);
    }

    #[test]
    fn test_instances_match_pool() {
        let mut config = PoolConfig::with_counts(4, 2, 1).seeded(3);
        config.star_field.layers[0].star_count = 10;
        let pool = ObjectPool::new(config, &mut ()).unwrap();

        let instances = body_instances(&pool);
        assert_eq!(instances.len(), 6);
        assert_eq!(instances[0].kind, 0);
        assert_eq!(instances[5].kind, 1);
        assert_eq!(instances[5].position, pool.torus_knots()[1].position.to_array());

        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 6 * std::mem::size_of::<InstanceRaw>());

        let field = &pool.star_fields()[0];
        let stars = star_vertices(field);
        assert_eq!(stars.len(), 10);
        // Local points: recycling the field moves only its origin
        assert_eq!(stars[0].position, field.points()[0].to_array());
    }

    #[test]
    fn test_star_vertex_layout() {
        let layout = StarVertex::desc();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }
}
