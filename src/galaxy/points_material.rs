use super::{GalaxyParameters, PointCloud};
use bevy::{
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
        render_resource::{AsBindGroup, ShaderRef, ShaderType},
    },
};
use bytemuck::{Pod, Zeroable};

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";
#[cfg(test)]
const SHADER_SOURCE: &str = include_str!("../../assets/shaders/galaxy_points.wgsl");

/// Billboard corners, expanded around the particle center in the vertex shader.
const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub struct PointsMaterialPlugin;

impl Plugin for PointsMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial> {
            prepass_enabled: false,
            shadows_enabled: false,
            ..default()
        });
    }
}

/// One quad per particle, all four vertices sitting on the particle itself.
/// The mesh lives only in the render world once uploaded.
pub fn build_point_cloud_mesh(cloud: &PointCloud) -> Mesh {
    let n = cloud.len();
    let mut positions = Vec::with_capacity(n * 4);
    let mut corners = Vec::with_capacity(n * 4);
    let mut colors = Vec::with_capacity(n * 4);
    let mut indices = Vec::with_capacity(n * 6);

    for (i, (pos, rgb)) in cloud
        .positions_xyz()
        .iter()
        .zip(cloud.colors_rgb())
        .enumerate()
    {
        let base = (i * 4) as u32;
        for corner in CORNERS {
            positions.push(*pos);
            corners.push(corner);
            colors.push([rgb[0], rgb[1], rgb[2], 1.0]);
        }
        indices.extend(QUAD_INDICES.iter().map(|idx| base + idx));
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
        .with_inserted_indices(Indices::U32(indices))
}

// Mirrors PointParams in galaxy_points.wgsl
#[derive(ShaderType, Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct PointParams {
    size: f32,
    size_attenuation: u32,
    pad: Vec2,
}

impl PointParams {
    fn read(params: &GalaxyParameters) -> Self {
        Self {
            size: params.size,
            size_attenuation: params.size_attenuation as u32,
            pad: Vec2::ZERO,
        }
    }
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct GalaxyPointsMaterial {
    #[uniform(0)]
    params: PointParams,
    alpha_mode: AlphaMode,
}

impl GalaxyPointsMaterial {
    pub fn new(params: &GalaxyParameters) -> Self {
        Self {
            params: PointParams::read(params),
            alpha_mode: AlphaMode::Add,
        }
    }
}

impl Material for GalaxyPointsMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }
}
