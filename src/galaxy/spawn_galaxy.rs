use super::points_material::{build_point_cloud_mesh, GalaxyPointsMaterial};
use super::{generate_galaxy, GalaxyConfig, GalaxySystems};
use bevy::{
    pbr::NotShadowCaster, platform::time::Instant, prelude::*, render::view::NoFrustumCulling,
};

pub struct SpawnGalaxyPlugin;

impl Plugin for SpawnGalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveGalaxy>()
            .add_systems(Update, regenerate_galaxy.in_set(GalaxySystems::Regenerate));
    }
}

#[derive(Component)]
pub struct GalaxyPoints;

/// Everything the scene holds for one generated cloud.
pub struct GalaxyHandles {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<GalaxyPointsMaterial>,
}

/// Owner of the cloud currently attached to the scene.
#[derive(Resource)]
pub struct ActiveGalaxy {
    pub generation: i32,
    pub particle_count: usize,
    pub handles: Option<GalaxyHandles>,
}

impl Default for ActiveGalaxy {
    fn default() -> Self {
        Self {
            generation: -1,
            particle_count: 0,
            handles: None,
        }
    }
}

/// Replaces the galaxy whenever the committed parameters move to a new generation.
/// The previous cloud is always released before the next one is attached.
fn regenerate_galaxy(
    mut commands: Commands,
    galaxy_config: Res<GalaxyConfig>,
    mut active: ResMut<ActiveGalaxy>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
) {
    if active.generation == galaxy_config.generation {
        return;
    }

    if let Some(prior) = active.handles.take() {
        debug!("releasing galaxy generation {}", active.generation);
        meshes.remove(&prior.mesh);
        materials.remove(&prior.material);
        commands.entity(prior.entity).despawn();
    }

    let params = &galaxy_config.params;
    let started = Instant::now();
    let cloud = generate_galaxy(params, &mut rand::rng());

    let mesh = meshes.add(build_point_cloud_mesh(&cloud));
    let material = materials.add(GalaxyPointsMaterial::new(params));
    let entity = commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            GalaxyPoints,
            NotShadowCaster,
            NoFrustumCulling,
        ))
        .id();

    info!(
        "generated galaxy {}: {} particles, {} arms in {:.1} ms",
        galaxy_config.generation,
        cloud.len(),
        params.branches,
        started.elapsed().as_secs_f64() * 1000.0
    );

    active.generation = galaxy_config.generation;
    active.particle_count = cloud.len();
    active.handles = Some(GalaxyHandles {
        entity,
        mesh,
        material,
    });
}
