use bevy::prelude::*;

mod galaxy_config;
mod generator;
mod points_material;
mod spawn_galaxy;

pub use galaxy_config::{GalaxyConfig, GalaxyConfigPlugin, GalaxyConfigUi, GalaxyParameters};
pub use generator::{generate_galaxy, PointCloud};
pub use spawn_galaxy::{ActiveGalaxy, SpawnGalaxyPlugin};

use points_material::PointsMaterialPlugin;

/// Committed parameters are applied before the cloud is regenerated, in the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GalaxySystems {
    ApplyConfig,
    Regenerate,
}

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((GalaxyConfigPlugin, PointsMaterialPlugin, SpawnGalaxyPlugin));
    }
}
