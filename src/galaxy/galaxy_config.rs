use super::GalaxySystems;
use bevy::prelude::*;

/// Inputs of a single galaxy generation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GalaxyParameters {
    pub count: u32,
    pub size: f32,
    pub size_attenuation: bool,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            size_attenuation: true,
            radius: 5.0,
            branches: 3,
            spin: 5.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Srgba::rgb(1.0, 0.0, 0.0),
            outside_color: Srgba::rgb(0.0, 1.0, 0.0),
        }
    }
}

impl GalaxyParameters {
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        size_attenuation: false,
        radius: 0.01,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
    };
    pub const MAX: Self = Self {
        count: 1_000_000,
        size: 0.1,
        size_attenuation: true,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 1.0,
        randomness_power: 10.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
    };
    /// Slider increments; colors and flags have no step.
    pub const STEP: Self = Self {
        count: 500,
        size: 0.001,
        size_attenuation: true,
        radius: 0.01,
        branches: 1,
        spin: 0.01,
        randomness: 0.01,
        randomness_power: 0.01,
        inside_color: Srgba::NONE,
        outside_color: Srgba::NONE,
    };

    /// Copy with every numeric field pulled into `[MIN, MAX]`.
    pub fn clamped(&self) -> Self {
        let (min, max) = (&Self::MIN, &Self::MAX);
        Self {
            count: self.count.clamp(min.count, max.count),
            size: self.size.clamp(min.size, max.size),
            radius: self.radius.clamp(min.radius, max.radius),
            branches: self.branches.clamp(min.branches, max.branches),
            spin: self.spin.clamp(min.spin, max.spin),
            randomness: self.randomness.clamp(min.randomness, max.randomness),
            randomness_power: self
                .randomness_power
                .clamp(min.randomness_power, max.randomness_power),
            ..self.clone()
        }
    }
}

/// Parameters the current galaxy was (or is about to be) generated from.
#[derive(Resource, Clone, PartialEq, Default)]
pub struct GalaxyConfig {
    pub generation: i32,
    pub params: GalaxyParameters,
}

/// Draft edited by the panel; only committed into [`GalaxyConfig`] once an edit finishes.
#[derive(Resource, Clone, Default, Deref, DerefMut)]
pub struct GalaxyConfigUi(pub GalaxyParameters);

#[derive(Resource, Default)]
struct GalaxyConfigOld(GalaxyParameters);

pub struct GalaxyConfigPlugin;

impl Plugin for GalaxyConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyConfig>()
            .init_resource::<GalaxyConfigUi>()
            .init_resource::<GalaxyConfigOld>()
            .configure_sets(
                Update,
                (GalaxySystems::ApplyConfig, GalaxySystems::Regenerate).chain(),
            )
            .add_systems(Update, apply_ui_updates.in_set(GalaxySystems::ApplyConfig));
    }
}

fn apply_ui_updates(
    mut galaxy_config_old: ResMut<GalaxyConfigOld>,
    mut galaxy_config: ResMut<GalaxyConfig>,
) {
    if galaxy_config.is_changed() && galaxy_config.params != galaxy_config_old.0 {
        galaxy_config.generation += 1;
        galaxy_config_old.0 = galaxy_config.params.clone();
        debug!("galaxy parameters changed, generation {}", galaxy_config.generation);
    }
}
