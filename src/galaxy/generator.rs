use super::GalaxyParameters;
use bevy::color::Mix;
use bevy::prelude::*;
use rand::prelude::*;
use std::f32::consts::TAU;

/// Flat particle buffers, three floats per particle.
///
/// Colors are linear RGB, which is what the vertex color attribute expects.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl PointCloud {
    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[cfg(test)]
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.positions_xyz()[index])
    }

    #[cfg(test)]
    pub fn color(&self, index: usize) -> LinearRgba {
        let [r, g, b] = self.colors_rgb()[index];
        LinearRgba::rgb(r, g, b)
    }

    pub fn positions_xyz(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn colors_rgb(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Angle of the spiral arm particle `index` belongs to.
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}

/// Signed displacement along one axis.
/// Raising to `power` pulls most samples toward zero and leaves a few outliers.
fn jitter(rng: &mut impl Rng, params: &GalaxyParameters, distance: f32) -> f32 {
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    rng.random::<f32>().powf(params.randomness_power) * sign * params.randomness * distance
}

/// Lays `params.count` particles out along `params.branches` spiral arms.
///
/// The radial distance is drawn uniformly on `[0, radius)` rather than by area,
/// so the core ends up denser than the rim.
pub fn generate_galaxy(params: &GalaxyParameters, rng: &mut impl Rng) -> PointCloud {
    let mut cloud = PointCloud::with_capacity(params.count as usize);

    let inside = LinearRgba::from(params.inside_color);
    let outside = LinearRgba::from(params.outside_color);

    for index in 0..params.count {
        let distance = rng.random::<f32>() * params.radius;
        let spin_angle = distance * params.spin;
        let angle = branch_angle(index, params.branches) + spin_angle;

        let jitter_x = jitter(rng, params, distance);
        let jitter_y = jitter(rng, params, distance);
        let jitter_z = jitter(rng, params, distance);

        cloud.positions.extend_from_slice(&[
            angle.cos() * distance + jitter_x,
            jitter_y,
            angle.sin() * distance + jitter_z,
        ]);

        let color = inside.mix(&outside, distance / params.radius);
        cloud
            .colors
            .extend_from_slice(&[color.red, color.green, color.blue]);
    }

    cloud
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::color::ColorToComponents;
    use rand::rngs::StdRng;
    use std::f32::consts::PI;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn mean_abs_height(params: &GalaxyParameters) -> f32 {
        let cloud = generate_galaxy(params, &mut seeded());
        let sum: f32 = cloud.positions_xyz().iter().map(|p| p[1].abs()).sum();
        sum / cloud.len() as f32
    }

    #[test]
    fn buffers_hold_three_floats_per_particle() {
        for (count, branches) in [(100, 2), (1234, 5), (20_000, 20)] {
            let params = GalaxyParameters {
                count,
                branches,
                ..default()
            };
            let cloud = generate_galaxy(&params, &mut seeded());
            assert_eq!(cloud.positions.len(), 3 * count as usize);
            assert_eq!(cloud.colors.len(), 3 * count as usize);
            assert_eq!(cloud.len(), count as usize);
        }
    }

    #[test]
    fn colors_stay_between_inside_and_outside() {
        let params = GalaxyParameters {
            count: 5000,
            inside_color: Srgba::rgb(1.0, 0.376, 0.188),
            outside_color: Srgba::rgb(0.106, 0.224, 0.518),
            ..default()
        };
        let inside = LinearRgba::from(params.inside_color).to_f32_array();
        let outside = LinearRgba::from(params.outside_color).to_f32_array();
        let cloud = generate_galaxy(&params, &mut seeded());

        for (i, rgb) in cloud.colors_rgb().iter().enumerate() {
            for channel in 0..3 {
                let lo = inside[channel].min(outside[channel]) - 1e-6;
                let hi = inside[channel].max(outside[channel]) + 1e-6;
                assert!(
                    (lo..=hi).contains(&rgb[channel]),
                    "particle {i} channel {channel} = {} outside [{lo}, {hi}]",
                    rgb[channel]
                );
            }
        }
    }

    #[test]
    fn color_tracks_normalized_distance() {
        let params = GalaxyParameters {
            count: 500,
            randomness: 0.0,
            inside_color: Srgba::BLACK,
            outside_color: Srgba::WHITE,
            ..default()
        };
        let cloud = generate_galaxy(&params, &mut seeded());
        for i in 0..cloud.len() {
            let t = cloud.position(i).length() / params.radius;
            assert!((cloud.color(i).red - t).abs() < 1e-4);
        }
    }

    #[test]
    fn particles_one_branch_apart_share_an_arm() {
        let branches = 4;
        for i in 0..40 {
            assert_eq!(branch_angle(i, branches), branch_angle(i + branches, branches));
        }

        let params = GalaxyParameters {
            count: 40,
            branches,
            spin: 0.0,
            randomness: 0.0,
            ..default()
        };
        let cloud = generate_galaxy(&params, &mut seeded());
        for i in 0..(cloud.len() - branches as usize) {
            let a = cloud.position(i);
            let b = cloud.position(i + branches as usize);
            let cross = a.x * b.z - a.z * b.x;
            assert!(cross.abs() < 1e-4, "particles {i} and {} diverge", i + branches as usize);
            assert!(a.x * b.x + a.z * b.z >= 0.0);
        }
    }

    #[test]
    fn higher_randomness_power_tightens_jitter() {
        let base = GalaxyParameters {
            count: 20_000,
            spin: 0.0,
            randomness: 1.0,
            ..default()
        };
        let loose = mean_abs_height(&GalaxyParameters {
            randomness_power: 1.0,
            ..base.clone()
        });
        let medium = mean_abs_height(&GalaxyParameters {
            randomness_power: 3.0,
            ..base.clone()
        });
        let tight = mean_abs_height(&GalaxyParameters {
            randomness_power: 8.0,
            ..base
        });
        assert!(loose > medium, "{loose} <= {medium}");
        assert!(medium > tight, "{medium} <= {tight}");
    }

    #[test]
    fn zero_randomness_keeps_the_disk_flat() {
        let params = GalaxyParameters {
            count: 1000,
            randomness: 0.0,
            ..default()
        };
        let cloud = generate_galaxy(&params, &mut seeded());
        assert!(cloud.positions_xyz().iter().all(|p| p[1] == 0.0));
    }

    #[test]
    fn regenerating_with_same_parameters_reshuffles_particles() {
        let params = GalaxyParameters {
            count: 1000,
            ..default()
        };
        let first = generate_galaxy(&params, &mut rand::rng());
        let second = generate_galaxy(&params, &mut rand::rng());
        assert_eq!(first.len(), second.len());
        assert_ne!(first.positions, second.positions);
    }

    #[test]
    fn two_straight_arms_without_jitter() {
        let params = GalaxyParameters {
            count: 4,
            branches: 2,
            radius: 1.0,
            spin: 0.0,
            randomness: 0.0,
            ..default()
        };
        assert_eq!(branch_angle(0, 2), 0.0);
        assert_eq!(branch_angle(2, 2), 0.0);
        assert_eq!(branch_angle(1, 2), PI);
        assert_eq!(branch_angle(3, 2), PI);

        let cloud = generate_galaxy(&params, &mut seeded());
        for i in 0..4 {
            let p = cloud.position(i);
            let expected_direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            assert!(p.z.abs() < 1e-6, "particle {i} left the x axis: {p}");
            assert_eq!(p.y, 0.0);
            assert!(p.x * expected_direction >= 0.0, "particle {i} on wrong arm: {p}");
            assert!(p.x.abs() < 1.0);
        }
    }

    #[test]
    fn spin_twists_arms_with_distance() {
        let params = GalaxyParameters {
            count: 300,
            branches: 3,
            spin: 1.5,
            randomness: 0.0,
            ..default()
        };
        let cloud = generate_galaxy(&params, &mut seeded());
        for i in 0..cloud.len() {
            let p = cloud.position(i);
            let distance = p.length();
            if distance < 1e-3 {
                continue;
            }
            let expected = branch_angle(i as u32, params.branches) + distance * params.spin;
            let actual = p.z.atan2(p.x);
            let diff = (actual - expected).rem_euclid(TAU);
            assert!(
                diff < 1e-3 || diff > TAU - 1e-3,
                "particle {i} at angle {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn jitter_stays_within_randomness_of_the_spiral() {
        let params = GalaxyParameters {
            count: 2000,
            branches: 4,
            spin: 2.0,
            randomness: 0.3,
            randomness_power: 2.0,
            ..default()
        };
        let cloud = generate_galaxy(&params, &mut seeded());

        // replay the same draws to recover each particle's distance
        let mut replay = seeded();
        let mut displaced = 0;
        for i in 0..cloud.len() {
            let distance = replay.random::<f32>() * params.radius;
            let jitters = [
                jitter(&mut replay, &params, distance),
                jitter(&mut replay, &params, distance),
                jitter(&mut replay, &params, distance),
            ];
            let angle = branch_angle(i as u32, params.branches) + distance * params.spin;
            let ideal = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
            let offset = cloud.position(i) - ideal;
            let bound = params.randomness * distance + 1e-5;

            for (axis, (&off, &expected)) in offset.to_array().iter().zip(&jitters).enumerate() {
                assert!(off.abs() <= bound, "particle {i} axis {axis}: {off} > {bound}");
                assert!((off - expected).abs() < 1e-5, "particle {i} axis {axis}");
            }
            if offset.x.abs() > 1e-4 && offset.z.abs() > 1e-4 {
                displaced += 1;
            }
        }
        assert!(displaced > cloud.len() / 2, "only {displaced} particles jittered in the plane");
    }
}
