use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    input::mouse::{AccumulatedMouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use bevy_egui::EguiContexts;
use std::f32::consts::FRAC_PI_2;

const START_POSITION: Vec3 = Vec3::new(3.0, 3.0, 3.0);

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, camera_control_system);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Tonemapping::None,
        Transform::from_translation(START_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::looking_at(START_POSITION, Vec3::ZERO),
    ));
}

/// Orbit controls with damping: input moves the target orbit,
/// the camera eases toward it every frame.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    focus: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    target_yaw: f32,
    target_pitch: f32,
    target_distance: f32,
}

impl OrbitCamera {
    const MIN_DISTANCE: f32 = 0.5;
    const MAX_DISTANCE: f32 = 50.0;
    // stay just short of the poles so looking_at keeps a stable up vector
    const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;
    const ROTATE_SPEED: f32 = 0.005;
    const ZOOM_SPEED: f32 = 0.1;
    const DAMPING: f32 = 10.0;

    pub fn looking_at(position: Vec3, focus: Vec3) -> Self {
        let offset = position - focus;
        let distance = offset.length();
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).asin();
        Self {
            focus,
            yaw,
            pitch,
            distance,
            target_yaw: yaw,
            target_pitch: pitch,
            target_distance: distance,
        }
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.focus + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Drag delta in logical pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        self.target_yaw -= delta.x * Self::ROTATE_SPEED;
        self.target_pitch = (self.target_pitch + delta.y * Self::ROTATE_SPEED)
            .clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    /// Positive scroll moves the camera in.
    pub fn zoom(&mut self, lines: f32) {
        self.target_distance = (self.target_distance * (1.0 - lines * Self::ZOOM_SPEED))
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn damp(&mut self, delta_secs: f32) {
        let t = 1.0 - (-Self::DAMPING * delta_secs).exp();
        self.yaw += (self.target_yaw - self.yaw) * t;
        self.pitch += (self.target_pitch - self.pitch) * t;
        self.distance += (self.target_distance - self.distance) * t;
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };

    // the panel owns the pointer while it is hovered or being dragged
    let ui_has_pointer = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());

    if ui_has_pointer {
        scroll_evr.clear();
    } else {
        if mouse_buttons.pressed(MouseButton::Left) {
            orbit.orbit(mouse_motion.delta);
        }
        for ev in scroll_evr.read() {
            match ev.unit {
                MouseScrollUnit::Line => orbit.zoom(ev.y),
                MouseScrollUnit::Pixel => orbit.zoom(ev.y / 40.0),
            }
        }
    }

    orbit.damp(time.delta_secs());
    *transform = Transform::from_translation(orbit.translation()).looking_at(orbit.focus, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_where_it_was_placed() {
        let orbit = OrbitCamera::looking_at(START_POSITION, Vec3::ZERO);
        assert!(orbit.translation().distance(START_POSITION) < 1e-5);
    }

    #[test]
    fn pitch_stops_short_of_the_pole() {
        let mut orbit = OrbitCamera::looking_at(START_POSITION, Vec3::ZERO);
        orbit.orbit(Vec2::new(0.0, 10_000.0));
        assert!(orbit.target_pitch < FRAC_PI_2);
        orbit.orbit(Vec2::new(0.0, -20_000.0));
        assert!(orbit.target_pitch > -FRAC_PI_2);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut orbit = OrbitCamera::looking_at(START_POSITION, Vec3::ZERO);
        for _ in 0..200 {
            orbit.zoom(5.0);
        }
        assert_eq!(orbit.target_distance, OrbitCamera::MIN_DISTANCE);
        for _ in 0..200 {
            orbit.zoom(-5.0);
        }
        assert_eq!(orbit.target_distance, OrbitCamera::MAX_DISTANCE);
    }

    #[test]
    fn damping_eases_toward_the_target() {
        let mut orbit = OrbitCamera::looking_at(START_POSITION, Vec3::ZERO);
        orbit.zoom(-3.0);
        let start = orbit.distance;
        let target = orbit.target_distance;

        orbit.damp(1.0 / 60.0);
        assert!(orbit.distance > start && orbit.distance < target);

        for _ in 0..600 {
            orbit.damp(1.0 / 60.0);
        }
        assert!((orbit.distance - target).abs() < 1e-3);
    }
}
