//! Pointer input and the drag constraint.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`track_pointer_system`]: copies cursor position and left button into [`Pointer`].
//! 2. [`grab_body_system`]: on press, grabs the glyph under the pointer.
//! 3. [`drag_body_system`]: drives the grabbed glyph toward the pointer.
//! 4. [`release_body_system`]: lets go when the button is released.
//!
//! Steps 2–4 only run while the scene is mounted.  The [`Pointer`] resource
//! is the input abstraction: tests populate it directly and skip step 1.
//!
//! Also contains [`keyboard_lifecycle_system`]: `Space` mounts/unmounts the
//! scene, `Escape` quits.

use crate::config::SceneConfig;
use crate::outline::container_to_world;
use crate::scene::{Glyph, SceneState};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Latest pointer state.  `position` is in container space (y down).
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub position: Option<Vec2>,
    pub pressed: bool,
    pub just_pressed: bool,
}

impl Pointer {
    /// Pointer position in world space.
    pub fn world_position(&self) -> Option<Vec2> {
        self.position.map(container_to_world)
    }
}

/// Spring-like link between the pointer and a grabbed body.
///
/// Never rendered.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct DragConstraint {
    /// The grabbed body, if any.
    pub body: Option<Entity>,
    /// Grab point in the body's local frame.
    pub local_anchor: Vec2,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for DragConstraint {
    fn default() -> Self {
        let config = SceneConfig::default();
        Self {
            body: None,
            local_anchor: Vec2::ZERO,
            stiffness: config.drag_stiffness,
            damping: config.drag_damping,
        }
    }
}

impl DragConstraint {
    pub fn grab(&mut self, body: Entity, local_anchor: Vec2) {
        self.body = Some(body);
        self.local_anchor = local_anchor;
    }

    pub fn release(&mut self) {
        self.body = None;
        self.local_anchor = Vec2::ZERO;
    }
}

/// Velocity that moves `anchor` toward `target`.
///
/// `stiffness` is the fraction of the gap closed per `reference_step`;
/// `damping` blends from the current velocity (0.0) to the constraint
/// velocity (1.0).
pub fn drag_velocity(
    anchor: Vec2,
    target: Vec2,
    current: Vec2,
    stiffness: f32,
    damping: f32,
    reference_step: f32,
) -> Vec2 {
    let wanted = (target - anchor) * stiffness / reference_step;
    current.lerp(wanted, damping.clamp(0.0, 1.0))
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Pointer dragging plus keyboard mount/unmount.
///
/// Needs a window and input, so headless setups leave it out.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Pointer>()
            .init_resource::<DragConstraint>()
            .add_systems(OnEnter(SceneState::Running), configure_drag_constraint)
            .add_systems(OnExit(SceneState::Running), release_drag_constraint)
            .add_systems(
                Update,
                (
                    track_pointer_system,
                    (grab_body_system, drag_body_system, release_body_system)
                        .run_if(in_state(SceneState::Running)),
                )
                    .chain(),
            )
            .add_systems(Update, keyboard_lifecycle_system);
    }
}

// ── Lifecycle hooks ───────────────────────────────────────────────────────────

/// Mount: take stiffness and damping from the loaded config.
pub fn configure_drag_constraint(config: Res<SceneConfig>, mut drag: ResMut<DragConstraint>) {
    drag.release();
    drag.stiffness = config.drag_stiffness;
    drag.damping = config.drag_damping;
}

/// Unmount: drop whatever was held.
pub fn release_drag_constraint(mut drag: ResMut<DragConstraint>) {
    drag.release();
}

// ── Step 1: Window → Pointer ──────────────────────────────────────────────────

/// Copy the primary window's cursor and left button into [`Pointer`].
///
/// The window is the container, so the cursor's top-left logical position is
/// already in container space.
pub fn track_pointer_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut pointer: ResMut<Pointer>,
) {
    pointer.position = windows.single().ok().and_then(|w| w.cursor_position());
    pointer.pressed = buttons.pressed(MouseButton::Left);
    pointer.just_pressed = buttons.just_pressed(MouseButton::Left);
}

// ── Step 2: Grab ──────────────────────────────────────────────────────────────

/// On press, grab the glyph under the pointer.
pub fn grab_body_system(
    pointer: Res<Pointer>,
    mut drag: ResMut<DragConstraint>,
    rapier_context: ReadRapierContext,
    glyphs: Query<&Transform, With<Glyph>>,
) {
    if !pointer.just_pressed || drag.body.is_some() {
        return;
    }
    let Some(point) = pointer.world_position() else {
        return;
    };
    let Ok(rapier) = rapier_context.single() else {
        return;
    };

    let hit = rapier.with_query_pipeline(QueryFilter::only_dynamic(), |query_pipeline| {
        query_pipeline
            .intersect_point(point)
            .find(|entity| glyphs.contains(*entity))
    });

    let Some(entity) = hit else {
        return;
    };
    let Ok(transform) = glyphs.get(entity) else {
        return;
    };
    drag.grab(entity, anchor_in_body(transform, point));
    debug!("[drag] Grabbed {entity:?}");
}

/// World `point` expressed in the body frame given by `transform`.
pub fn anchor_in_body(transform: &Transform, point: Vec2) -> Vec2 {
    let local = transform.rotation.inverse() * (point.extend(0.0) - transform.translation);
    local.truncate()
}

// ── Step 3: Drag ──────────────────────────────────────────────────────────────

/// Drive the grabbed body's anchor toward the pointer.
///
/// Lets go if the body no longer exists.
pub fn drag_body_system(
    pointer: Res<Pointer>,
    config: Res<SceneConfig>,
    mut drag: ResMut<DragConstraint>,
    mut bodies: Query<(&Transform, &mut Velocity)>,
) {
    let Some(entity) = drag.body else {
        return;
    };
    let Ok((transform, mut velocity)) = bodies.get_mut(entity) else {
        drag.release();
        return;
    };
    let Some(target) = pointer.world_position() else {
        return;
    };

    let anchor = transform
        .transform_point(drag.local_anchor.extend(0.0))
        .truncate();
    velocity.linvel = drag_velocity(
        anchor,
        target,
        velocity.linvel,
        drag.stiffness,
        drag.damping,
        config.drag_reference_step,
    );
}

// ── Step 4: Release ───────────────────────────────────────────────────────────

/// Let go once the button is up.
pub fn release_body_system(pointer: Res<Pointer>, mut drag: ResMut<DragConstraint>) {
    if !pointer.pressed && drag.body.is_some() {
        drag.release();
    }
}

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// `Space` toggles mount/unmount; `Escape` exits.
pub fn keyboard_lifecycle_system(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<SceneState>>,
    mut next_state: ResMut<NextState<SceneState>>,
    mut exit: MessageWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Space) {
        let next = match state.get() {
            SceneState::Running => SceneState::TornDown,
            SceneState::NotStarted | SceneState::TornDown => SceneState::Running,
        };
        info!("[scene] {:?} → {:?}", state.get(), next);
        next_state.set(next);
    }
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal app with just what the drag/release steps read.
    fn build_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SceneConfig::default());
        app.insert_resource(DragConstraint::default());
        app.insert_resource(Pointer::default());
        app.add_systems(Update, (drag_body_system, release_body_system).chain());
        app
    }

    fn spawn_body(app: &mut App, at: Vec2) -> Entity {
        app.world_mut()
            .spawn((Transform::from_translation(at.extend(0.0)), Velocity::zero()))
            .id()
    }

    fn velocity_of(app: &App, entity: Entity) -> Vec2 {
        app.world().get::<Velocity>(entity).unwrap().linvel
    }

    #[test]
    fn full_damping_replaces_current_velocity() {
        let v = drag_velocity(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(-500.0, 300.0),
            0.1,
            1.0,
            1.0 / 60.0,
        );
        assert!((v - Vec2::new(60.0, 0.0)).length() < 1e-3, "got {v:?}");
    }

    #[test]
    fn zero_damping_keeps_current_velocity() {
        let current = Vec2::new(3.0, 4.0);
        let v = drag_velocity(Vec2::ZERO, Vec2::new(100.0, 0.0), current, 0.1, 0.0, 1.0 / 60.0);
        assert_eq!(v, current);
    }

    #[test]
    fn anchor_is_undone_by_the_body_rotation() {
        let transform = Transform::from_xyz(100.0, -100.0, 0.0)
            .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        // 10 px right of the centre in the world is 10 px down the body's y axis.
        let anchor = anchor_in_body(&transform, Vec2::new(110.0, -100.0));
        assert!((anchor - Vec2::new(0.0, -10.0)).length() < 1e-4, "got {anchor:?}");
        let back = transform.transform_point(anchor.extend(0.0)).truncate();
        assert!((back - Vec2::new(110.0, -100.0)).length() < 1e-3);
    }

    #[test]
    fn no_gap_means_no_pull() {
        let p = Vec2::new(7.0, -2.0);
        assert_eq!(drag_velocity(p, p, Vec2::ZERO, 0.1, 1.0, 1.0 / 60.0), Vec2::ZERO);
    }

    #[test]
    fn held_body_is_pulled_toward_pointer() {
        let mut app = build_test_app();
        let body = spawn_body(&mut app, Vec2::new(100.0, -100.0));
        app.world_mut()
            .resource_mut::<DragConstraint>()
            .grab(body, Vec2::ZERO);
        // Container (200, 100) is world (200, -100): straight to the right.
        *app.world_mut().resource_mut::<Pointer>() = Pointer {
            position: Some(Vec2::new(200.0, 100.0)),
            pressed: true,
            just_pressed: false,
        };

        app.update();

        let v = velocity_of(&app, body);
        assert!(v.x > 0.0, "expected pull to the right, got {v:?}");
        assert!(v.y.abs() < 1e-3, "expected no vertical pull, got {v:?}");
        assert_eq!(app.world().resource::<DragConstraint>().body, Some(body));
    }

    #[test]
    fn off_centre_anchor_follows_body_rotation() {
        let mut app = build_test_app();
        let body = app
            .world_mut()
            .spawn((
                Transform::from_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
                Velocity::zero(),
            ))
            .id();
        // Local +X rotated 90° CCW is world +Y: the anchor sits at world (0, 10).
        app.world_mut()
            .resource_mut::<DragConstraint>()
            .grab(body, Vec2::new(10.0, 0.0));
        *app.world_mut().resource_mut::<Pointer>() = Pointer {
            position: Some(Vec2::new(0.0, -10.0)),
            pressed: true,
            just_pressed: false,
        };

        app.update();

        let v = velocity_of(&app, body);
        assert!(v.length() < 1e-2, "anchor already under pointer, got {v:?}");
    }

    #[test]
    fn releasing_the_button_drops_the_body() {
        let mut app = build_test_app();
        let body = spawn_body(&mut app, Vec2::ZERO);
        app.world_mut()
            .resource_mut::<DragConstraint>()
            .grab(body, Vec2::ZERO);
        *app.world_mut().resource_mut::<Pointer>() = Pointer {
            position: Some(Vec2::new(50.0, 0.0)),
            pressed: false,
            just_pressed: false,
        };

        app.update();

        assert_eq!(app.world().resource::<DragConstraint>().body, None);
    }

    #[test]
    fn despawned_body_is_released() {
        let mut app = build_test_app();
        let body = spawn_body(&mut app, Vec2::ZERO);
        app.world_mut()
            .resource_mut::<DragConstraint>()
            .grab(body, Vec2::ZERO);
        app.world_mut().resource_mut::<Pointer>().pressed = true;
        app.world_mut().despawn(body);

        app.update();

        assert_eq!(app.world().resource::<DragConstraint>().body, None);
    }
}
