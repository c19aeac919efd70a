use super::*;

/// Unmount: stop the surface, clear the world and park physics.
///
/// Runs on every exit from `Running`, including mounts that were skipped for
/// lack of a container, so it must tolerate missing state.  The resize
/// reactor only runs in `Running`, so it is detached from here on.
///
/// The Rapier pipeline is disabled before the bodies go away so no step runs
/// while their handles are being flushed.
pub fn teardown_scene(
    mut commands: Commands,
    bodies: Query<Entity, With<SceneBody>>,
    surface: Option<ResMut<RenderSurface>>,
    mut lifecycle: ResMut<SceneLifecycle>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    set_physics_active(&mut rapier_config, false);

    if let Some(mut surface) = surface {
        if surface.running {
            surface.running = false;
            lifecycle.render_stops += 1;
        }
        surface.view = Rect::from_corners(Vec2::ZERO, Vec2::ZERO);
    }

    let mut removed = 0;
    for entity in bodies.iter() {
        commands.entity(entity).despawn();
        removed += 1;
    }

    lifecycle.teardowns += 1;
    info!("[scene] Torn down; released {removed} bodies");
}
