use super::*;

/// Where one static boundary goes, in container space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPlacement {
    pub kind: Boundary,
    /// Centre in container space (y down).
    pub centre: Vec2,
    /// Full width and height.
    pub size: Vec2,
}

/// Floor centre: flush below the container's bottom edge.
pub(crate) fn floor_centre(size: Vec2, thickness: f32) -> Vec2 {
    Vec2::new(size.x / 2.0, size.y + thickness / 2.0)
}

/// Left wall centre: flush left of the container's left edge.
pub(crate) fn left_wall_centre(size: Vec2, thickness: f32) -> Vec2 {
    Vec2::new(-thickness / 2.0, size.y / 2.0)
}

/// Right wall centre: flush right of the container's right edge.
pub(crate) fn right_wall_centre(size: Vec2, thickness: f32) -> Vec2 {
    Vec2::new(size.x + thickness / 2.0, size.y / 2.0)
}

/// Floor, left wall and right wall for a container.
///
/// All three extend past the container so nothing can fall out of it.
pub fn boundary_layout(container: &Container, config: &SceneConfig) -> [BoundaryPlacement; 3] {
    let size = container.size();
    let t = config.wall_thickness;
    let wall = Vec2::new(t, size.y * config.wall_height_factor);
    [
        BoundaryPlacement {
            kind: Boundary::Floor,
            centre: floor_centre(size, t),
            size: Vec2::new(config.floor_width, t),
        },
        BoundaryPlacement {
            kind: Boundary::LeftWall,
            centre: left_wall_centre(size, t),
            size: wall,
        },
        BoundaryPlacement {
            kind: Boundary::RightWall,
            centre: right_wall_centre(size, t),
            size: wall,
        },
    ]
}

/// Mount: create the render surface and boundaries, then start physics.
///
/// Does nothing at all when no [`Container`] is attached yet.
pub fn bootstrap_scene(
    mut commands: Commands,
    container: Option<Res<Container>>,
    config: Res<SceneConfig>,
    mut lifecycle: ResMut<SceneLifecycle>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    let Some(container) = container else {
        warn!("[scene] Container not attached; skipping mount");
        return;
    };

    commands.insert_resource(RenderSurface::new(container.size()));

    for placement in boundary_layout(&container, &config) {
        commands.spawn((
            SceneBody,
            placement.kind,
            RigidBody::Fixed,
            Collider::cuboid(placement.size.x / 2.0, placement.size.y / 2.0),
            Transform::from_translation(container_to_world(placement.centre).extend(0.0)),
            GlobalTransform::default(),
        ));
    }

    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.gravity);
    }
    set_physics_active(&mut rapier_config, true);

    lifecycle.mounts += 1;
    info!(
        "[scene] Mounted into {}x{} container (mount #{})",
        container.width, container.height, lifecycle.mounts
    );
}
