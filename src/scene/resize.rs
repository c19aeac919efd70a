use super::bootstrap::{floor_centre, right_wall_centre};
use super::*;

/// The container changed size (logical pixels).
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ContainerResized {
    pub width: f32,
    pub height: f32,
}

/// Follow the container: resize the surface and move the floor and right wall.
///
/// The left wall never moves and body sizes are kept.  Glyphs are left where
/// they are, even if the container shrank past them.  Only the most recent
/// size in a frame matters.
pub fn resize_scene(
    mut resized: MessageReader<ContainerResized>,
    config: Res<SceneConfig>,
    surface: Option<ResMut<RenderSurface>>,
    mut boundaries: Query<(&Boundary, &mut Transform)>,
) {
    let Some(latest) = resized.read().last().copied() else {
        return;
    };
    let Some(mut surface) = surface else {
        return;
    };

    let size = Vec2::new(latest.width, latest.height);
    surface.resize(size);

    let t = config.wall_thickness;
    for (kind, mut transform) in boundaries.iter_mut() {
        let centre = match kind {
            Boundary::Floor => floor_centre(size, t),
            Boundary::RightWall => right_wall_centre(size, t),
            Boundary::LeftWall => continue,
        };
        let world = container_to_world(centre);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }

    debug!("[scene] Resized to {}x{}", latest.width, latest.height);
}
