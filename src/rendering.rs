//! Presentation: the window as container, the scene camera and glyph fills.
//!
//! Glyphs get a retained `Mesh2d` once, when they appear.  The mesh is built
//! in body-local space, so Rapier's `Transform` updates move and rotate it
//! with no per-frame work here.
//!
//! The camera is the visible half of [`RenderSurface`]: it exists while the
//! surface runs and frames the surface's view rectangle.

use crate::config::SceneConfig;
use crate::scene::{Container, ContainerResized, Glyph, GlyphPieces, RenderSurface};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

/// Marker for the camera that draws the scene.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneCamera;

/// Window adapter, camera and glyph meshes.  Needs `DefaultPlugins`.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                attach_container,
                apply_background_color.after(crate::config::load_scene_config),
            ),
        )
        .add_systems(
            Update,
            (
                track_window_resize,
                sync_scene_camera,
                attach_glyph_mesh_system,
            ),
        );
    }
}

// ── Window ↔ container ────────────────────────────────────────────────────────

/// Use the primary window's logical size as the container.
pub fn attach_container(mut commands: Commands, windows: Query<&Window, With<PrimaryWindow>>) {
    let Ok(window) = windows.single() else {
        warn!("[scene] No primary window; container stays detached");
        return;
    };
    commands.insert_resource(Container::new(window.width(), window.height()));
    info!(
        "[scene] Container attached at {}x{}",
        window.width(),
        window.height()
    );
}

/// Forward primary-window resizes to the scene.
pub fn track_window_resize(
    mut window_resized: MessageReader<WindowResized>,
    primary: Query<Entity, With<PrimaryWindow>>,
    container: Option<ResMut<Container>>,
    mut container_resized: MessageWriter<ContainerResized>,
) {
    let Ok(primary) = primary.single() else {
        return;
    };
    let Some(latest) = window_resized
        .read()
        .filter(|e| e.window == primary)
        .last()
    else {
        return;
    };

    if let Some(mut container) = container {
        *container = Container::new(latest.width, latest.height);
    }
    container_resized.write(ContainerResized {
        width: latest.width,
        height: latest.height,
    });
}

/// Clear to the configured background colour.
pub fn apply_background_color(mut commands: Commands, config: Res<SceneConfig>) {
    match config.background() {
        Ok(color) => commands.insert_resource(ClearColor(color)),
        Err(e) => warn!("[scene] {e}; keeping default clear colour"),
    }
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// Keep exactly one [`SceneCamera`] while the surface runs, centred on its view.
pub fn sync_scene_camera(
    mut commands: Commands,
    surface: Option<Res<RenderSurface>>,
    mut cameras: Query<(Entity, &mut Transform), With<SceneCamera>>,
) {
    let Some(surface) = surface.filter(|s| s.running) else {
        for (entity, _) in cameras.iter() {
            commands.entity(entity).despawn();
            debug!("[scene] Scene camera removed");
        }
        return;
    };

    let centre = surface.view_centre_world();
    if cameras.is_empty() {
        commands.spawn((
            Camera2d,
            SceneCamera,
            Transform::from_translation(centre.extend(0.0)),
        ));
        debug!("[scene] Scene camera spawned at {centre}");
        return;
    }
    for (_, mut transform) in cameras.iter_mut() {
        transform.translation.x = centre.x;
        transform.translation.y = centre.y;
    }
}

// ── Glyph fills ───────────────────────────────────────────────────────────────

/// Attach a filled mesh to every newly spawned glyph.
pub fn attach_glyph_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &GlyphPieces), Added<Glyph>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    config: Res<SceneConfig>,
) {
    if query.is_empty() {
        return;
    }
    let fill = match config.glyph_fill() {
        Ok(color) => color,
        Err(e) => {
            warn!("[scene] {e}; glyphs drawn white");
            Color::WHITE
        }
    };
    let material = materials.add(ColorMaterial::from_color(fill));

    for (entity, pieces) in query.iter() {
        let Some(mesh) = filled_pieces_mesh(&pieces.0) else {
            continue;
        };
        commands
            .entity(entity)
            .insert((Mesh2d(meshes.add(mesh)), MeshMaterial2d(material.clone())));
    }
}

/// One mesh from several convex polygons, each fan-triangulated from its
/// first vertex.  Pieces with fewer than three vertices are skipped.
///
/// Returns `None` when nothing is left to draw.
pub fn filled_pieces_mesh(pieces: &[Vec<Vec2>]) -> Option<Mesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for piece in pieces.iter().filter(|p| p.len() >= 3) {
        let base = positions.len() as u32;
        positions.extend(piece.iter().map(|v| [v.x, v.y, 0.0]));
        for i in 1..(piece.len() as u32 - 1) {
            indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }
    if indices.is_empty() {
        return None;
    }

    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];
    let uvs: Vec<[f32; 2]> = positions.iter().map(|p| [p[0], p[1]]).collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    Some(mesh)
}
