use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use glyphfall::config::{self, SceneConfig};
use glyphfall::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use glyphfall::glyphs;
use glyphfall::interaction::InteractionPlugin;
use glyphfall::rendering::{self, PresentationPlugin};
use glyphfall::scene::{ScenePlugin, SceneState};

/// Mount the scene once the container is attached.
fn request_mount(mut next_state: ResMut<NextState<SceneState>>) {
    next_state.set(SceneState::Running);
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Glyphfall".into(),
                resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                ..Default::default()
            }),
            ..Default::default()
        }))
        // Insert SceneConfig with compiled defaults; load_scene_config will
        // overwrite it from assets/scene.toml (if present) in the Startup schedule.
        .insert_resource(SceneConfig::default())
        // Glyphs are tens to hundreds of pixels across; 100 px per metre keeps
        // them in the size range Rapier's tolerances are tuned for.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(100.0))
        .add_plugins((ScenePlugin::default(), InteractionPlugin, PresentationPlugin))
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the final values.
                config::load_scene_config,
                glyphs::load_glyph_library.after(config::load_scene_config),
                request_mount
                    .after(rendering::attach_container)
                    .after(glyphs::load_glyph_library),
            ),
        )
        .run();
}
