//! Headless tests for the mount / resize / unmount lifecycle.
//!
//! These tests use [`MinimalPlugins`] with no window, rendering or physics
//! stepping, so they only check what the lifecycle systems spawn and move.
//!
//! Covered scenarios:
//! 1. Mounting creates three boundaries and one body per built-in glyph.
//! 2. Glyph scale follows the container width.
//! 3. Resizing moves the floor and right wall only.
//! 4. Unmounting stops the surface once and detaches resize handling.
//! 5. Remounting rebuilds the same scene.
//! 6. Mounting without a container does nothing; unmounting is still safe.
//! 7. An injected decomposer is used for every glyph.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy_rapier2d::prelude::RapierConfiguration;
use glyphfall::decomposition::{HullDecomposer, ShapeDecomposer};
use glyphfall::outline::container_to_world;
use glyphfall::scene::{
    Boundary, Container, ContainerResized, Glyph, GlyphPieces, RenderSurface, SceneBody,
    SceneLifecycle, ScenePlugin, SceneState,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Headless app with `ScenePlugin`, an attached container and a physics
/// configuration entity standing in for Rapier's default context.
fn app_with_container(width: f32, height: f32) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, ScenePlugin::default()));
    app.insert_resource(Container::new(width, height));
    app.world_mut().spawn(RapierConfiguration::new(1.0));
    app
}

fn set_state(app: &mut App, state: SceneState) {
    app.world_mut()
        .resource_mut::<NextState<SceneState>>()
        .set(state);
    app.update();
}

fn mount(app: &mut App) {
    set_state(app, SceneState::Running);
}

fn unmount(app: &mut App) {
    set_state(app, SceneState::TornDown);
}

fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count()
}

/// Glyph scales ordered by glyph index.
fn glyph_scales(app: &mut App) -> Vec<f32> {
    let mut glyphs: Vec<Glyph> = app
        .world_mut()
        .query::<&Glyph>()
        .iter(app.world())
        .copied()
        .collect();
    glyphs.sort_by_key(|g| g.index);
    glyphs.into_iter().map(|g| g.scale).collect()
}

fn boundary_position(app: &mut App, kind: Boundary) -> Vec2 {
    app.world_mut()
        .query::<(&Boundary, &Transform)>()
        .iter(app.world())
        .find(|(b, _)| **b == kind)
        .map(|(_, t)| t.translation.truncate())
        .expect("boundary should exist")
}

/// `(pipeline active, gravity)` of the single physics configuration.
fn physics_state(app: &mut App) -> (bool, Vec2) {
    app.world_mut()
        .query::<&RapierConfiguration>()
        .single(app.world())
        .map(|cfg| (cfg.physics_pipeline_active, cfg.gravity))
        .expect("one physics configuration")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// One mount: three static boundaries plus the ten built-in glyphs.
#[test]
fn mount_builds_boundaries_and_glyphs() {
    let mut app = app_with_container(1200.0, 800.0);
    mount(&mut app);

    assert_eq!(count::<With<Boundary>>(&mut app), 3);
    assert_eq!(count::<With<Glyph>>(&mut app), 10);
    assert_eq!(count::<With<SceneBody>>(&mut app), 13);

    let lifecycle = *app.world().resource::<SceneLifecycle>();
    assert_eq!(lifecycle.mounts, 1);
    assert_eq!(lifecycle.teardowns, 0);

    let surface = app.world().resource::<RenderSurface>();
    assert!(surface.running, "surface must run after mount");
    assert_eq!(surface.size, Vec2::new(1200.0, 800.0));
}

/// Mounting starts physics with downward gravity; unmounting parks it.
#[test]
fn mount_and_unmount_toggle_physics() {
    let mut app = app_with_container(1200.0, 800.0);
    mount(&mut app);

    let (active, gravity) = physics_state(&mut app);
    assert!(active);
    assert_eq!(gravity, Vec2::new(0.0, -980.0));

    unmount(&mut app);
    assert!(!physics_state(&mut app).0);
}

/// Every glyph is scaled by `width × 0.3 / 300`.
#[test]
fn glyph_scale_follows_container_width() {
    let mut app = app_with_container(1000.0, 700.0);
    mount(&mut app);

    let scales = glyph_scales(&mut app);
    assert!(!scales.is_empty());
    for scale in scales {
        assert!((scale - 1.0).abs() < 1e-6, "expected 1000×0.3/300 = 1, got {scale}");
    }
}

/// Glyphs start staggered along the same drop height.
#[test]
fn glyphs_start_at_their_drop_points() {
    let mut app = app_with_container(1200.0, 800.0);
    mount(&mut app);

    let mut drops: Vec<(usize, Vec2)> = app
        .world_mut()
        .query::<(&Glyph, &Transform)>()
        .iter(app.world())
        .map(|(g, t)| (g.index, t.translation.truncate()))
        .collect();
    drops.sort_by_key(|(i, _)| *i);

    assert_eq!(drops[0].1, container_to_world(Vec2::new(100.0, 800.0)));
    assert_eq!(drops[1].1, container_to_world(Vec2::new(250.0, 800.0)));
}

/// Resizing moves the floor and right wall; the left wall stays put.
#[test]
fn resize_moves_floor_and_right_wall() {
    let mut app = app_with_container(1200.0, 800.0);
    mount(&mut app);
    let left_before = boundary_position(&mut app, Boundary::LeftWall);

    app.world_mut().write_message(ContainerResized {
        width: 900.0,
        height: 600.0,
    });
    app.update();

    assert_eq!(
        boundary_position(&mut app, Boundary::Floor),
        container_to_world(Vec2::new(450.0, 630.0))
    );
    assert_eq!(
        boundary_position(&mut app, Boundary::RightWall),
        container_to_world(Vec2::new(930.0, 300.0))
    );
    assert_eq!(boundary_position(&mut app, Boundary::LeftWall), left_before);
    assert_eq!(
        app.world().resource::<RenderSurface>().size,
        Vec2::new(900.0, 600.0)
    );
}

/// Only the last resize of a frame counts.
#[test]
fn last_resize_in_a_frame_wins() {
    let mut app = app_with_container(1200.0, 800.0);
    mount(&mut app);

    app.world_mut().write_message(ContainerResized {
        width: 500.0,
        height: 500.0,
    });
    app.world_mut().write_message(ContainerResized {
        width: 700.0,
        height: 400.0,
    });
    app.update();

    assert_eq!(
        boundary_position(&mut app, Boundary::RightWall),
        container_to_world(Vec2::new(730.0, 200.0))
    );
}

/// Unmount stops the surface once, clears the world and ignores later resizes.
#[test]
fn unmount_releases_everything_and_detaches_resize() {
    let mut app = app_with_container(1200.0, 800.0);
    mount(&mut app);
    unmount(&mut app);

    assert_eq!(count::<With<SceneBody>>(&mut app), 0);
    let lifecycle = *app.world().resource::<SceneLifecycle>();
    assert_eq!(lifecycle.render_stops, 1);
    assert_eq!(lifecycle.teardowns, 1);

    let surface = app.world().resource::<RenderSurface>().clone();
    assert!(!surface.running);
    assert_eq!(surface.view.size(), Vec2::ZERO);

    app.world_mut().write_message(ContainerResized {
        width: 300.0,
        height: 300.0,
    });
    app.update();

    assert_eq!(
        app.world().resource::<RenderSurface>().size,
        surface.size,
        "resize after unmount must be ignored"
    );
    assert_eq!(count::<With<SceneBody>>(&mut app), 0);
}

/// Unmount then mount again gives the same scene.
#[test]
fn remount_rebuilds_the_same_scene() {
    let mut app = app_with_container(1200.0, 800.0);
    mount(&mut app);
    let first = glyph_scales(&mut app);
    assert_eq!(first.len(), 10);
    unmount(&mut app);
    mount(&mut app);

    assert_eq!(count::<With<Boundary>>(&mut app), 3);
    assert_eq!(count::<With<Glyph>>(&mut app), 10);
    assert_eq!(glyph_scales(&mut app), first);
    assert!(app.world().resource::<RenderSurface>().running);

    let lifecycle = *app.world().resource::<SceneLifecycle>();
    assert_eq!(lifecycle.mounts, 2);
    assert_eq!(lifecycle.render_stops, 1);
}

/// Without a container nothing is created, and teardown still runs cleanly.
#[test]
fn mount_without_container_is_a_no_op() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, ScenePlugin::default()));

    mount(&mut app);
    assert_eq!(count::<With<SceneBody>>(&mut app), 0);
    assert!(app.world().get_resource::<RenderSurface>().is_none());
    assert_eq!(app.world().resource::<SceneLifecycle>().mounts, 0);

    unmount(&mut app);
    let lifecycle = *app.world().resource::<SceneLifecycle>();
    assert_eq!(lifecycle.teardowns, 1);
    assert_eq!(lifecycle.render_stops, 0);
}

/// A decomposer passed to the plugin is used for every glyph.
#[test]
fn injected_decomposer_is_used() {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        ScenePlugin::with_decomposer(ShapeDecomposer::new(HullDecomposer)),
    ));
    app.insert_resource(Container::new(1200.0, 800.0));
    mount(&mut app);

    let pieces: Vec<usize> = app
        .world_mut()
        .query::<&GlyphPieces>()
        .iter(app.world())
        .map(|p| p.0.len())
        .collect();
    assert_eq!(pieces.len(), 10);
    assert!(pieces.iter().all(|&n| n == 1), "hull gives one piece each");
}
