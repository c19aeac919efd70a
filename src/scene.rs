//! Scene lifecycle: `SceneState`, shared resources and `ScenePlugin`.
//!
//! ## States
//!
//! | State        | Description                                           |
//! |--------------|-------------------------------------------------------|
//! | `NotStarted` | Initial state; nothing exists yet                     |
//! | `Running`    | Boundaries and glyphs live, physics stepping          |
//! | `TornDown`   | Everything released; may be mounted again             |
//!
//! ## Systems (registered by `ScenePlugin`)
//!
//! | System            | Schedule                   | Purpose                              |
//! |-------------------|----------------------------|--------------------------------------|
//! | `bootstrap_scene` | `OnEnter(Running)`         | Surface, boundaries, start physics   |
//! | `import_glyphs`   | `OnEnter(Running)`, after  | Outline → dynamic glyph bodies       |
//! | `resize_scene`    | `Update / in Running`      | Follow container size changes        |
//! | `teardown_scene`  | `OnExit(Running)`          | Stop surface, clear world            |

use crate::config::SceneConfig;
use crate::decomposition::ShapeDecomposer;
use crate::glyphs::GlyphLibrary;
use crate::outline::container_to_world;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

mod bootstrap;
mod importer;
mod resize;
mod teardown;

pub use bootstrap::{bootstrap_scene, boundary_layout, BoundaryPlacement};
pub use importer::{build_glyph, drop_point, import_glyphs, GlyphShape};
pub use resize::{resize_scene, ContainerResized};
pub use teardown::teardown_scene;

// ── Scene state ───────────────────────────────────────────────────────────────

/// Mount lifecycle of the scene.
///
/// `Running` is entered once per mount and left once per unmount.  Leaving
/// `Running` always runs the single teardown routine.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneState {
    #[default]
    NotStarted,
    Running,
    TornDown,
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// The element the scene renders into, in logical pixels.
///
/// Absent until the host attaches it; mounting without it is a no-op.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub width: f32,
    pub height: f32,
}

impl Container {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Output surface of the renderer.
///
/// `view` is the container-space rectangle the scene camera frames.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RenderSurface {
    pub size: Vec2,
    pub view: Rect,
    pub running: bool,
}

impl RenderSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            view: Rect::from_corners(Vec2::ZERO, size),
            running: true,
        }
    }

    /// Match a new container size; the view keeps its top-left anchor.
    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
        self.view = Rect::from_corners(Vec2::ZERO, size);
    }

    /// Centre of the view in world space.
    pub fn view_centre_world(&self) -> Vec2 {
        container_to_world(self.view.center())
    }
}

/// Lifecycle counters, useful for diagnostics and tests.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneLifecycle {
    /// Successful mounts (skipped mounts are not counted).
    pub mounts: u32,
    /// Times a running render surface was stopped.
    pub render_stops: u32,
    /// Times the teardown routine ran.
    pub teardowns: u32,
}

// ── Components ────────────────────────────────────────────────────────────────

/// Every entity owned by the scene's physics world.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneBody;

/// Static boundary body kind.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Floor,
    LeftWall,
    RightWall,
}

/// A dynamic body imported from an outline.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Position among the matching outlines, in declaration order.
    pub index: usize,
    /// Scale factor applied to the source outline.
    pub scale: f32,
}

/// Glyph outline rings in body-local world orientation (y up, centred).
#[derive(Component, Debug, Clone)]
pub struct GlyphOutline(pub Vec<Vec<Vec2>>);

/// Convex pieces of the glyph in body-local space, one per collider part.
#[derive(Component, Debug, Clone)]
pub struct GlyphPieces(pub Vec<Vec<Vec2>>);

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers `SceneState`, the scene resources, and the lifecycle systems.
///
/// The convex decomposer is injected here; it defaults to
/// [`crate::decomposition::EarcutDecomposer`].
#[derive(Default)]
pub struct ScenePlugin {
    decomposer: ShapeDecomposer,
}

impl ScenePlugin {
    pub fn with_decomposer(decomposer: ShapeDecomposer) -> Self {
        Self { decomposer }
    }
}

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<SceneState>()
            .init_resource::<SceneConfig>()
            .init_resource::<GlyphLibrary>()
            .init_resource::<SceneLifecycle>()
            .insert_resource(self.decomposer.clone())
            .add_message::<ContainerResized>()
            .add_systems(
                OnEnter(SceneState::Running),
                (bootstrap_scene, import_glyphs).chain(),
            )
            .add_systems(OnExit(SceneState::Running), teardown_scene)
            .add_systems(
                Update,
                resize_scene.run_if(in_state(SceneState::Running)),
            );
    }
}

/// Enable or disable the Rapier pipeline on every physics context.
pub(crate) fn set_physics_active(config: &mut Query<&mut RapierConfiguration>, active: bool) {
    for mut cfg in config.iter_mut() {
        cfg.physics_pipeline_active = active;
    }
}
