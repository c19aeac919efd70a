//! Runtime scene configuration loaded from `assets/scene.toml`.
//!
//! [`SceneConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_scene_config`] reads
//! `assets/scene.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `SceneConfig::default()`.

use crate::constants::*;
use crate::error::{SceneError, SceneResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the scene configuration file.
pub const SCENE_CONFIG_PATH: &str = "assets/scene.toml";

/// Runtime-tunable scene configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    // ── Boundaries ────────────────────────────────────────────────────────────
    pub wall_thickness: f32,
    pub floor_width: f32,
    pub wall_height_factor: f32,

    // ── Glyph sizing ──────────────────────────────────────────────────────────
    pub reference_svg_width: f32,
    pub svg_width_fraction: f32,
    pub path_sample_length: f32,

    // ── Glyph placement ───────────────────────────────────────────────────────
    pub drop_start_x: f32,
    pub drop_spacing_x: f32,
    pub drop_height: f32,
    pub outline_id: String,

    // ── Glyph material ────────────────────────────────────────────────────────
    pub glyph_friction: f32,
    pub glyph_air_friction: f32,
    pub glyph_restitution: f32,
    pub glyph_color: String,
    pub background_color: String,

    // ── Physics ───────────────────────────────────────────────────────────────
    pub gravity: f32,

    // ── Dragging ──────────────────────────────────────────────────────────────
    pub drag_stiffness: f32,
    pub drag_damping: f32,
    pub drag_reference_step: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            // Boundaries
            wall_thickness: WALL_THICKNESS,
            floor_width: FLOOR_WIDTH,
            wall_height_factor: WALL_HEIGHT_FACTOR,
            // Glyph sizing
            reference_svg_width: REFERENCE_SVG_WIDTH,
            svg_width_fraction: SVG_WIDTH_FRACTION,
            path_sample_length: PATH_SAMPLE_LENGTH,
            // Glyph placement
            drop_start_x: DROP_START_X,
            drop_spacing_x: DROP_SPACING_X,
            drop_height: DROP_HEIGHT,
            outline_id: OUTLINE_ID.to_string(),
            // Glyph material
            glyph_friction: GLYPH_FRICTION,
            glyph_air_friction: GLYPH_AIR_FRICTION,
            glyph_restitution: GLYPH_RESTITUTION,
            glyph_color: GLYPH_COLOR.to_string(),
            background_color: BACKGROUND_COLOR.to_string(),
            // Physics
            gravity: GRAVITY,
            // Dragging
            drag_stiffness: DRAG_STIFFNESS,
            drag_damping: DRAG_DAMPING,
            drag_reference_step: DRAG_REFERENCE_STEP,
        }
    }
}

impl SceneConfig {
    /// Parse a configuration from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Reject values that would produce degenerate geometry.
    pub fn validate(&self) -> SceneResult<()> {
        positive("wall_thickness", self.wall_thickness)?;
        positive("reference_svg_width", self.reference_svg_width)?;
        positive("svg_width_fraction", self.svg_width_fraction)?;
        positive("path_sample_length", self.path_sample_length)?;
        positive("drag_reference_step", self.drag_reference_step)?;
        if !(0.0..=1.0).contains(&self.drag_damping) {
            return Err(SceneError::UnsafeConstant {
                name: "drag_damping",
                value: self.drag_damping,
                safe_range: "[0.0, 1.0]",
            });
        }
        parse_color(&self.glyph_color)?;
        parse_color(&self.background_color)?;
        Ok(())
    }

    /// Per-second linear damping equivalent to the per-step air friction.
    pub fn glyph_linear_damping(&self) -> f32 {
        self.glyph_air_friction * STEPS_PER_SECOND
    }

    /// Fill colour of imported glyphs.
    pub fn glyph_fill(&self) -> SceneResult<Color> {
        parse_color(&self.glyph_color)
    }

    /// Window clear colour.
    pub fn background(&self) -> SceneResult<Color> {
        parse_color(&self.background_color)
    }
}

fn positive(name: &'static str, value: f32) -> SceneResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SceneError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Parse a `#RRGGBB` / `#RGB` style hex colour.
pub fn parse_color(value: &str) -> SceneResult<Color> {
    Srgba::hex(value)
        .map(Color::from)
        .map_err(|_| SceneError::InvalidColor {
            value: value.to_string(),
        })
}

/// Startup system: attempt to load `assets/scene.toml` and overwrite the
/// `SceneConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged but do not abort the scene.  A missing file is not an error.
pub fn load_scene_config(mut config: ResMut<SceneConfig>) {
    let path = SCENE_CONFIG_PATH;
    match std::fs::read_to_string(path) {
        Ok(contents) => match SceneConfig::from_toml_str(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    info!("Loaded scene config from {path}");
                }
                Err(e) => warn!("Rejected {path}: {e}; using defaults"),
            },
            Err(e) => warn!("Failed to parse {path}: {e}; using defaults"),
        },
        Err(_) => info!("No {path} found; using compiled defaults"),
    }
}
