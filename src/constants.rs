//! Centralised scene constants.
//!
//! All tuneable values live here so they can be found and modified in one
//! place.  [`crate::config::SceneConfig`] mirrors every value and may override
//! them at startup from `assets/scene.toml`.

// ── Window ────────────────────────────────────────────────────────────────────

/// Initial window width (logical px).  Every drop point lies inside it.
pub const WINDOW_WIDTH: u32 = 1600;

/// Initial window height (logical px); taller than [`DROP_HEIGHT`] plus the
/// largest scaled glyph.
pub const WINDOW_HEIGHT: u32 = 1000;

// ── Boundaries ────────────────────────────────────────────────────────────────

/// Thickness (px) of the floor and both side walls.
///
/// Walls sit entirely outside the container: their inner face is flush with
/// the container edge, so half the thickness is the centre offset.
pub const WALL_THICKNESS: f32 = 60.0;

/// Floor width (px).  Wide enough that no realistic window is wider.
pub const FLOOR_WIDTH: f32 = 27_184.0;

/// Side wall height as a multiple of the container height.
///
/// Tall walls keep glyphs dragged above the container from escaping sideways.
pub const WALL_HEIGHT_FACTOR: f32 = 5.0;

// ── Glyph sizing ──────────────────────────────────────────────────────────────

/// Width (px) the glyph artwork was drawn for.
pub const REFERENCE_SVG_WIDTH: f32 = 300.0;

/// Fraction of the container width that [`REFERENCE_SVG_WIDTH`] maps onto.
///
/// Scale factor = `container_width × SVG_WIDTH_FRACTION / REFERENCE_SVG_WIDTH`.
pub const SVG_WIDTH_FRACTION: f32 = 0.3;

/// Arc length (px) between samples taken along curved path segments.
///
/// Smaller values give smoother outlines and more convex pieces.
pub const PATH_SAMPLE_LENGTH: f32 = 4.0;

// ── Glyph placement ───────────────────────────────────────────────────────────

/// Container-space x of the first glyph's drop point.
pub const DROP_START_X: f32 = 100.0;

/// Horizontal spacing (px) between consecutive glyph drop points.
pub const DROP_SPACING_X: f32 = 150.0;

/// Container-space y (measured down from the top edge) of every drop point.
pub const DROP_HEIGHT: f32 = 800.0;

/// Element identifier an outline must carry to be imported.
pub const OUTLINE_ID: &str = "matter-path";

// ── Glyph material ────────────────────────────────────────────────────────────

/// Contact friction of imported glyphs.  Near zero so glyphs slide freely.
pub const GLYPH_FRICTION: f32 = 0.00001;

/// Per-step air friction of imported glyphs.
///
/// Converted to a per-second linear damping with [`STEPS_PER_SECOND`].
pub const GLYPH_AIR_FRICTION: f32 = 0.00001;

/// Restitution of imported glyphs.  0.0 = no bounce; 1.0 = fully elastic.
pub const GLYPH_RESTITUTION: f32 = 0.2;

/// Fill colour of imported glyphs.
pub const GLYPH_COLOR: &str = "#2A3E98";

/// Window clear colour behind the scene.
pub const BACKGROUND_COLOR: &str = "#FFFFFF";

// ── Physics ───────────────────────────────────────────────────────────────────

/// Downward gravity (px/s²).
pub const GRAVITY: f32 = 980.0;

/// Nominal physics steps per second, used to convert per-step coefficients.
pub const STEPS_PER_SECOND: f32 = 60.0;

// ── Dragging ──────────────────────────────────────────────────────────────────

/// Fraction of the anchor-to-pointer error the drag constraint closes per
/// reference step.
pub const DRAG_STIFFNESS: f32 = 0.1;

/// How fully the drag constraint replaces the body's own velocity (0.0–1.0).
pub const DRAG_DAMPING: f32 = 1.0;

/// Step length (s) the drag stiffness is expressed against.
pub const DRAG_REFERENCE_STEP: f32 = 1.0 / STEPS_PER_SECOND;
