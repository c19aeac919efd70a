//! Glyphfall library
//!
//! SVG glyph outlines dropped as rigid bodies into a walled container, with
//! mouse dragging and a mount/unmount lifecycle.  Built on Bevy and Rapier2D.

pub mod config;
pub mod constants;
pub mod decomposition;
pub mod error;
pub mod glyphs;
pub mod interaction;
pub mod outline;
pub mod rendering;
pub mod scene;
