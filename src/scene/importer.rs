use super::*;
use crate::decomposition::ConvexDecomposer;
use crate::error::{SceneError, SceneResult};
use crate::glyphs::GlyphDefinition;
use crate::outline::{scale_factor, Outline};

/// A glyph ready to spawn: geometry plus its collider.
#[derive(Debug, Clone)]
pub struct GlyphShape {
    /// Scaled outline in container space.
    pub outline: Outline,
    /// Outline rings relative to the centroid, y up.
    pub local: Vec<Vec<Vec2>>,
    /// Convex pieces of `local`.
    pub pieces: Vec<Vec<Vec2>>,
    pub collider: Collider,
}

/// Sample, scale and decompose one glyph definition.
pub fn build_glyph(
    glyph: &GlyphDefinition,
    scale: f32,
    sample_length: f32,
    decomposer: &dyn ConvexDecomposer,
) -> SceneResult<GlyphShape> {
    let outline = Outline::from_svg_path(&glyph.id, &glyph.path, sample_length)?;
    let centre = outline.centre();
    let outline = outline.scaled(scale, centre);
    let local = outline.to_local(centre);

    let pieces = decomposer.decompose(&local);
    let parts: Vec<(Vec2, f32, Collider)> = pieces
        .iter()
        .filter_map(|piece| Collider::convex_hull(piece))
        .map(|collider| (Vec2::ZERO, 0.0, collider))
        .collect();
    if parts.is_empty() {
        return Err(SceneError::Decomposition {
            id: glyph.id.clone(),
            reason: format!(
                "{} produced no usable piece from {} points",
                decomposer.name(),
                outline.len()
            ),
        });
    }

    Ok(GlyphShape {
        outline,
        local,
        pieces,
        collider: Collider::compound(parts),
    })
}

/// Container-space drop point of the `index`-th glyph.
pub fn drop_point(index: usize, config: &SceneConfig) -> Vec2 {
    Vec2::new(
        config.drop_start_x + index as f32 * config.drop_spacing_x,
        config.drop_height,
    )
}

/// Mount: turn every matching outline into a dynamic glyph body.
///
/// Glyphs are scaled to the container width.  A malformed outline is logged
/// and skipped; its index stays reserved so the others keep their spots.
pub fn import_glyphs(
    mut commands: Commands,
    container: Option<Res<Container>>,
    config: Res<SceneConfig>,
    library: Res<GlyphLibrary>,
    decomposer: Res<ShapeDecomposer>,
) {
    let Some(container) = container else {
        return;
    };

    let scale = scale_factor(
        container.width,
        config.svg_width_fraction,
        config.reference_svg_width,
    );

    let mut imported = 0;
    for (index, glyph) in library.matching(&config.outline_id).enumerate() {
        let shape = match build_glyph(
            glyph,
            scale,
            config.path_sample_length,
            decomposer.0.as_ref(),
        ) {
            Ok(shape) => shape,
            Err(e) => {
                warn!("[scene] Skipping glyph {index}: {e}");
                continue;
            }
        };
        debug!(
            "[scene] Glyph {index}: {} points in {} rings, {} convex pieces",
            shape.outline.len(),
            shape.local.len(),
            shape.pieces.len()
        );
        spawn_glyph(&mut commands, index, scale, shape, &config);
        imported += 1;
    }

    info!(
        "[scene] Imported {imported} glyphs at scale {scale:.3} ({})",
        decomposer.0.name()
    );
}

fn spawn_glyph(
    commands: &mut Commands,
    index: usize,
    scale: f32,
    shape: GlyphShape,
    config: &SceneConfig,
) {
    let position = container_to_world(drop_point(index, config));
    commands.spawn((
        (
            SceneBody,
            Glyph { index, scale },
            GlyphOutline(shape.local),
            GlyphPieces(shape.pieces),
            Transform::from_translation(position.extend(0.1)),
            GlobalTransform::default(),
            RigidBody::Dynamic,
        ),
        (
            shape.collider,
            // Friction takes the smaller coefficient, restitution the larger.
            Friction {
                coefficient: config.glyph_friction,
                combine_rule: CoefficientCombineRule::Min,
            },
            Restitution {
                coefficient: config.glyph_restitution,
                combine_rule: CoefficientCombineRule::Max,
            },
            Damping {
                linear_damping: config.glyph_linear_damping(),
                angular_damping: 0.0,
            },
            Velocity::zero(),
            Sleeping::disabled(),
        ),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
    use crate::decomposition::{EarcutDecomposer, HullDecomposer};

    fn square(id: &str) -> GlyphDefinition {
        GlyphDefinition::new(id, "M0 0 L100 0 L100 50 L0 50 Z")
    }

    #[test]
    fn glyph_is_centred_and_scaled() {
        let shape = build_glyph(&square("sq"), 2.0, 4.0, &EarcutDecomposer).unwrap();
        let max_x = shape.local.iter().flatten().map(|p| p.x).fold(f32::MIN, f32::max);
        let max_y = shape.local.iter().flatten().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!((max_x - 100.0).abs() < 1e-3, "half width should double to 100");
        assert!((max_y - 50.0).abs() < 1e-3, "half height should double to 50");
        // Scaled about the centroid, so the container-space centre is unchanged.
        assert!((shape.outline.centre() - Vec2::new(50.0, 25.0)).length() < 1e-3);
    }

    #[test]
    fn non_convex_glyph_becomes_several_pieces() {
        let l = GlyphDefinition::new("l", "M0 0 L20 0 L20 10 L10 10 L10 20 L0 20 Z");
        let shape = build_glyph(&l, 1.0, 4.0, &EarcutDecomposer).unwrap();
        assert_eq!(shape.pieces.len(), 2);
        let hull = build_glyph(&l, 1.0, 4.0, &HullDecomposer).unwrap();
        assert_eq!(hull.pieces.len(), 1);
    }

    #[test]
    fn malformed_glyph_is_an_error() {
        let bad = GlyphDefinition::new("bad", "M0 0 Q");
        assert!(build_glyph(&bad, 1.0, 4.0, &EarcutDecomposer).is_err());
    }

    #[test]
    fn decomposer_without_pieces_is_an_error() {
        struct Nothing;
        impl ConvexDecomposer for Nothing {
            fn decompose(&self, _: &[Vec<Vec2>]) -> Vec<Vec<Vec2>> {
                Vec::new()
            }
            fn name(&self) -> &'static str {
                "nothing"
            }
        }
        let err = build_glyph(&square("sq"), 1.0, 4.0, &Nothing).unwrap_err();
        assert!(matches!(err, SceneError::Decomposition { ref id, .. } if id == "sq"));
    }

    #[test]
    fn drop_points_are_staggered_horizontally() {
        let cfg = SceneConfig::default();
        assert_eq!(drop_point(0, &cfg), Vec2::new(100.0, 800.0));
        assert_eq!(drop_point(1, &cfg), Vec2::new(250.0, 800.0));
        assert_eq!(drop_point(9, &cfg), Vec2::new(1450.0, 800.0));
    }

    #[test]
    fn every_glyph_starts_inside_the_default_window() {
        let cfg = SceneConfig::default();
        let size = Vec2::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32);
        let scale = scale_factor(size.x, cfg.svg_width_fraction, cfg.reference_svg_width);
        let library = GlyphLibrary::builtin();
        for (index, glyph) in library.matching(&cfg.outline_id).enumerate() {
            let shape =
                build_glyph(glyph, scale, cfg.path_sample_length, &EarcutDecomposer).unwrap();
            let at = drop_point(index, &cfg);
            for p in shape.local.iter().flatten() {
                // Local rings are y-up; container space is y-down.
                let q = at + Vec2::new(p.x, -p.y);
                assert!(
                    q.x > 0.0 && q.x < size.x && q.y > 0.0 && q.y < size.y,
                    "glyph {index} reaches {q} outside {size}"
                );
            }
        }
    }
}
