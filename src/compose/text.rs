//! Text overlay rendering via resvg.
//!
//! The label is emitted as a one-element SVG document the size of the canvas
//! and rendered straight onto it. Fonts come from the system font database,
//! loaded once per process.

use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::fontdb::{self, Family, Query, Weight};
use resvg::usvg::{Options, Tree};

use crate::params::OverlaySettings;

/// Installed families tried, in order, when the generic `sans-serif` family
/// does not resolve to a face.
const SANS_FALLBACKS: &[&str] = &[
    "Helvetica",
    "Arial",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Roboto",
    "Ubuntu",
    "Cantarell",
    "FreeSans",
    "Segoe UI",
];

/// System fonts with `sans-serif` mapped to an installed face.
///
/// `None` when no usable face exists; overlays are then skipped.
pub(crate) fn font_database() -> Option<Arc<fontdb::Database>> {
    static FONTS: OnceLock<Option<Arc<fontdb::Database>>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            match resolve_sans_serif(&mut db) {
                Some(family) => {
                    log::debug!("text overlays use {family:?} ({} faces loaded)", db.len());
                    Some(Arc::new(db))
                }
                None => {
                    log::warn!(
                        "no usable system font among {} faces, text overlays are disabled",
                        db.len()
                    );
                    None
                }
            }
        })
        .clone()
}

/// Points the generic `sans-serif` family at an installed face.
///
/// Returns the resolved family name.
fn resolve_sans_serif(db: &mut fontdb::Database) -> Option<String> {
    if has_bold_face(db, Family::SansSerif) {
        return Some(db.family_name(&Family::SansSerif).to_string());
    }

    let installed = SANS_FALLBACKS
        .iter()
        .map(|name| name.to_string())
        .find(|name| has_bold_face(db, Family::Name(name.as_str())))
        .or_else(|| {
            db.faces()
                .filter(|face| !face.monospaced)
                .chain(db.faces())
                .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
        })?;

    db.set_sans_serif_family(installed.clone());
    has_bold_face(db, Family::SansSerif).then_some(installed)
}

fn has_bold_face(db: &fontdb::Database, family: Family<'_>) -> bool {
    let families = [family];
    let query = Query {
        families: &families,
        weight: Weight::BOLD,
        ..Query::default()
    };
    db.query(&query).is_some()
}

/// Draws the overlay label onto `canvas`.
///
/// Does nothing when the overlay resolves to no text or no font is installed.
/// The label is never clipped by the shape mask.
pub fn draw_overlay(canvas: &mut Pixmap, overlay: &OverlaySettings) {
    let Some(svg) = overlay_svg(canvas.width(), canvas.height(), overlay) else {
        return;
    };
    let Some(fonts) = font_database() else {
        return;
    };

    let mut opts = Options::default();
    opts.fontdb = fonts;

    match Tree::from_str(&svg, &opts) {
        Ok(tree) => resvg::render(&tree, Transform::identity(), &mut canvas.as_mut()),
        Err(err) => log::warn!("failed to build text overlay: {err}"),
    }
}

/// Builds the SVG markup for the overlay label on a `width` x `height` canvas.
///
/// The label is bold, horizontally centered, and its center sits at
/// `height * vertical_position` from the top. Rotation is applied around the
/// label's own center, counter-clockwise for positive angles.
pub fn overlay_svg(width: u32, height: u32, overlay: &OverlaySettings) -> Option<String> {
    let text = overlay.resolved_text()?;

    let cx = width as f32 / 2.0;
    let cy = height as f32 * overlay.vertical_position();
    // SVG's y axis points down, so a counter-clockwise turn is a negative angle.
    let angle = -overlay.rotation_degrees();
    let opacity = overlay.opacity() * overlay.color.a as f32 / 255.0;

    Some(format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{cx}" y="{cy}" font-family="sans-serif" font-weight="bold" font-size="{size}" "#,
            r#"fill="{fill}" fill-opacity="{opacity}" text-anchor="middle" dominant-baseline="central" "#,
            r#"transform="rotate({angle} {cx} {cy})">{text}</text></svg>"#,
        ),
        w = width,
        h = height,
        cx = cx,
        cy = cy,
        size = overlay.font_size(),
        fill = overlay.color.to_rgb_hex(),
        opacity = opacity,
        angle = angle,
        text = escape_xml(text),
    ))
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Color, OverlayKind};

    fn beta() -> OverlaySettings {
        OverlaySettings {
            kind: OverlayKind::Beta,
            ..OverlaySettings::default()
        }
    }

    #[test]
    fn sans_serif_resolves_to_an_installed_face() {
        // Hosts without any fonts disable overlays entirely.
        if let Some(db) = font_database() {
            assert!(has_bold_face(&db, Family::SansSerif));
        }
    }

    #[test]
    fn no_text_no_svg() {
        assert!(overlay_svg(100, 100, &OverlaySettings::default()).is_none());
        let empty_custom = OverlaySettings {
            kind: OverlayKind::Custom,
            ..OverlaySettings::default()
        };
        assert!(overlay_svg(100, 100, &empty_custom).is_none());
    }

    #[test]
    fn label_is_centered_and_rotated() {
        let svg = overlay_svg(200, 100, &beta()).unwrap();
        assert!(svg.contains(">BETA</text>"));
        assert!(svg.contains(r#"x="100" y="50""#));
        assert!(svg.contains(r#"rotate(45 100 50)"#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r#"font-size="18""#));
    }

    #[test]
    fn vertical_position_is_measured_from_top() {
        let overlay = OverlaySettings {
            vertical_position: 0.25,
            ..beta()
        };
        let svg = overlay_svg(100, 200, &overlay).unwrap();
        assert!(svg.contains(r#"y="50""#));
    }

    #[test]
    fn color_and_opacity() {
        let overlay = OverlaySettings {
            color: Color::rgba(0, 255, 0, 255),
            opacity: 0.5,
            ..beta()
        };
        let svg = overlay_svg(10, 10, &overlay).unwrap();
        assert!(svg.contains(r##"fill="#00ff00""##));
        assert!(svg.contains(r#"fill-opacity="0.5""#));
    }

    #[test]
    fn custom_text_is_escaped() {
        let overlay = OverlaySettings {
            kind: OverlayKind::Custom,
            custom_text: "R&D <1>".into(),
            ..OverlaySettings::default()
        };
        let svg = overlay_svg(10, 10, &overlay).unwrap();
        assert!(svg.contains("R&amp;D &lt;1&gt;"));
    }
}
