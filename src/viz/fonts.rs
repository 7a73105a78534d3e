//! One-time registration of a "sans-serif" face for the `ab_glyph` text path.
//!
//! `ab_glyph` doesn't discover OS fonts, so the system font database is queried
//! once per process and the chosen regular/bold faces are handed to plotters.

use anyhow::{Result, anyhow};
use fontdb::{Database, Family, Query, Style, Weight};
use log::{debug, info};
use plotters::style::FontStyle;
use std::sync::OnceLock;

/// Tried in order before falling back to any proportional face.
const PREFERRED_FAMILIES: [&str; 6] = [
    "Arial",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "FreeSans",
];

static REGISTERED: OnceLock<Result<String, String>> = OnceLock::new();

/// Register the fonts used by the renderer. Cheap after the first call.
///
/// Fails when the host has no usable font at all.
pub fn ensure_registered() -> Result<()> {
    REGISTERED
        .get_or_init(register_system_sans)
        .as_ref()
        .map(|_| ())
        .map_err(|e| anyhow!("font setup failed: {e}"))
}

fn register_system_sans() -> Result<String, String> {
    let mut db = Database::new();
    db.load_system_fonts();
    debug!("font database holds {} faces", db.len());

    let (family, regular) = find_face(&db, Weight::NORMAL)
        .ok_or_else(|| "no sans-serif font found on this system".to_string())?;
    let bold = find_face(&db, Weight::BOLD)
        .filter(|(f, _)| *f == family)
        .map(|(_, bytes)| bytes)
        .unwrap_or(regular);

    plotters::style::register_font("sans-serif", FontStyle::Normal, regular)
        .map_err(|_| format!("{family}: invalid font"))?;
    plotters::style::register_font("sans-serif", FontStyle::Bold, bold)
        .map_err(|_| format!("{family} (bold): invalid font"))?;

    info!("Using font family {family}");
    Ok(family)
}

/// Locate a face and leak its bytes; plotters keeps registered fonts for the
/// life of the process.
fn find_face(db: &Database, weight: Weight) -> Option<(String, &'static [u8])> {
    for name in PREFERRED_FAMILIES {
        let query = Query {
            families: &[Family::Name(name)],
            weight,
            style: Style::Normal,
            ..Query::default()
        };
        if let Some(id) = db.query(&query)
            && let Some(bytes) = load_bytes(db, id)
        {
            return Some((name.to_string(), bytes));
        }
    }

    // Any proportional face beats no text at all.
    db.faces()
        .filter(|f| !f.monospaced && f.style == Style::Normal && f.weight == weight)
        .find_map(|f| {
            let family = f.families.first().map(|(n, _)| n.clone())?;
            load_bytes(db, f.id).map(|bytes| (family, bytes))
        })
}

fn load_bytes(db: &Database, id: fontdb::ID) -> Option<&'static [u8]> {
    // ab_glyph reads the first face of a collection only.
    let data = db
        .with_face_data(id, |data, index| (index == 0).then(|| data.to_vec()))
        .flatten()?;
    Some(Box::leak(data.into_boxed_slice()))
}
