use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;
use usvg::fontdb::Database;

/// Preferred faces for the generic `sans-serif` family, most wanted first.
const SANS_SERIF_CANDIDATES: [&str; 6] = [
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Inter",
];

static SYSTEM_FONTS: Lazy<Arc<Database>> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    pick_sans_serif(&mut db);
    tracing::debug!(faces = db.len(), "loaded system fonts");
    Arc::new(db)
});

/// The system font database, plus any fonts found in `extra_dir`.
pub fn font_database(extra_dir: Option<&Path>) -> Arc<Database> {
    let Some(dir) = extra_dir.filter(|dir| dir.is_dir()) else {
        return SYSTEM_FONTS.clone();
    };
    let mut db = (**SYSTEM_FONTS).clone();
    let before = db.len();
    db.load_fonts_dir(dir);
    if db.len() == before {
        return SYSTEM_FONTS.clone();
    }
    tracing::debug!(dir = %dir.display(), added = db.len() - before, "loaded bundled fonts");
    pick_sans_serif(&mut db);
    Arc::new(db)
}

fn pick_sans_serif(db: &mut Database) {
    let has_family = |db: &Database, name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    if let Some(name) = SANS_SERIF_CANDIDATES
        .iter()
        .find(|name| has_family(db, name))
    {
        db.set_sans_serif_family(*name);
        return;
    }
    let first = db
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(family, _)| family.clone()));
    if let Some(family) = first {
        db.set_sans_serif_family(family);
    }
}
