use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::scene::model::FontFamily;

/// Raw bytes of one font face.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Database id, stable for the lifetime of the book.
    pub id: fontdb::ID,
    /// Whole font file.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection.
    pub index: u32,
}

/// Font discovery shared by the SVG rasterizer and the frame painter.
///
/// System fonts are loaded once; an optional extra file is preferred for sans text.
#[derive(Clone, Debug)]
pub struct FontBook {
    db: Arc<fontdb::Database>,
    preferred: Option<String>,
}

impl FontBook {
    /// System fonts plus `extra` when given.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn load(extra: Option<&Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let mut preferred = None;
        if let Some(path) = extra {
            let before = db.len();
            match db.load_font_file(path) {
                Ok(()) => {
                    preferred = db
                        .faces()
                        .nth(before)
                        .and_then(|f| f.families.first())
                        .map(|(name, _)| name.clone());
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "font file not loaded"),
            }
        }
        tracing::debug!(faces = db.len(), preferred = ?preferred, "font discovery finished");
        Self {
            db: Arc::new(db),
            preferred,
        }
    }

    /// A book with no faces; text is skipped by raster backends.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
            preferred: None,
        }
    }

    /// Number of discovered faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// CSS font-family list for `family`, preferred face first.
    pub fn css_stack(&self, family: FontFamily) -> String {
        let generic = match family {
            FontFamily::Sans => "Inter, 'Helvetica Neue', Arial, sans-serif",
            FontFamily::Serif => "Georgia, 'Times New Roman', serif",
            FontFamily::Mono => "'JetBrains Mono', Menlo, monospace",
        };
        match (&self.preferred, family) {
            (Some(p), FontFamily::Sans) => format!("'{p}', {generic}"),
            _ => generic.to_string(),
        }
    }

    /// Best face for a family class and weight, falling back to any face.
    pub fn resolve(&self, family: FontFamily, weight: u16) -> Option<FontFace> {
        let mut families = Vec::<fontdb::Family<'_>>::new();
        if let (Some(p), FontFamily::Sans) = (&self.preferred, family) {
            families.push(fontdb::Family::Name(p));
        }
        families.push(match family {
            FontFamily::Sans => fontdb::Family::SansSerif,
            FontFamily::Serif => fontdb::Family::Serif,
            FontFamily::Mono => fontdb::Family::Monospace,
        });
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(weight),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))?;
        self.db
            .with_face_data(id, |data, index| FontFace {
                id,
                bytes: Arc::new(data.to_vec()),
                index,
            })
    }

    /// `usvg` options resolving fonts from this book.
    pub fn usvg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.db.clone(),
            font_resolver: svg_font_resolver(),
            ..Default::default()
        }
    }
}

fn svg_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, db| {
            let mut families = Vec::<fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => fontdb::Family::Name(s),
                });
            }
            families.push(fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => fontdb::Style::Normal,
                usvg::FontStyle::Italic => fontdb::Style::Italic,
                usvg::FontStyle::Oblique => fontdb::Style::Oblique,
            };
            let query = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(font.weight()),
                stretch: fontdb::Stretch::Normal,
                style,
            };
            db.query(&query).or_else(|| db.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}
