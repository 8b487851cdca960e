use crate::model::config::TemplateId;

/// Horizontal alignment of the content column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    /// Centered column.
    Center,
    /// Left-aligned column.
    Start,
}

/// Title size class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleTier {
    /// Body-scale headline.
    Regular,
    /// Large headline.
    Large,
    /// Poster-scale headline.
    Display,
}

impl TitleTier {
    /// Font size in canvas pixels before fitting.
    pub fn size_px(self) -> f64 {
        match self {
            TitleTier::Regular => 64.0,
            TitleTier::Large => 88.0,
            TitleTier::Display => 132.0,
        }
    }
}

/// Avatar shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarShape {
    /// Circular crop.
    Circle,
    /// Rounded square.
    Rounded,
    /// Hard square.
    Square,
}

/// Where the avatar goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarPlacement {
    /// No avatar.
    Hidden,
    /// In the flow above the kicker.
    Top,
    /// Small badge beside the footer.
    Footer,
}

/// Avatar slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarSlot {
    /// Shape.
    pub shape: AvatarShape,
    /// Placement.
    pub placement: AvatarPlacement,
    /// Edge length in canvas pixels.
    pub size: f64,
}

/// Date rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateStyle {
    /// `October 2nd, 2017` inside an outlined pill.
    LongPill,
    /// `October 2nd, 2017` as plain text.
    Long,
    /// `2017.10.02`.
    Numeric,
    /// `02 OCT 2017`.
    Document,
}

/// How derived stat blocks are arranged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatArrangement {
    /// Two-column grid of cards.
    Grid,
    /// Single row of cards.
    Row,
    /// Stacked `label  value` lines without cards.
    Minimal,
    /// No stats, even when enabled.
    Hidden,
}

/// Decorative frame around the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoration {
    /// Plain themed page.
    Plain,
    /// Heavy accent band behind the title.
    PosterBand,
    /// Full-bleed cover image (or tinted panel) under a dark scrim.
    CoverBackdrop,
    /// White instant-photo frame with the picture on top.
    PhotoFrame,
    /// Passport data page.
    Document,
}

/// Text above the title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KickerPolicy {
    /// "Milestone Unlocked" / "Total Existence".
    Headline,
    /// The milestone category.
    Category,
    /// Nothing.
    Hidden,
}

/// Layout parameters for one template; interpreted by [`crate::scene::build::build_scene`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateSpec {
    /// Which template this is.
    pub id: TemplateId,
    /// Column alignment.
    pub align: Align,
    /// Title size class.
    pub title_tier: TitleTier,
    /// Title lines before truncation (1..=4).
    pub max_title_lines: usize,
    /// Title weight.
    pub title_weight: u16,
    /// Uppercase the title.
    pub uppercase_title: bool,
    /// Avatar slot.
    pub avatar: AvatarSlot,
    /// Date rendering.
    pub date: DateStyle,
    /// Stat arrangement.
    pub stats: StatArrangement,
    /// Decoration.
    pub decoration: Decoration,
    /// Kicker text.
    pub kicker: KickerPolicy,
    /// Page margin in canvas pixels.
    pub margin: f64,
    /// Show the description paragraph.
    pub show_description: bool,
}

const CLASSIC: TemplateSpec = TemplateSpec {
    id: TemplateId::Classic,
    align: Align::Center,
    title_tier: TitleTier::Large,
    max_title_lines: 3,
    title_weight: 900,
    uppercase_title: false,
    avatar: AvatarSlot {
        shape: AvatarShape::Circle,
        placement: AvatarPlacement::Top,
        size: 160.0,
    },
    date: DateStyle::LongPill,
    stats: StatArrangement::Grid,
    decoration: Decoration::Plain,
    kicker: KickerPolicy::Headline,
    margin: 96.0,
    show_description: true,
};

const MODERN: TemplateSpec = TemplateSpec {
    id: TemplateId::Modern,
    align: Align::Start,
    title_tier: TitleTier::Large,
    max_title_lines: 4,
    title_weight: 800,
    uppercase_title: false,
    avatar: AvatarSlot {
        shape: AvatarShape::Rounded,
        placement: AvatarPlacement::Top,
        size: 128.0,
    },
    date: DateStyle::Numeric,
    stats: StatArrangement::Row,
    decoration: Decoration::Plain,
    kicker: KickerPolicy::Category,
    margin: 112.0,
    show_description: true,
};

const BOLD: TemplateSpec = TemplateSpec {
    id: TemplateId::Bold,
    align: Align::Center,
    title_tier: TitleTier::Display,
    max_title_lines: 3,
    title_weight: 900,
    uppercase_title: true,
    avatar: AvatarSlot {
        shape: AvatarShape::Square,
        placement: AvatarPlacement::Hidden,
        size: 0.0,
    },
    date: DateStyle::Long,
    stats: StatArrangement::Row,
    decoration: Decoration::PosterBand,
    kicker: KickerPolicy::Headline,
    margin: 72.0,
    show_description: false,
};

const MINIMAL: TemplateSpec = TemplateSpec {
    id: TemplateId::Minimal,
    align: Align::Center,
    title_tier: TitleTier::Regular,
    max_title_lines: 2,
    title_weight: 600,
    uppercase_title: false,
    avatar: AvatarSlot {
        shape: AvatarShape::Circle,
        placement: AvatarPlacement::Hidden,
        size: 0.0,
    },
    date: DateStyle::Long,
    stats: StatArrangement::Minimal,
    decoration: Decoration::Plain,
    kicker: KickerPolicy::Hidden,
    margin: 144.0,
    show_description: false,
};

const CINEMATIC: TemplateSpec = TemplateSpec {
    id: TemplateId::Cinematic,
    align: Align::Center,
    title_tier: TitleTier::Large,
    max_title_lines: 3,
    title_weight: 800,
    uppercase_title: true,
    avatar: AvatarSlot {
        shape: AvatarShape::Circle,
        placement: AvatarPlacement::Footer,
        size: 72.0,
    },
    date: DateStyle::Long,
    stats: StatArrangement::Row,
    decoration: Decoration::CoverBackdrop,
    kicker: KickerPolicy::Headline,
    margin: 96.0,
    show_description: true,
};

const POLAROID: TemplateSpec = TemplateSpec {
    id: TemplateId::Polaroid,
    align: Align::Center,
    title_tier: TitleTier::Regular,
    max_title_lines: 2,
    title_weight: 700,
    uppercase_title: false,
    avatar: AvatarSlot {
        shape: AvatarShape::Square,
        placement: AvatarPlacement::Hidden,
        size: 0.0,
    },
    date: DateStyle::Numeric,
    stats: StatArrangement::Minimal,
    decoration: Decoration::PhotoFrame,
    kicker: KickerPolicy::Hidden,
    margin: 96.0,
    show_description: false,
};

const PASSPORT: TemplateSpec = TemplateSpec {
    id: TemplateId::Passport,
    align: Align::Start,
    title_tier: TitleTier::Regular,
    max_title_lines: 2,
    title_weight: 700,
    uppercase_title: true,
    avatar: AvatarSlot {
        shape: AvatarShape::Square,
        placement: AvatarPlacement::Hidden,
        size: 0.0,
    },
    date: DateStyle::Document,
    stats: StatArrangement::Minimal,
    decoration: Decoration::Document,
    kicker: KickerPolicy::Category,
    margin: 80.0,
    show_description: false,
};

/// Look up the layout record for a template.
pub fn spec_for(id: TemplateId) -> &'static TemplateSpec {
    match id {
        TemplateId::Classic => &CLASSIC,
        TemplateId::Modern => &MODERN,
        TemplateId::Bold => &BOLD,
        TemplateId::Minimal => &MINIMAL,
        TemplateId::Cinematic => &CINEMATIC,
        TemplateId::Polaroid => &POLAROID,
        TemplateId::Passport => &PASSPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_has_a_record() {
        for id in TemplateId::ALL {
            let spec = spec_for(*id);
            assert_eq!(spec.id, *id);
            assert!((1..=4).contains(&spec.max_title_lines));
            assert!(spec.margin > 0.0);
        }
    }
}
