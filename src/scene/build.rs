use chrono::{NaiveDate, NaiveDateTime};

use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::ExportResult;
use crate::model::config::{AspectRatio, ExportConfig, TemplateId};
use crate::model::payload::{Payload, Profile, StatPayload, StatUnit};
use crate::scene::model::{
    Background, ClipShape, Fill, FontFamily, ImageRef, SceneDescription, SceneNode, Stroke,
    TextAlign, TextNode,
};
use crate::scene::templates::{
    Align, AvatarPlacement, AvatarShape, DateStyle, Decoration, KickerPolicy, StatArrangement,
    TemplateSpec, spec_for,
};
use crate::scene::text::{
    document_date, estimate_width, figure, long_date, numeric_date, relative_caption,
    relative_days, thousands, wrap_text,
};
use crate::stats::cosmic::compute_cosmic;
use crate::theme::tokens::{ColorTokens, Rgb, luminance};

const WHITE: Rgb = Rgb::new(255, 255, 255);
const BLACK: Rgb = Rgb::new(0, 0, 0);
const INK: Rgb = Rgb::new(15, 23, 42);
const SLATE: Rgb = Rgb::new(100, 116, 139);

const MIN_SCALE: f64 = 0.55;
const FOOTER_RESERVE: f64 = 48.0;

/// Toggles that select optional blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneFlags {
    /// Derived stat blocks.
    pub show_stats: bool,
    /// Clock-hand cycles and orbit decoration.
    pub cosmic_overlay: bool,
}

impl From<&ExportConfig> for SceneFlags {
    fn from(cfg: &ExportConfig) -> Self {
        Self {
            show_stats: cfg.show_stats,
            cosmic_overlay: cfg.cosmic_overlay,
        }
    }
}

/// Profile facts a scene needs; images are referenced, never embedded.
#[derive(Clone, Debug, PartialEq)]
pub struct Subject {
    /// Display name.
    pub name: String,
    /// Placeholder initials.
    pub initials: String,
    /// Birth instant.
    pub birth: NaiveDateTime,
    /// An avatar image is available.
    pub has_avatar: bool,
    /// A cover image is available.
    pub has_cover: bool,
}

impl Subject {
    /// Extract scene inputs from a profile.
    pub fn from_profile(p: &Profile) -> ExportResult<Self> {
        Ok(Self {
            name: p.name.trim().to_string(),
            initials: p.initials(),
            birth: p.birth_instant()?,
            has_avatar: p.avatar.as_ref().is_some_and(|b| !b.is_empty()),
            has_cover: p.cover.as_ref().is_some_and(|b| !b.is_empty()),
        })
    }
}

#[derive(Clone, Debug)]
struct StatCell {
    label: String,
    value: String,
}

#[derive(Clone, Debug)]
struct Content {
    kicker: Option<String>,
    title: String,
    title_is_figure: bool,
    subtitle: Option<String>,
    description: Option<String>,
    date: Option<NaiveDate>,
    badge: Option<String>,
    event_line: Option<String>,
    cells: Vec<StatCell>,
    footer: String,
}

impl Content {
    fn new(
        payload: &Payload,
        subject: &Subject,
        spec: &TemplateSpec,
        flags: SceneFlags,
        now: NaiveDateTime,
    ) -> Self {
        let cell = |label: &str, value: String| StatCell {
            label: label.to_string(),
            value,
        };
        match payload {
            Payload::Milestone(m) => {
                let kicker = match spec.kicker {
                    KickerPolicy::Headline => Some("MILESTONE UNLOCKED".to_string()),
                    KickerPolicy::Category if !m.category.trim().is_empty() => {
                        Some(m.category.trim().to_uppercase())
                    }
                    KickerPolicy::Category => Some("MILESTONE".to_string()),
                    KickerPolicy::Hidden => None,
                };
                let mut cells = Vec::new();
                if flags.show_stats {
                    let c = compute_cosmic(subject.birth, m.date);
                    cells.push(cell("Earth Rotations", thousands(c.day_count)));
                    cells.push(cell("Sun Orbits", c.solar_years.clone()));
                    if flags.cosmic_overlay {
                        cells.push(cell("Hour-Hand Laps", thousands(c.hour_hand_cycles)));
                        cells.push(cell("Minute-Hand Laps", thousands(c.minute_hand_cycles)));
                        cells.push(cell("Second-Hand Laps", thousands(c.second_hand_cycles)));
                    }
                }
                let title = if m.title.trim().is_empty() {
                    "Untitled milestone".to_string()
                } else {
                    m.title.trim().to_string()
                };
                Content {
                    kicker,
                    title,
                    title_is_figure: false,
                    subtitle: Some(relative_caption(relative_days(m.date, now))),
                    description: Some(m.description.trim().to_string()).filter(|d| !d.is_empty()),
                    date: Some(m.date.date()),
                    badge: m.value.map(|v| match m.unit.as_deref().map(str::trim) {
                        Some(u) if !u.is_empty() => format!("{} {u}", figure(v)),
                        _ => figure(v),
                    }),
                    event_line: m
                        .event_name
                        .as_deref()
                        .map(str::trim)
                        .filter(|e| !e.is_empty())
                        .map(|e| format!("Since {e}")),
                    cells,
                    footer: subject.name.clone(),
                }
            }
            Payload::Stats(s) => {
                let kicker = match spec.kicker {
                    KickerPolicy::Headline => Some("TOTAL EXISTENCE".to_string()),
                    KickerPolicy::Category => Some("LIFE STATS".to_string()),
                    KickerPolicy::Hidden => None,
                };
                let units: &[(StatUnit, &str)] = match spec.stats {
                    StatArrangement::Grid => &[
                        (StatUnit::Months, "Months Lived"),
                        (StatUnit::Weeks, "Weeks Lived"),
                        (StatUnit::Days, "Days Lived"),
                        (StatUnit::Hours, "Hours Lived"),
                        (StatUnit::Minutes, "Minutes Lived"),
                        (StatUnit::Seconds, "Seconds Lived"),
                    ],
                    _ => &[
                        (StatUnit::Days, "Days Lived"),
                        (StatUnit::Seconds, "Seconds Lived"),
                    ],
                };
                let mut cells = Vec::new();
                if flags.show_stats {
                    cells.extend(units.iter().map(|(u, l)| cell(l, thousands(s.get(*u)))));
                    if flags.cosmic_overlay {
                        let c = compute_cosmic(subject.birth, now);
                        cells.push(cell("Earth Rotations", thousands(c.day_count)));
                        cells.push(cell("Sun Orbits", c.solar_years.clone()));
                    }
                }
                Content {
                    kicker,
                    title: thousands(s.get(StatUnit::Years)),
                    title_is_figure: true,
                    subtitle: Some("YEARS ON EARTH".to_string()),
                    description: None,
                    date: None,
                    badge: None,
                    event_line: None,
                    cells,
                    footer: if subject.name.is_empty() {
                        "Life Timeline".to_string()
                    } else {
                        format!("Life Timeline of {}", subject.name)
                    },
                }
            }
        }
    }

    fn field_title(&self) -> String {
        match (&self.subtitle, self.title_is_figure) {
            (Some(sub), true) => format!("{} {}", self.title, sub),
            _ => self.title.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Palette {
    page: Background,
    text: Fill,
    muted: Fill,
    accent: Fill,
    surface: Fill,
    border: Fill,
    tint: Fill,
}

impl Palette {
    fn new(t: &ColorTokens, decoration: Decoration) -> Self {
        match decoration {
            Decoration::Plain | Decoration::Document => Palette {
                page: Background::Solid(t.base),
                text: Fill::solid(t.text),
                muted: Fill::solid(t.muted),
                accent: Fill::solid(t.primary),
                surface: Fill::solid(t.card),
                border: Fill::solid(t.border),
                tint: Fill::solid(t.input),
            },
            Decoration::PosterBand => {
                let ink = if luminance(t.primary) > 0.55 {
                    t.text
                } else {
                    WHITE
                };
                Palette {
                    page: Background::Diagonal {
                        from: t.primary,
                        to: t.primary.mix(t.base, 0.3),
                    },
                    text: Fill::solid(ink),
                    muted: Fill::with_alpha(ink, 0.75),
                    accent: Fill::solid(ink),
                    surface: Fill::with_alpha(ink, 0.12),
                    border: Fill::with_alpha(ink, 0.3),
                    tint: Fill::with_alpha(ink, 0.2),
                }
            }
            Decoration::CoverBackdrop => Palette {
                page: Background::Solid(Rgb::new(10, 10, 18)),
                text: Fill::solid(WHITE),
                muted: Fill::with_alpha(WHITE, 0.75),
                accent: Fill::solid(t.primary.mix(WHITE, 0.2)),
                surface: Fill::with_alpha(WHITE, 0.08),
                border: Fill::with_alpha(WHITE, 0.2),
                tint: Fill::with_alpha(t.primary, 0.35),
            },
            Decoration::PhotoFrame => Palette {
                page: Background::Solid(t.base),
                text: Fill::solid(INK),
                muted: Fill::solid(SLATE),
                accent: Fill::solid(t.primary),
                surface: Fill::solid(t.input),
                border: Fill::solid(t.border),
                tint: Fill::solid(t.input),
            },
        }
    }
}

struct Block {
    height: f64,
    nodes: Vec<SceneNode>,
}

fn text(lines: Vec<String>, x: f64, y: f64, size: f64, weight: u16, align: TextAlign, fill: Fill) -> TextNode {
    TextNode {
        lines,
        x,
        y,
        size,
        line_height: size * 1.2,
        weight,
        family: FontFamily::Sans,
        letter_spacing: 0.0,
        align,
        fill,
    }
}

fn clip_for(shape: AvatarShape, size: f64) -> ClipShape {
    match shape {
        AvatarShape::Circle => ClipShape::Circle,
        AvatarShape::Rounded => ClipShape::Rounded(size * 0.22),
        AvatarShape::Square => ClipShape::Rounded(0.0),
    }
}

fn rect_node(rect: Rect, radius: f64, fill: Option<Fill>, stroke: Option<Stroke>) -> SceneNode {
    SceneNode::Rect {
        rect,
        radius,
        fill,
        stroke,
    }
}

struct Builder<'a> {
    canvas: Canvas,
    spec: &'a TemplateSpec,
    palette: Palette,
    content: Content,
    subject: &'a Subject,
}

impl Builder<'_> {
    fn w(&self) -> f64 {
        f64::from(self.canvas.width)
    }

    fn h(&self) -> f64 {
        f64::from(self.canvas.height)
    }

    fn col(&self) -> (f64, f64) {
        let m = self.spec.margin;
        (m, self.w() - m)
    }

    fn anchor(&self) -> (f64, TextAlign) {
        let (x0, _) = self.col();
        match self.spec.align {
            Align::Center => (self.w() / 2.0, TextAlign::Center),
            Align::Start => (x0, TextAlign::Start),
        }
    }

    fn portrait(&self, rect: Rect, clip: ClipShape, prefer_cover: bool) -> SceneNode {
        let source = if prefer_cover && self.subject.has_cover {
            Some(ImageRef::Cover)
        } else if self.subject.has_avatar {
            Some(ImageRef::Avatar)
        } else {
            None
        };
        match source {
            Some(source) => SceneNode::Image {
                rect,
                source,
                clip,
                opacity: 1.0,
            },
            None => SceneNode::Placeholder {
                rect,
                clip,
                fill: self.palette.tint,
                label: self.subject.initials.clone(),
                label_fill: self.palette.accent,
            },
        }
    }

    fn date_text(&self, d: NaiveDate) -> String {
        match self.spec.date {
            DateStyle::LongPill | DateStyle::Long => long_date(d),
            DateStyle::Numeric => numeric_date(d),
            DateStyle::Document => document_date(d),
        }
    }

    // --- flow blocks -----------------------------------------------------------------------

    fn avatar_block(&self, s: f64) -> Option<Block> {
        if self.spec.avatar.placement != AvatarPlacement::Top {
            return None;
        }
        let size = self.spec.avatar.size * s;
        let (x0, _) = self.col();
        let left = match self.spec.align {
            Align::Center => self.w() / 2.0 - size / 2.0,
            Align::Start => x0,
        };
        let rect = Rect::new(left, 0.0, left + size, size);
        Some(Block {
            height: size,
            nodes: vec![self.portrait(rect, clip_for(self.spec.avatar.shape, size), false)],
        })
    }

    fn kicker_block(&self, s: f64) -> Option<Block> {
        let kicker = self.content.kicker.clone()?;
        let (ax, align) = self.anchor();
        let size = 28.0 * s;
        let spacing = 6.0 * s;
        let mut t = text(vec![kicker.clone()], ax, size, size, 700, align, self.palette.muted);
        t.letter_spacing = spacing;
        let mut nodes = vec![SceneNode::Text(t)];
        let mut height = size * 1.25;

        let underline = self.spec.align == Align::Center
            && self.spec.kicker == KickerPolicy::Headline
            && self.spec.decoration == Decoration::Plain;
        if underline {
            let tw = estimate_width(&kicker, size, 700, spacing);
            let y = height + 10.0 * s;
            nodes.push(rect_node(
                Rect::new(ax - tw / 2.0, y, ax + tw / 2.0, y + 3.0 * s),
                0.0,
                Some(self.palette.muted),
                None,
            ));
            height = y + 3.0 * s;
        }
        Some(Block { height, nodes })
    }

    fn title_block(&self, s: f64) -> Block {
        let (x0, x1) = self.col();
        let (ax, align) = self.anchor();
        let mut size = self.spec.title_tier.size_px() * s;
        if self.content.title_is_figure {
            size = (size * 1.6).min(220.0 * s);
        }
        let title = if self.spec.uppercase_title {
            self.content.title.to_uppercase()
        } else {
            self.content.title.clone()
        };
        let weight = self.spec.title_weight;
        let lines = wrap_text(&title, x1 - x0, size, weight, 0.0, self.spec.max_title_lines);
        let n = lines.len().max(1) as f64;
        let mut t = text(lines, ax, size * 0.9, size, weight, align, self.palette.text);
        t.line_height = size * 1.08;
        Block {
            height: t.line_height * (n - 1.0) + size * 1.1,
            nodes: vec![SceneNode::Text(t)],
        }
    }

    fn subtitle_block(&self, s: f64) -> Option<Block> {
        let sub = self.content.subtitle.clone()?;
        let (ax, align) = self.anchor();
        let size = if self.content.title_is_figure { 34.0 } else { 30.0 } * s;
        let mut t = text(vec![sub], ax, size, size, 700, align, self.palette.accent);
        if self.content.title_is_figure {
            t.letter_spacing = 8.0 * s;
        }
        Some(Block {
            height: size * 1.25,
            nodes: vec![SceneNode::Text(t)],
        })
    }

    fn description_block(&self, s: f64) -> Option<Block> {
        if !self.spec.show_description {
            return None;
        }
        let desc = self.content.description.clone()?;
        let (x0, x1) = self.col();
        let (ax, align) = self.anchor();
        let size = 30.0 * s;
        let lines = wrap_text(&desc, x1 - x0, size, 400, 0.0, 3);
        let n = lines.len().max(1) as f64;
        let mut t = text(lines, ax, size, size, 400, align, self.palette.muted);
        t.line_height = size * 1.35;
        Some(Block {
            height: t.line_height * (n - 1.0) + size * 1.3,
            nodes: vec![SceneNode::Text(t)],
        })
    }

    fn date_block(&self, s: f64) -> Option<Block> {
        let d = self.content.date?;
        let label = self.date_text(d);
        let (ax, align) = self.anchor();
        if self.spec.date != DateStyle::LongPill {
            let size = 36.0 * s;
            let mut t = text(vec![label], ax, size, size, 600, align, self.palette.text);
            if self.spec.date == DateStyle::Numeric {
                t.family = FontFamily::Mono;
            }
            return Some(Block {
                height: size * 1.25,
                nodes: vec![SceneNode::Text(t)],
            });
        }

        let size = 40.0 * s;
        let pad_x = 40.0 * s;
        let pad_y = 22.0 * s;
        let tw = estimate_width(&label, size, 700, 0.0);
        let pw = tw + 2.0 * pad_x;
        let ph = size + 2.0 * pad_y;
        let left = match self.spec.align {
            Align::Center => ax - pw / 2.0,
            Align::Start => ax,
        };
        let pill = rect_node(
            Rect::new(left, 0.0, left + pw, ph),
            20.0 * s,
            Some(Fill::with_alpha(self.palette.text.color, 0.06)),
            Some(Stroke {
                fill: Fill::with_alpha(self.palette.text.color, 0.85),
                width: 3.0 * s,
            }),
        );
        let tx = match self.spec.align {
            Align::Center => ax,
            Align::Start => left + pad_x,
        };
        let mut t = text(vec![label], tx, pad_y + size * 0.8, size, 700, align, self.palette.text);
        t.family = FontFamily::Mono;
        Some(Block {
            height: ph,
            nodes: vec![pill, SceneNode::Text(t)],
        })
    }

    fn badge_block(&self, s: f64) -> Option<Block> {
        let badge = self.content.badge.clone()?;
        let (ax, align) = self.anchor();
        let size = 32.0 * s;
        let pad_x = 28.0 * s;
        let pad_y = 14.0 * s;
        let tw = estimate_width(&badge, size, 800, 0.0);
        let pw = tw + 2.0 * pad_x;
        let ph = size + 2.0 * pad_y;
        let left = match self.spec.align {
            Align::Center => ax - pw / 2.0,
            Align::Start => ax,
        };
        let tx = match self.spec.align {
            Align::Center => ax,
            Align::Start => left + pad_x,
        };
        Some(Block {
            height: ph,
            nodes: vec![
                rect_node(
                    Rect::new(left, 0.0, left + pw, ph),
                    ph / 2.0,
                    Some(Fill::with_alpha(self.palette.accent.color, 0.15)),
                    None,
                ),
                SceneNode::Text(text(
                    vec![badge],
                    tx,
                    pad_y + size * 0.8,
                    size,
                    800,
                    align,
                    self.palette.accent,
                )),
            ],
        })
    }

    fn event_block(&self, s: f64) -> Option<Block> {
        let line = self.content.event_line.clone()?;
        let (ax, align) = self.anchor();
        let size = 26.0 * s;
        Some(Block {
            height: size * 1.25,
            nodes: vec![SceneNode::Text(text(
                vec![line],
                ax,
                size,
                size,
                500,
                align,
                self.palette.muted,
            ))],
        })
    }

    fn stats_block(&self, s: f64, cells: &[StatCell]) -> Option<Block> {
        if cells.is_empty() {
            return None;
        }
        match self.spec.stats {
            StatArrangement::Hidden => None,
            StatArrangement::Minimal => Some(self.stat_lines(s, cells)),
            StatArrangement::Grid => Some(self.stat_cards(s, cells, 2)),
            StatArrangement::Row => Some(self.stat_cards(s, cells, cells.len().min(3))),
        }
    }

    fn stat_cards(&self, s: f64, cells: &[StatCell], cols: usize) -> Block {
        let (x0, x1) = self.col();
        let cols = cols.max(1);
        let gap = 24.0 * s;
        let cell_w = (x1 - x0 - gap * (cols as f64 - 1.0)) / cols as f64;
        let cell_h = 150.0 * s;
        let rows = cells.len().div_ceil(cols);
        let mut nodes = Vec::new();

        for (i, cell) in cells.iter().enumerate() {
            let col = i % cols;
            let row = i / cols;
            let cx0 = x0 + col as f64 * (cell_w + gap);
            let cy0 = row as f64 * (cell_h + gap);
            nodes.push(rect_node(
                Rect::new(cx0, cy0, cx0 + cell_w, cy0 + cell_h),
                28.0 * s,
                Some(self.palette.surface),
                Some(Stroke {
                    fill: self.palette.border,
                    width: 2.0 * s,
                }),
            ));

            let (tx, align) = match self.spec.align {
                Align::Center => (cx0 + cell_w / 2.0, TextAlign::Center),
                Align::Start => (cx0 + 28.0 * s, TextAlign::Start),
            };
            let inner = cell_w - 56.0 * s;

            let label = cell.label.to_uppercase();
            let mut label_size = 20.0 * s;
            let lw = estimate_width(&label, label_size, 700, 2.0 * s);
            if lw > inner {
                label_size *= inner / lw;
            }
            let mut l = text(vec![label], tx, cy0 + 50.0 * s, label_size, 700, align, self.palette.muted);
            l.letter_spacing = 2.0 * s;
            nodes.push(SceneNode::Text(l));

            let mut value_size = 48.0 * s;
            let vw = estimate_width(&cell.value, value_size, 800, 0.0);
            if vw > inner {
                value_size *= inner / vw;
            }
            nodes.push(SceneNode::Text(text(
                vec![cell.value.clone()],
                tx,
                cy0 + cell_h - 36.0 * s,
                value_size,
                800,
                align,
                self.palette.text,
            )));
        }

        Block {
            height: rows as f64 * cell_h + (rows as f64 - 1.0) * gap,
            nodes,
        }
    }

    fn stat_lines(&self, s: f64, cells: &[StatCell]) -> Block {
        let (x0, x1) = self.col();
        let row_h = 56.0 * s;
        let mut nodes = Vec::new();
        for (i, cell) in cells.iter().enumerate() {
            let y = i as f64 * row_h + 36.0 * s;
            let (lx, la, vx, va) = match self.spec.align {
                Align::Center => (
                    self.w() / 2.0 - 12.0 * s,
                    TextAlign::End,
                    self.w() / 2.0 + 12.0 * s,
                    TextAlign::Start,
                ),
                Align::Start => (x0, TextAlign::Start, x0 + (x1 - x0) * 0.55, TextAlign::Start),
            };
            let mut l = text(
                vec![cell.label.to_uppercase()],
                lx,
                y,
                22.0 * s,
                600,
                la,
                self.palette.muted,
            );
            l.letter_spacing = 2.0 * s;
            nodes.push(SceneNode::Text(l));
            nodes.push(SceneNode::Text(text(
                vec![cell.value.clone()],
                vx,
                y,
                34.0 * s,
                700,
                va,
                self.palette.text,
            )));
        }
        Block {
            height: cells.len() as f64 * row_h,
            nodes,
        }
    }

    fn flow_blocks(&self, s: f64) -> Vec<Block> {
        let mut blocks = Vec::new();
        blocks.extend(self.avatar_block(s));
        blocks.extend(self.kicker_block(s));
        blocks.push(self.title_block(s));
        blocks.extend(self.subtitle_block(s));
        blocks.extend(self.description_block(s));
        blocks.extend(self.date_block(s));
        blocks.extend(self.badge_block(s));
        blocks.extend(self.event_block(s));
        blocks.extend(self.stats_block(s, &self.content.cells));
        blocks
    }

    fn stack(blocks: Vec<Block>, top: f64, gap: f64, out: &mut Vec<SceneNode>) {
        let mut y = top;
        for b in blocks {
            for mut n in b.nodes {
                n.offset_y(y);
                out.push(n);
            }
            y += b.height + gap;
        }
    }

    fn stack_height(blocks: &[Block], gap: f64) -> f64 {
        let sum: f64 = blocks.iter().map(|b| b.height).sum();
        sum + gap * (blocks.len().saturating_sub(1)) as f64
    }

    /// Lay out the flow vertically centered, shrinking uniformly until it fits.
    fn flow(&self, out: &mut Vec<SceneNode>) {
        let m = self.spec.margin;
        let avail = self.h() - 2.0 * m - FOOTER_RESERVE;
        let mut s = if self.h() <= self.w() { 0.9 } else { 1.0 };
        let mut blocks = self.flow_blocks(s);
        for _ in 0..4 {
            let total = Self::stack_height(&blocks, 36.0 * s);
            if total <= avail || s <= MIN_SCALE {
                break;
            }
            s = (s * avail / total).max(MIN_SCALE);
            blocks = self.flow_blocks(s);
        }
        let gap = 36.0 * s;
        let total = Self::stack_height(&blocks, gap);
        let top = m + ((avail - total) / 2.0).max(0.0);
        Self::stack(blocks, top, gap, out);
    }

    fn footer(&self, out: &mut Vec<SceneNode>) {
        let label = self.content.footer.to_uppercase();
        if label.is_empty() {
            return;
        }
        let baseline = self.h() - self.spec.margin + 40.0;
        let size = 24.0;
        let spacing = 3.0;
        let tw = estimate_width(&label, size, 700, spacing);

        if self.spec.avatar.placement == AvatarPlacement::Footer {
            let a = self.spec.avatar.size;
            let total = a + 16.0 + tw;
            let left = self.w() / 2.0 - total / 2.0;
            let rect = Rect::new(left, baseline - a * 0.7, left + a, baseline + a * 0.3);
            out.push(self.portrait(rect, clip_for(self.spec.avatar.shape, a), false));
            let mut t = text(vec![label], left + a + 16.0, baseline, size, 700, TextAlign::Start, self.palette.muted);
            t.letter_spacing = spacing;
            out.push(SceneNode::Text(t));
            return;
        }

        let (ax, align) = self.anchor();
        let mut t = text(vec![label], ax, baseline, size, 700, align, self.palette.muted);
        t.letter_spacing = spacing;
        out.push(SceneNode::Text(t));
    }

    // --- decorations -----------------------------------------------------------------------

    fn backdrop(&self, out: &mut Vec<SceneNode>) {
        let full = self.canvas.rect();
        match self.spec.decoration {
            Decoration::CoverBackdrop => {
                if self.subject.has_cover {
                    out.push(SceneNode::Image {
                        rect: full,
                        source: ImageRef::Cover,
                        clip: ClipShape::Rounded(0.0),
                        opacity: 1.0,
                    });
                } else {
                    out.push(SceneNode::Placeholder {
                        rect: full,
                        clip: ClipShape::Rounded(0.0),
                        fill: self.palette.tint,
                        label: String::new(),
                        label_fill: self.palette.text,
                    });
                }
                out.push(rect_node(full, 0.0, Some(Fill::with_alpha(BLACK, 0.55)), None));
            }
            Decoration::PosterBand => {
                let band = self.h() * 0.08;
                let ink = Fill::with_alpha(self.palette.text.color, 0.12);
                out.push(rect_node(Rect::new(0.0, 0.0, self.w(), band), 0.0, Some(ink), None));
                out.push(rect_node(
                    Rect::new(0.0, self.h() - band, self.w(), self.h()),
                    0.0,
                    Some(ink),
                    None,
                ));
            }
            _ => {}
        }
    }

    fn orbit_rings(&self, out: &mut Vec<SceneNode>) {
        let center = Point::new(self.w() / 2.0, self.h() / 2.0);
        let ring = Fill::with_alpha(self.palette.border.color, 0.45);
        let planet = Fill::with_alpha(self.palette.accent.color, 0.7);
        let orbits = [(0.30, 30.0_f64, 10.0), (0.42, 150.0, 8.0), (0.54, 260.0, 6.0)];
        for (k, deg, r) in orbits {
            let radius = self.w() * k;
            out.push(SceneNode::Circle {
                center,
                radius,
                fill: None,
                stroke: Some(Stroke {
                    fill: ring,
                    width: 2.0,
                }),
            });
            let a = deg.to_radians();
            out.push(SceneNode::Circle {
                center: Point::new(center.x + radius * a.cos(), center.y + radius * a.sin()),
                radius: r,
                fill: Some(planet),
                stroke: None,
            });
        }
    }

    fn photo_frame(&self, out: &mut Vec<SceneNode>) {
        let m = self.spec.margin;
        let pad = 44.0;

        let caption = self.caption_blocks();
        let gap = 20.0;
        let caption_h = Self::stack_height(&caption, gap) + 2.0 * pad;

        let side = (self.w() - 2.0 * m - 2.0 * pad)
            .min(self.h() - 2.0 * m - caption_h - pad)
            .max(120.0);
        let frame_w = side + 2.0 * pad;
        let frame_h = pad + side + caption_h;
        let x0 = (self.w() - frame_w) / 2.0;
        let y0 = ((self.h() - frame_h) / 2.0).max(0.0);

        out.push(rect_node(
            Rect::new(x0 + 14.0, y0 + 18.0, x0 + frame_w + 14.0, y0 + frame_h + 18.0),
            6.0,
            Some(Fill::with_alpha(BLACK, 0.15)),
            None,
        ));
        out.push(rect_node(
            Rect::new(x0, y0, x0 + frame_w, y0 + frame_h),
            6.0,
            Some(Fill::solid(WHITE)),
            Some(Stroke {
                fill: self.palette.border,
                width: 2.0,
            }),
        ));
        let photo = Rect::new(x0 + pad, y0 + pad, x0 + pad + side, y0 + pad + side);
        out.push(self.portrait(photo, ClipShape::Rounded(4.0), true));

        Self::stack(caption, y0 + pad + side + pad, gap, out);
    }

    fn caption_blocks(&self) -> Vec<Block> {
        let cx = self.w() / 2.0;
        let inner = self.w() - 2.0 * self.spec.margin - 88.0;
        let mut blocks = Vec::new();

        let size = 56.0;
        let lines = wrap_text(&self.content.field_title(), inner, size, 700, 0.0, self.spec.max_title_lines);
        let n = lines.len().max(1) as f64;
        let mut t = text(lines, cx, size * 0.9, size, 700, TextAlign::Center, self.palette.text);
        t.family = FontFamily::Serif;
        t.line_height = size * 1.1;
        blocks.push(Block {
            height: t.line_height * (n - 1.0) + size * 1.1,
            nodes: vec![SceneNode::Text(t)],
        });

        let meta = match self.content.date {
            Some(d) => format!("{}  \u{00b7}  {}", self.date_text(d), self.content.footer),
            None => self.content.footer.clone(),
        };
        let mut t = text(vec![meta], cx, 28.0, 28.0, 500, TextAlign::Center, self.palette.muted);
        t.family = FontFamily::Mono;
        blocks.push(Block {
            height: 34.0,
            nodes: vec![SceneNode::Text(t)],
        });

        let cells: Vec<StatCell> = self.content.cells.iter().take(2).cloned().collect();
        if let Some(b) = self.stats_block(0.9, &cells) {
            blocks.push(b);
        }
        blocks
    }

    fn document_page(&self, out: &mut Vec<SceneNode>) {
        let m = self.spec.margin;
        let x0 = m;
        let x1 = self.w() - m;
        let page_h = (self.h() - 2.0 * m).min(1100.0);
        let y0 = (self.h() - page_h) / 2.0;
        let y1 = y0 + page_h;
        let inset = 48.0;

        out.push(rect_node(
            Rect::new(x0, y0, x1, y1),
            24.0,
            Some(self.palette.surface),
            Some(Stroke {
                fill: self.palette.border,
                width: 3.0,
            }),
        ));

        // Header band.
        let band_h = 120.0;
        let band_fill = self.palette.accent;
        out.push(rect_node(Rect::new(x0, y0, x1, y0 + band_h), 24.0, Some(band_fill), None));
        out.push(rect_node(
            Rect::new(x0, y0 + band_h / 2.0, x1, y0 + band_h),
            0.0,
            Some(band_fill),
            None,
        ));
        let ink = if luminance(band_fill.color) > 0.55 {
            INK
        } else {
            WHITE
        };
        let mut t = text(
            vec!["MILESTONE PASSPORT".to_string()],
            x0 + inset,
            y0 + 76.0,
            40.0,
            800,
            TextAlign::Start,
            Fill::solid(ink),
        );
        t.letter_spacing = 6.0;
        out.push(SceneNode::Text(t));
        if let Some(k) = &self.content.kicker {
            out.push(SceneNode::Text(text(
                vec![k.clone()],
                x1 - inset,
                y0 + 72.0,
                24.0,
                700,
                TextAlign::End,
                Fill::with_alpha(ink, 0.8),
            )));
        }

        // Photo.
        let photo_w = 280.0;
        let photo_h = 360.0;
        let py0 = y0 + band_h + 48.0;
        let photo = Rect::new(x0 + inset, py0, x0 + inset + photo_w, py0 + photo_h);
        out.push(self.portrait(photo, ClipShape::Rounded(12.0), false));

        // Fields.
        let fx = photo.x1 + inset;
        let fw = x1 - inset - fx;
        let date = self
            .content
            .date
            .map(|d| self.date_text(d))
            .unwrap_or_else(|| "\u{2014}".to_string());
        let status = self.content.subtitle.clone().unwrap_or_default().to_uppercase();
        let name = if self.subject.name.is_empty() {
            "\u{2014}".to_string()
        } else {
            self.subject.name.to_uppercase()
        };
        let fields = [
            ("Name", name, 1usize),
            ("Milestone", self.content.field_title().to_uppercase(), self.spec.max_title_lines),
            ("Date", date, 1),
            ("Status", status, 1),
        ];
        let mut fy = py0;
        for (label, value, max_lines) in fields {
            let mut l = text(
                vec![label.to_uppercase()],
                fx,
                fy + 20.0,
                20.0,
                600,
                TextAlign::Start,
                self.palette.muted,
            );
            l.letter_spacing = 2.0;
            out.push(SceneNode::Text(l));
            let lines = wrap_text(&value, fw, 34.0, 700, 0.0, max_lines);
            let n = lines.len().max(1) as f64;
            let mut v = text(lines, fx, fy + 64.0, 34.0, 700, TextAlign::Start, self.palette.text);
            v.line_height = 42.0;
            out.push(SceneNode::Text(v));
            fy += 64.0 + 42.0 * (n - 1.0) + 30.0;
        }

        // Machine readable zone.
        let mrz_h = 150.0;
        let mrz_top = y1 - mrz_h;
        out.push(rect_node(
            Rect::new(x0, mrz_top, x1, y1),
            0.0,
            Some(self.palette.tint),
            None,
        ));
        let (l1, l2) = mrz_lines(&self.subject.name, &self.content.field_title(), self.content.date);
        let mut mrz = text(vec![l1, l2], x0 + 40.0, mrz_top + 60.0, 28.0, 500, TextAlign::Start, self.palette.text);
        mrz.family = FontFamily::Mono;
        mrz.letter_spacing = 1.5;
        mrz.line_height = 48.0;
        out.push(SceneNode::Text(mrz));

        // Stats as fields, two per row, as many rows as fit above the zone.
        let sy = photo.y1.max(fy) + 24.0;
        let row_h = 90.0;
        let rows = ((mrz_top - 24.0 - sy) / row_h).floor().max(0.0) as usize;
        let col_w = (x1 - x0 - 2.0 * inset) / 2.0;
        for (i, cell) in self.content.cells.iter().take(rows * 2).enumerate() {
            let cx = x0 + inset + (i % 2) as f64 * col_w;
            let cy = sy + (i / 2) as f64 * row_h;
            let mut l = text(
                vec![cell.label.to_uppercase()],
                cx,
                cy + 20.0,
                20.0,
                600,
                TextAlign::Start,
                self.palette.muted,
            );
            l.letter_spacing = 2.0;
            out.push(SceneNode::Text(l));
            out.push(SceneNode::Text(text(
                vec![cell.value.clone()],
                cx,
                cy + 62.0,
                34.0,
                700,
                TextAlign::Start,
                self.palette.text,
            )));
        }
    }
}

/// Two 44-character machine-readable lines in the passport style.
fn mrz_lines(name: &str, title: &str, date: Option<NaiveDate>) -> (String, String) {
    fn mrz(s: &str) -> String {
        let mut out = String::new();
        let mut last_filler = false;
        for c in s.to_uppercase().chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c);
                last_filler = false;
            } else if !last_filler {
                out.push('<');
                last_filler = true;
            }
        }
        out
    }
    fn pad44(s: String) -> String {
        let mut s: String = s.chars().take(44).collect();
        while s.chars().count() < 44 {
            s.push('<');
        }
        s
    }
    let mut parts = name.split_whitespace();
    let given = parts.next().unwrap_or("");
    let surname: Vec<&str> = parts.collect();
    let surname = if surname.is_empty() {
        given.to_string()
    } else {
        surname.join(" ")
    };
    let line1 = pad44(format!("P<MLS{}<<{}", mrz(&surname), mrz(given)));
    let stamp = date
        .map(|d| d.format("%y%m%d").to_string())
        .unwrap_or_else(|| "<<<<<<".to_string());
    let line2 = pad44(format!("{stamp}<{}", mrz(title)));
    (line1, line2)
}

/// Resolve one template into a scene.
///
/// Pure: identical inputs (including `now`) always produce an identical scene.
pub fn build_scene(
    payload: &Payload,
    subject: &Subject,
    tokens: &ColorTokens,
    template: TemplateId,
    aspect: AspectRatio,
    flags: SceneFlags,
    now: NaiveDateTime,
) -> SceneDescription {
    let spec = spec_for(template);
    let canvas = aspect.canvas();
    let palette = Palette::new(tokens, spec.decoration);
    let builder = Builder {
        canvas,
        spec,
        palette,
        content: Content::new(payload, subject, spec, flags, now),
        subject,
    };

    let mut nodes = Vec::new();
    builder.backdrop(&mut nodes);
    if flags.cosmic_overlay {
        builder.orbit_rings(&mut nodes);
    }
    match spec.decoration {
        Decoration::PhotoFrame => builder.photo_frame(&mut nodes),
        Decoration::Document => builder.document_page(&mut nodes),
        Decoration::Plain | Decoration::PosterBand | Decoration::CoverBackdrop => {
            builder.flow(&mut nodes);
            builder.footer(&mut nodes);
        }
    }

    SceneDescription {
        canvas,
        background: palette.page,
        nodes,
    }
}

/// Payload for a "total existence" card at `now`.
pub fn existence_payload(subject: &Subject, now: NaiveDateTime) -> Payload {
    Payload::Stats(StatPayload::between(subject.birth, now))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/build.rs"]
mod tests;
