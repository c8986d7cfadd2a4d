//! Maps a card record onto a recyclable display row.
//!
//! Rows are reused while the list scrolls, so [`bind`] always resets a row to
//! its baseline before applying the record. Nothing from the previously bound
//! card survives a rebind.

use crate::card::{CardRecord, Rarity};
use crate::config_file::DisplayFieldSelection;
use crate::glyph::{GlyphFormatter, RichText};

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Set-code colors by rarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarityPalette {
    pub common: Color,
    pub uncommon: Color,
    pub rare: Color,
    pub mythic: Color,
    pub timeshifted: Color,
    /// Used for rarity codes the palette has no entry for.
    pub default: Color,
}

impl RarityPalette {
    pub const COMMON: Color = Color::rgb(0xE0, 0xE0, 0xE0);
    pub const UNCOMMON: Color = Color::rgb(0xA8, 0xB8, 0xC8);
    pub const RARE: Color = Color::rgb(0xD4, 0xAF, 0x37);
    pub const MYTHIC: Color = Color::rgb(0xE4, 0x6E, 0x22);
    pub const TIMESHIFTED: Color = Color::rgb(0x9B, 0x59, 0xB6);
    pub const DEFAULT: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub fn color(&self, rarity: Rarity) -> Color {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Mythic => self.mythic,
            Rarity::Timeshifted => self.timeshifted,
            Rarity::Other(_) => self.default,
        }
    }
}

impl Default for RarityPalette {
    fn default() -> Self {
        Self {
            common: Self::COMMON,
            uncommon: Self::UNCOMMON,
            rare: Self::RARE,
            mythic: Self::MYTHIC,
            timeshifted: Self::TIMESHIFTED,
            default: Self::DEFAULT,
        }
    }
}

/// A text slot in a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot<T> {
    pub value: T,
    pub visible: bool,
}

impl<T: Default> Slot<T> {
    fn show(&mut self, value: T) {
        self.value = value;
        self.visible = true;
    }

    fn reset(&mut self) {
        self.value = T::default();
        self.visible = false;
    }
}

/// One rendered result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: i64,
    pub name: String,
    pub set: Slot<String>,
    pub set_color: Color,
    pub cost: Slot<RichText>,
    pub type_line: Slot<String>,
    pub ability: Slot<RichText>,
    pub power: Slot<String>,
    pub slash_visible: bool,
    pub toughness: Slot<String>,
    pub loyalty: Slot<String>,
}

impl RowView {
    /// A blank row at baseline.
    pub fn new(default_color: Color) -> Self {
        let mut row = Self {
            id: 0,
            name: String::new(),
            set: Slot::default(),
            set_color: default_color,
            cost: Slot::default(),
            type_line: Slot::default(),
            ability: Slot::default(),
            power: Slot::default(),
            slash_visible: false,
            toughness: Slot::default(),
            loyalty: Slot::default(),
        };
        row.reset(default_color);
        row
    }

    /// Baseline: every optional slot hidden and empty, set color at default.
    pub fn reset(&mut self, default_color: Color) {
        self.id = 0;
        self.name.clear();
        self.set.reset();
        self.set_color = default_color;
        self.cost.reset();
        self.type_line.reset();
        self.ability.reset();
        self.power.reset();
        self.slash_visible = false;
        self.toughness.reset();
        self.loyalty.reset();
    }

    /// Whether any part of the power/slash/toughness triplet is showing.
    pub fn power_toughness_visible(&self) -> bool {
        self.power.visible || self.slash_visible || self.toughness.visible
    }
}

/// Everything a bind pass reads besides the record itself.
pub struct RowContext<'a> {
    pub fields: DisplayFieldSelection,
    pub glyphs: &'a dyn GlyphFormatter,
    pub palette: RarityPalette,
}

/// The optional fields a row can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalField {
    Set,
    ManaCost,
    TypeLine,
    Ability,
    PowerToughness,
}

impl OptionalField {
    pub const ALL: [OptionalField; 5] = [
        Self::Set,
        Self::ManaCost,
        Self::TypeLine,
        Self::Ability,
        Self::PowerToughness,
    ];

    pub fn is_selected(self, fields: &DisplayFieldSelection) -> bool {
        match self {
            Self::Set => fields.set,
            Self::ManaCost => fields.mana_cost,
            Self::TypeLine => fields.type_line,
            Self::Ability => fields.ability,
            Self::PowerToughness => fields.power_toughness,
        }
    }

    fn binder(self) -> Binder {
        match self {
            Self::Set => bind_set,
            Self::ManaCost => bind_cost,
            Self::TypeLine => bind_type,
            Self::Ability => bind_ability,
            Self::PowerToughness => bind_power_toughness,
        }
    }
}

type Binder = fn(&mut RowView, &CardRecord, &RowContext<'_>);

fn bind_set(row: &mut RowView, card: &CardRecord, ctx: &RowContext<'_>) {
    row.set.show(card.set.clone());
    row.set_color = ctx.palette.color(card.rarity);
}

fn bind_cost(row: &mut RowView, card: &CardRecord, ctx: &RowContext<'_>) {
    row.cost.show(ctx.glyphs.format_with_glyphs(&card.mana_cost));
}

fn bind_type(row: &mut RowView, card: &CardRecord, _ctx: &RowContext<'_>) {
    row.type_line.show(card.type_line.clone());
}

fn bind_ability(row: &mut RowView, card: &CardRecord, ctx: &RowContext<'_>) {
    row.ability.show(ctx.glyphs.format_with_glyphs(&card.ability));
}

// Planeswalkers show loyalty in place of the whole P/T triplet.
fn bind_power_toughness(row: &mut RowView, card: &CardRecord, _ctx: &RowContext<'_>) {
    if let Some(loyalty) = card.loyalty.display() {
        row.loyalty.show(loyalty);
        return;
    }

    let power = card.power.display();
    let toughness = card.toughness.display();
    if power.is_none() && toughness.is_none() {
        return;
    }
    if let Some(power) = power {
        row.power.show(power);
    }
    if let Some(toughness) = toughness {
        row.toughness.show(toughness);
    }
    row.slash_visible = true;
}

/// Bind `card` into a (possibly recycled) row.
pub fn bind(row: &mut RowView, card: &CardRecord, ctx: &RowContext<'_>) {
    row.reset(ctx.palette.default);
    row.id = card.id;
    row.name.push_str(&card.name);

    for field in OptionalField::ALL {
        if field.is_selected(&ctx.fields) {
            (field.binder())(row, card, ctx);
        }
    }
}

/// Bind `card` into a fresh row.
pub fn present(card: &CardRecord, ctx: &RowContext<'_>) -> RowView {
    let mut row = RowView::new(ctx.palette.default);
    bind(&mut row, card, ctx);
    row
}
