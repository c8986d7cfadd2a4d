//! Card records as they come out of the record store.

use serde::{Deserialize, Serialize};

/// Encoded sentinel for a `*` power/toughness.
pub const STAR: f32 = -1000.0;
/// Encoded sentinel for `1+*`.
pub const ONE_PLUS_STAR: f32 = -1001.0;
/// Encoded sentinel for `2+*`.
pub const TWO_PLUS_STAR: f32 = -1002.0;
/// Encoded sentinel for `7-*`.
pub const SEVEN_MINUS_STAR: f32 = -1003.0;
/// Encoded sentinel for `*^2`.
pub const STAR_SQUARED: f32 = -1004.0;
/// Encoded sentinel for "this card has no such stat".
pub const NO_ONE_CARES: f32 = -1005.0;

/// Printing rarity, stored as a single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "char", into = "char")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
    Timeshifted,
    /// A code the application does not know about.
    Other(char),
}

impl Rarity {
    pub fn code(self) -> char {
        match self {
            Self::Common => 'C',
            Self::Uncommon => 'U',
            Self::Rare => 'R',
            Self::Mythic => 'M',
            Self::Timeshifted => 'T',
            Self::Other(c) => c,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Mythic => "mythic",
            Self::Timeshifted => "timeshifted",
            Self::Other(_) => "other",
        }
    }
}

impl From<char> for Rarity {
    fn from(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'C' => Self::Common,
            'U' => Self::Uncommon,
            'R' => Self::Rare,
            'M' => Self::Mythic,
            'T' => Self::Timeshifted,
            other => Self::Other(other),
        }
    }
}

impl From<Rarity> for char {
    fn from(r: Rarity) -> Self {
        r.code()
    }
}

/// Power or toughness. Some cards carry a symbolic value instead of a number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub enum Stat {
    #[default]
    NotApplicable,
    Star,
    OnePlusStar,
    TwoPlusStar,
    SevenMinusStar,
    StarSquared,
    Value(f32),
}

impl Stat {
    /// Decode the store's float representation.
    pub fn from_encoded(v: f32) -> Self {
        if v == NO_ONE_CARES {
            Self::NotApplicable
        } else if v == STAR {
            Self::Star
        } else if v == ONE_PLUS_STAR {
            Self::OnePlusStar
        } else if v == TWO_PLUS_STAR {
            Self::TwoPlusStar
        } else if v == SEVEN_MINUS_STAR {
            Self::SevenMinusStar
        } else if v == STAR_SQUARED {
            Self::StarSquared
        } else {
            Self::Value(v)
        }
    }

    pub fn encoded(self) -> f32 {
        match self {
            Self::NotApplicable => NO_ONE_CARES,
            Self::Star => STAR,
            Self::OnePlusStar => ONE_PLUS_STAR,
            Self::TwoPlusStar => TWO_PLUS_STAR,
            Self::SevenMinusStar => SEVEN_MINUS_STAR,
            Self::StarSquared => STAR_SQUARED,
            Self::Value(v) => v,
        }
    }

    pub fn is_applicable(self) -> bool {
        self != Self::NotApplicable
    }

    /// The plain number, if this stat is numeric.
    pub fn value(self) -> Option<f32> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Display token: symbolic values use their fixed token, numbers go
    /// through [`format_number`]. `None` for [`Stat::NotApplicable`].
    pub fn display(self) -> Option<String> {
        let token = match self {
            Self::NotApplicable => return None,
            Self::Star => "*",
            Self::OnePlusStar => "1+*",
            Self::TwoPlusStar => "2+*",
            Self::SevenMinusStar => "7-*",
            Self::StarSquared => "*^2",
            Self::Value(v) => return Some(format_number(v)),
        };
        Some(token.to_string())
    }
}

impl From<f32> for Stat {
    fn from(v: f32) -> Self {
        Self::from_encoded(v)
    }
}

impl From<Stat> for f32 {
    fn from(s: Stat) -> Self {
        s.encoded()
    }
}

/// Starting loyalty. Absent for anything that is not a planeswalker.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Loyalty(pub Option<f32>);

impl Loyalty {
    pub fn display(self) -> Option<String> {
        self.0.map(format_number)
    }

    pub fn is_present(self) -> bool {
        self.0.is_some()
    }
}

impl From<f32> for Loyalty {
    fn from(v: f32) -> Self {
        if v == NO_ONE_CARES { Self(None) } else { Self(Some(v)) }
    }
}

impl From<Loyalty> for f32 {
    fn from(l: Loyalty) -> Self {
        l.0.unwrap_or(NO_ONE_CARES)
    }
}

/// Integers print without a fractional part, everything else as a decimal.
pub fn format_number(v: f32) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// One card printing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: i64,
    pub name: String,
    pub set: String,
    pub rarity: Rarity,
    /// Glyph markup, e.g. `{2}{G}{G}`.
    #[serde(default)]
    pub mana_cost: String,
    #[serde(default)]
    pub cmc: f32,
    /// Color identity letters, e.g. `WU`.
    #[serde(default)]
    pub color: String,
    #[serde(rename = "type", default)]
    pub type_line: String,
    /// Rules text with glyph markup.
    #[serde(default)]
    pub ability: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub power: Stat,
    #[serde(default)]
    pub toughness: Stat,
    #[serde(default)]
    pub loyalty: Loyalty,
    /// Collector number within the set.
    #[serde(default)]
    pub number: String,
    /// Formats this printing is legal in.
    #[serde(default)]
    pub formats: Vec<String>,
}

impl CardRecord {
    /// Minimal record, mostly for tests and fixtures.
    pub fn new(id: i64, name: impl Into<String>, set: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id,
            name: name.into(),
            set: set.into(),
            rarity,
            mana_cost: String::new(),
            cmc: 0.0,
            color: String::new(),
            type_line: String::new(),
            ability: String::new(),
            flavor: String::new(),
            artist: String::new(),
            power: Stat::NotApplicable,
            toughness: Stat::NotApplicable,
            loyalty: Loyalty(None),
            number: String::new(),
            formats: Vec::new(),
        }
    }
}
