//! Structured search criteria handed to the record store.

use serde::{Deserialize, Serialize};

/// Numeric comparator for power, toughness and converted mana cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    Lt,
    Le,
    #[default]
    Eq,
    Ge,
    Gt,
}

impl Logic {
    pub fn compare(self, value: f32, choice: f32) -> bool {
        match self {
            Self::Lt => value < choice,
            Self::Le => value <= choice,
            Self::Eq => value == choice,
            Self::Ge => value >= choice,
            Self::Gt => value > choice,
        }
    }
}

/// How the color filter is applied to a card's color identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorLogic {
    /// At least one of the requested colors.
    #[default]
    Any,
    /// All requested colors, others allowed.
    All,
    /// Exactly the requested colors.
    Exact,
}

/// How multiple words in a text or type filter combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordLogic {
    #[default]
    All,
    Any,
    Exact,
    Not,
}

/// Which printings of a card show up in the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetLogic {
    #[default]
    AllPrintings,
    MostRecentPrinting,
    FirstPrinting,
}

/// A numeric filter: `stat <logic> choice`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericFilter {
    pub choice: f32,
    #[serde(default)]
    pub logic: Logic,
}

impl NumericFilter {
    pub fn new(choice: f32, logic: Logic) -> Self {
        Self { choice, logic }
    }

    pub fn matches(&self, value: f32) -> bool {
        self.logic.compare(value, self.choice)
    }
}

/// Everything the search screen can ask the store for.
///
/// Empty strings and `None` mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub name: String,
    pub text: String,
    pub text_logic: WordLogic,
    pub type_line: String,
    pub type_logic: WordLogic,
    /// Color letters, e.g. `WU`.
    pub color: String,
    pub color_logic: ColorLogic,
    /// Set codes; empty means every set.
    pub sets: Vec<String>,
    pub set_logic: SetLogic,
    pub power: Option<NumericFilter>,
    pub toughness: Option<NumericFilter>,
    pub cmc: Option<NumericFilter>,
    pub format: String,
    /// Rarity codes, e.g. `['R', 'M']`; empty means every rarity.
    pub rarity: Vec<char>,
    pub flavor: String,
    pub artist: String,
}

impl SearchCriteria {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether only one printing per card name should be returned.
    pub fn consolidate(&self) -> bool {
        matches!(
            self.set_logic,
            SetLogic::MostRecentPrinting | SetLogic::FirstPrinting
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consolidation_follows_set_logic() {
        let mut c = SearchCriteria::default();
        assert!(!c.consolidate());
        c.set_logic = SetLogic::FirstPrinting;
        assert!(c.consolidate());
        c.set_logic = SetLogic::MostRecentPrinting;
        assert!(c.consolidate());
    }

    #[test]
    fn comparators() {
        assert!(NumericFilter::new(3.0, Logic::Ge).matches(3.0));
        assert!(!NumericFilter::new(3.0, Logic::Gt).matches(3.0));
        assert!(NumericFilter::new(3.0, Logic::Lt).matches(2.5));
        assert!(NumericFilter::new(3.0, Logic::Eq).matches(3.0));
    }

    #[test]
    fn partial_criteria_parse_from_toml() {
        let c: SearchCriteria = toml::from_str(
            r#"
            name = "elf"
            set_logic = "first_printing"
            rarity = ["R", "M"]

            [cmc]
            choice = 2.0
            logic = "le"
            "#,
        )
        .unwrap();
        assert_eq!(c.name, "elf");
        assert_eq!(c.set_logic, SetLogic::FirstPrinting);
        assert_eq!(c.rarity, vec!['R', 'M']);
        assert_eq!(c.cmc, Some(NumericFilter::new(2.0, Logic::Le)));
        assert!(c.text.is_empty());
    }
}
