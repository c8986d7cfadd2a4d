//! Alphabetic fast-scroll index over a name-sorted result list.
//!
//! The index assumes the list is sorted by name. On any other ordering the
//! answers are still in range but carry no meaning.

use unicode_normalization::UnicodeNormalization;

pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Upper-cased leading letter of `name` with diacritics stripped.
///
/// `Æ` folds to `A`. `None` for an empty name.
pub fn leading_letter(name: &str) -> Option<char> {
    let first = name.trim_start().chars().next()?;
    if first == 'Æ' || first == 'æ' {
        return Some('A');
    }
    let base = std::iter::once(first).nfd().next().unwrap_or(first);
    base.to_uppercase().next()
}

#[derive(Debug, Clone)]
pub struct AlphabetIndex {
    /// Leading letter of each row, in list order.
    letters: Vec<Option<char>>,
}

impl AlphabetIndex {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            letters: names.into_iter().map(leading_letter).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn sections(&self) -> &'static [char] {
        &ALPHABET
    }

    /// First row whose leading letter is at or after the section letter,
    /// clamped into the list.
    pub fn position_for_section(&self, section: usize) -> usize {
        if self.letters.is_empty() {
            return 0;
        }
        let section = section.min(ALPHABET.len() - 1);
        let letter = ALPHABET[section];
        // Empty names sort first and count as "before A".
        let pos = self
            .letters
            .partition_point(|l| l.is_none_or(|c| c < letter));
        pos.min(self.letters.len() - 1)
    }

    /// Section of the row at `position`: the last letter at or before the
    /// row's leading letter, clamped into the alphabet.
    pub fn section_for_position(&self, position: usize) -> usize {
        if self.letters.is_empty() {
            return 0;
        }
        let position = position.min(self.letters.len() - 1);
        let Some(letter) = self.letters[position] else {
            return 0;
        };
        ALPHABET
            .partition_point(|&a| a <= letter)
            .saturating_sub(1)
    }
}
