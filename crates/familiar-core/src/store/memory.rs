//! In-memory record store loaded from a JSON card file.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{CardStore, StoreError, StoreFuture};
use crate::card::CardRecord;
use crate::criteria::{ColorLogic, SearchCriteria, SetLogic, WordLogic};
use crate::section_index::leading_letter;

/// On-disk card file layout.
#[derive(Debug, Deserialize)]
struct CardFile {
    /// Set codes, oldest release first.
    #[serde(default)]
    sets: Vec<String>,
    cards: Vec<CardRecord>,
}

/// Card store holding every printing in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCardStore {
    cards: Vec<CardRecord>,
    /// Release rank per upper-cased set code (0 = oldest).
    set_rank: HashMap<String, usize>,
}

impl MemoryCardStore {
    /// Build a store from records; `set_order` lists set codes oldest first.
    pub fn from_records(cards: Vec<CardRecord>, set_order: &[&str]) -> Self {
        let set_rank = set_order
            .iter()
            .enumerate()
            .map(|(i, code)| (code.to_uppercase(), i))
            .collect();
        Self { cards, set_rank }
    }

    /// Load a JSON card file: `{"sets": [...], "cards": [...]}`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, StoreError> {
        let file: CardFile = serde_json::from_str(content)?;
        let order: Vec<&str> = file.sets.iter().map(String::as_str).collect();
        let store = Self::from_records(file.cards, &order);
        tracing::debug!(
            cards = store.cards.len(),
            sets = store.set_rank.len(),
            "loaded card file"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn rank(&self, set: &str) -> Option<usize> {
        self.set_rank.get(&set.to_uppercase()).copied()
    }

    fn run_search(&self, criteria: &SearchCriteria) -> Vec<CardRecord> {
        let mut hits: Vec<&CardRecord> = self
            .cards
            .iter()
            .filter(|card| matches_criteria(card, criteria))
            .collect();

        if criteria.consolidate() {
            let mut best: HashMap<&str, &CardRecord> = HashMap::new();
            for card in hits {
                let keep = match best.get(card.name.as_str()) {
                    None => true,
                    Some(current) => {
                        let (new_rank, old_rank) = (self.rank(&card.set), self.rank(&current.set));
                        match criteria.set_logic {
                            SetLogic::MostRecentPrinting => new_rank > old_rank,
                            _ => new_rank < old_rank,
                        }
                    }
                };
                if keep {
                    best.insert(card.name.as_str(), card);
                }
            }
            hits = best.into_values().collect();
        }

        // Fold leading diacritics the same way the fast-scroll index does.
        hits.sort_by(|a, b| {
            leading_letter(&a.name)
                .cmp(&leading_letter(&b.name))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| self.rank(&a.set).cmp(&self.rank(&b.set)))
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.into_iter().cloned().collect()
    }
}

impl CardStore for MemoryCardStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_by_id(&self, id: i64) -> StoreFuture<'_, Option<CardRecord>> {
        let found = self.cards.iter().find(|c| c.id == id).cloned();
        Box::pin(async move { Ok(found) })
    }

    fn search<'a>(&'a self, criteria: &'a SearchCriteria) -> StoreFuture<'a, Vec<CardRecord>> {
        Box::pin(async move { Ok(self.run_search(criteria)) })
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_words(haystack: &str, query: &str, logic: WordLogic) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let haystack = haystack.to_lowercase();
    let query = query.to_lowercase();
    let mut words = query.split_whitespace();
    match logic {
        WordLogic::All => words.all(|w| haystack.contains(w)),
        WordLogic::Any => words.any(|w| haystack.contains(w)),
        WordLogic::Exact => haystack.contains(query.trim()),
        WordLogic::Not => !words.any(|w| haystack.contains(w)),
    }
}

fn matches_color(card_color: &str, wanted: &str, logic: ColorLogic) -> bool {
    if wanted.is_empty() {
        return true;
    }
    let have: Vec<char> = card_color.chars().map(|c| c.to_ascii_uppercase()).collect();
    let want: Vec<char> = wanted.chars().map(|c| c.to_ascii_uppercase()).collect();
    match logic {
        ColorLogic::Any => want.iter().any(|c| have.contains(c)),
        ColorLogic::All => want.iter().all(|c| have.contains(c)),
        ColorLogic::Exact => {
            want.iter().all(|c| have.contains(c)) && have.iter().all(|c| want.contains(c))
        }
    }
}

fn matches_criteria(card: &CardRecord, c: &SearchCriteria) -> bool {
    if !contains_ci(&card.name, &c.name)
        || !contains_ci(&card.flavor, &c.flavor)
        || !contains_ci(&card.artist, &c.artist)
    {
        return false;
    }
    if !matches_words(&card.ability, &c.text, c.text_logic)
        || !matches_words(&card.type_line, &c.type_line, c.type_logic)
    {
        return false;
    }
    if !matches_color(&card.color, &c.color, c.color_logic) {
        return false;
    }
    if !c.sets.is_empty() && !c.sets.iter().any(|s| s.eq_ignore_ascii_case(&card.set)) {
        return false;
    }
    if !c.rarity.is_empty()
        && !c
            .rarity
            .iter()
            .any(|r| r.eq_ignore_ascii_case(&card.rarity.code()))
    {
        return false;
    }
    if !c.format.is_empty() && !card.formats.iter().any(|f| f.eq_ignore_ascii_case(&c.format)) {
        return false;
    }
    // Symbolic stats never satisfy a numeric comparator.
    if let Some(f) = &c.power
        && !card.power.value().is_some_and(|v| f.matches(v))
    {
        return false;
    }
    if let Some(f) = &c.toughness
        && !card.toughness.value().is_some_and(|v| f.matches(v))
    {
        return false;
    }
    if let Some(f) = &c.cmc
        && !f.matches(card.cmc)
    {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rarity, Stat};
    use crate::criteria::{Logic, NumericFilter};

    fn card(id: i64, name: &str, set: &str, rarity: Rarity) -> CardRecord {
        CardRecord::new(id, name, set, rarity)
    }

    fn store() -> MemoryCardStore {
        let mut elves = card(1, "Llanowar Elves", "LEA", Rarity::Common);
        elves.color = "G".into();
        elves.type_line = "Creature - Elf Druid".into();
        elves.power = Stat::Value(1.0);
        elves.toughness = Stat::Value(1.0);
        elves.cmc = 1.0;

        let mut elves_m19 = elves.clone();
        elves_m19.id = 2;
        elves_m19.set = "M19".into();

        let mut goyf = card(3, "Tarmogoyf", "FUT", Rarity::Rare);
        goyf.color = "G".into();
        goyf.type_line = "Creature - Lhurgoyf".into();
        goyf.power = Stat::Star;
        goyf.toughness = Stat::OnePlusStar;
        goyf.cmc = 2.0;

        let mut bolt = card(4, "Lightning Bolt", "LEA", Rarity::Common);
        bolt.color = "R".into();
        bolt.type_line = "Instant".into();
        bolt.ability = "Lightning Bolt deals 3 damage to any target.".into();
        bolt.cmc = 1.0;

        let mut jace = card(5, "Jace Beleren", "LRW", Rarity::Rare);
        jace.color = "U".into();
        jace.type_line = "Planeswalker - Jace".into();
        jace.cmc = 3.0;

        MemoryCardStore::from_records(
            vec![goyf, elves_m19, bolt, elves, jace],
            &["LEA", "FUT", "LRW", "M19"],
        )
    }

    #[tokio::test]
    async fn search_sorts_by_name_then_release() {
        let s = store();
        let hits = s.search(&SearchCriteria::default()).await.unwrap();
        let ids: Vec<i64> = hits.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![5, 4, 1, 2, 3]);
    }

    #[tokio::test]
    async fn name_filter_is_case_insensitive() {
        let s = store();
        let hits = s.search(&SearchCriteria::by_name("ELVES")).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn consolidation_picks_one_printing() {
        let s = store();
        let mut c = SearchCriteria::by_name("elves");
        c.set_logic = SetLogic::MostRecentPrinting;
        let hits = s.search(&c).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].set, "M19");

        c.set_logic = SetLogic::FirstPrinting;
        let hits = s.search(&c).await.unwrap();
        assert_eq!(hits[0].set, "LEA");
    }

    #[tokio::test]
    async fn star_power_never_matches_comparator() {
        let s = store();
        let c = SearchCriteria {
            power: Some(NumericFilter::new(0.0, Logic::Ge)),
            ..SearchCriteria::default()
        };
        let hits = s.search(&c).await.unwrap();
        assert!(hits.iter().all(|h| h.name == "Llanowar Elves"));
    }

    #[tokio::test]
    async fn color_and_type_filters() {
        let s = store();
        let c = SearchCriteria {
            color: "G".into(),
            type_line: "lhurgoyf".into(),
            ..SearchCriteria::default()
        };
        let hits = s.search(&c).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 3);

        let c = SearchCriteria {
            text: "damage target".into(),
            text_logic: WordLogic::All,
            ..SearchCriteria::default()
        };
        assert_eq!(s.search(&c).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rarity_and_set_filters() {
        let s = store();
        let c = SearchCriteria {
            rarity: vec!['r'],
            sets: vec!["lrw".into()],
            ..SearchCriteria::default()
        };
        let hits = s.search(&c).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Jace Beleren");
    }

    #[tokio::test]
    async fn fetch_by_id_reports_unknown_ids() {
        let s = store();
        assert_eq!(s.fetch_by_id(4).await.unwrap().map(|c| c.id), Some(4));
        assert!(s.fetch_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn accented_names_sort_with_their_base_letter() {
        let s = MemoryCardStore::from_records(
            vec![
                card(1, "Zombie", "LEA", Rarity::Common),
                card(2, "Æther Vial", "LEA", Rarity::Common),
                card(3, "Bear", "LEA", Rarity::Common),
            ],
            &["LEA"],
        );
        let hits = s.search(&SearchCriteria::default()).await.unwrap();
        let ids: Vec<i64> = hits.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn card_file_parses() {
        let s = MemoryCardStore::from_json(
            r#"{"sets": ["LEA"], "cards": [
                {"id": 1, "name": "Shivan Dragon", "set": "LEA", "rarity": "R",
                 "power": 5, "toughness": 5}
            ]}"#,
        )
        .unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn malformed_card_file_is_an_error() {
        let err = MemoryCardStore::from_json("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }
}
