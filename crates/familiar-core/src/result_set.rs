use std::sync::Arc;

use crate::card::CardRecord;

/// Ordered, immutable query results for one screen instance.
///
/// Cloning is cheap; every clone shares the same records.
#[derive(Debug, Clone)]
pub struct ResultSet {
    records: Arc<[CardRecord]>,
}

impl ResultSet {
    pub fn new(records: Vec<CardRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&CardRecord> {
        self.records.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardRecord> {
        self.records.iter()
    }

    /// Card ids in result order.
    pub fn ids(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Position of the first record with `id`.
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
