use crate::config::DEFAULT_INITIAL_CAPACITY;
use crate::Item;

/// Positional container that keeps items at the index given by their own id.
///
/// Capacity only ever doubles, so placement is O(1) amortized and the final
/// listing is a single ascending scan with no sort step. Callers sharing a
/// store between tasks must hold one lock across each `place` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultStore {
    slots: Vec<Option<Item>>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }
}

impl ResultStore {
    /// Creates an empty store. A zero capacity is bumped to one so doubling
    /// always makes progress.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Stores `item` at `index`, growing by doubling until the index fits.
    pub fn place(&mut self, index: usize, item: Item) {
        let mut capacity = self.slots.len();
        while index >= capacity {
            capacity *= 2;
        }
        if capacity > self.slots.len() {
            self.slots.resize(capacity, None);
        }
        self.slots[index] = Some(item);
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of placed items.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Placed items in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Item)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item)))
    }

    /// One formatted line per placed item, ascending; gaps are skipped.
    pub fn render(&self) -> String {
        self.iter().map(|(_, item)| item.render_line()).collect()
    }
}
