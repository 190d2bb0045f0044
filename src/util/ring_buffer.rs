use crate::errors::BufferError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What `evict` does when asked to drop more values than are live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvictPolicy {
    /// Saturate the live count at zero.
    #[default]
    Clamp,
    /// Refuse the eviction and report `EvictUnderflow`.
    Strict,
}

impl EvictPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            EvictPolicy::Clamp  => "clamp",
            EvictPolicy::Strict => "strict",
        }
    }
}

/// Fixed-capacity ring of strings. Oldest entry is overwritten when full.
///
/// Evicted slots keep their bytes; only `live` decides what is visible.
#[derive(Debug, Default)]
pub struct RingStore {
    slots: Vec<String>,
    head: usize,
    live: usize,
    cap: usize,
    initialized: bool,
}

impl RingStore {
    /// An empty store with no capacity. `set_capacity` must run before data goes in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocate to exactly `cap` slots and forget everything stored so far.
    pub fn set_capacity(&mut self, cap: usize) {
        self.slots = vec![String::new(); cap];
        self.head = 0;
        self.live = 0;
        self.cap = cap;
        self.initialized = true;
    }

    /// Append `values` in order. Only the last `capacity` of them survive
    /// when the batch is larger than the store.
    pub fn append<I>(&mut self, values: I) -> Result<(), BufferError>
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        let requested = values.len();
        if !self.initialized {
            return Err(BufferError::NotInitialized);
        }
        if requested == 0 {
            return Ok(());
        }
        if self.cap == 0 {
            return Err(BufferError::ZeroCapacity { requested });
        }
        for val in values {
            self.push(val);
        }
        Ok(())
    }

    fn push(&mut self, val: String) {
        self.slots[self.head] = val;
        self.head = (self.head + 1) % self.cap;
        if self.live < self.cap {
            self.live += 1;
        }
    }

    /// Drop the `n` oldest live values. Cursor and slot contents are untouched.
    pub fn evict(&mut self, n: usize, policy: EvictPolicy) -> Result<(), BufferError> {
        if !self.initialized {
            return Err(BufferError::NotInitialized);
        }
        match policy {
            EvictPolicy::Clamp => self.live = self.live.saturating_sub(n),
            EvictPolicy::Strict => {
                if n > self.live {
                    return Err(BufferError::EvictUnderflow { requested: n, live: self.live });
                }
                self.live -= n;
            }
        }
        Ok(())
    }

    /// Live values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        // head - live, kept non-negative by adding cap first (live <= cap)
        let start = (self.head + self.cap - self.live) % self.cap.max(1);
        (0..self.live).map(move |i| self.slots[(start + i) % self.cap].as_str())
    }

    pub fn to_ordered_list(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    pub fn capacity(&self) -> usize { self.cap }
    pub fn len(&self) -> usize { self.live }
    pub fn is_empty(&self) -> bool { self.live == 0 }
    pub fn is_full(&self) -> bool { self.initialized && self.live == self.cap }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn store(cap: usize) -> RingStore {
        let mut s = RingStore::new();
        s.set_capacity(cap);
        s
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_store_is_empty_and_uninitialized() {
        let store = RingStore::new();
        assert!(store.is_empty());
        assert!(!store.is_full());
        assert_eq!(store.capacity(), 0);
        assert_eq!(store.to_ordered_list(), Vec::<String>::new());
    }

    #[test]
    fn append_within_capacity_keeps_order() {
        let mut store = store(3);
        store.append(strings(&["x1", "x2"])).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.to_ordered_list(), strings(&["x1", "x2"]));

        store.append(strings(&["x3"])).unwrap();
        assert!(store.is_full());
        assert_eq!(store.to_ordered_list(), strings(&["x1", "x2", "x3"]));
    }

    #[test]
    fn append_over_capacity_overwrites_oldest() {
        let mut store = store(3);
        store.append(strings(&["1", "2", "3", "4"])).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.to_ordered_list(), strings(&["2", "3", "4"]));

        store.append(strings(&["5"])).unwrap();
        assert_eq!(store.to_ordered_list(), strings(&["3", "4", "5"]));
    }

    #[test]
    fn single_batch_larger_than_capacity_keeps_tail() {
        let mut store = store(2);
        store.append(strings(&["a", "b", "c", "d", "e"])).unwrap();
        assert_eq!(store.to_ordered_list(), strings(&["d", "e"]));
    }

    #[test]
    fn evict_drops_oldest() {
        let mut store = store(3);
        store.append(strings(&["a", "b", "c"])).unwrap();
        store.evict(1, EvictPolicy::Clamp).unwrap();
        assert_eq!(store.to_ordered_list(), strings(&["b", "c"]));
    }

    #[test]
    fn evict_then_append_reuses_slots() {
        let mut store = store(3);
        store.append(strings(&["a", "b", "c"])).unwrap();
        store.evict(2, EvictPolicy::Clamp).unwrap();
        store.append(strings(&["d"])).unwrap();
        assert_eq!(store.to_ordered_list(), strings(&["c", "d"]));
    }

    #[test]
    fn evicted_slots_are_never_exposed() {
        let mut store = store(4);
        store.append(strings(&["old1", "old2"])).unwrap();
        store.evict(2, EvictPolicy::Clamp).unwrap();
        assert!(store.is_empty());
        store.append(strings(&["new"])).unwrap();
        assert_eq!(store.to_ordered_list(), strings(&["new"]));
    }

    #[test]
    fn clamp_policy_saturates_at_zero() {
        let mut store = store(2);
        store.append(strings(&["a"])).unwrap();
        store.evict(5, EvictPolicy::Clamp).unwrap();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn strict_policy_rejects_underflow_without_mutating() {
        let mut store = store(2);
        store.append(strings(&["a", "b"])).unwrap();
        let err = store.evict(3, EvictPolicy::Strict).unwrap_err();
        assert!(matches!(err, BufferError::EvictUnderflow { requested: 3, live: 2 }));
        assert_eq!(store.to_ordered_list(), strings(&["a", "b"]));

        store.evict(2, EvictPolicy::Strict).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn data_ops_before_capacity_are_reported() {
        let mut store = RingStore::new();
        assert!(matches!(store.append(strings(&["a"])), Err(BufferError::NotInitialized)));
        assert!(matches!(store.evict(1, EvictPolicy::Clamp), Err(BufferError::NotInitialized)));
    }

    #[test]
    fn zero_capacity_rejects_values_but_accepts_empty_batch() {
        let mut store = store(0);
        store.append(Vec::new()).unwrap();
        let err = store.append(strings(&["a", "b"])).unwrap_err();
        assert!(matches!(err, BufferError::ZeroCapacity { requested: 2 }));
        assert!(store.to_ordered_list().is_empty());
    }

    #[test]
    fn set_capacity_discards_previous_contents() {
        let mut store = store(2);
        store.append(strings(&["a", "b"])).unwrap();
        store.set_capacity(4);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 4);
    }

    #[test]
    fn listing_is_idempotent() {
        let mut store = store(3);
        store.append(strings(&["p", "q", "r", "s"])).unwrap();
        assert_eq!(store.to_ordered_list(), store.to_ordered_list());
    }

    #[derive(Debug, Clone)]
    enum Step {
        Append(Vec<String>),
        Evict(usize),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            prop::collection::vec("[a-z]{1,4}", 0..8).prop_map(Step::Append),
            (0usize..8).prop_map(Step::Evict),
        ]
    }

    proptest! {
        #[test]
        fn live_count_never_exceeds_capacity(cap in 1usize..6, steps in prop::collection::vec(step(), 0..32)) {
            let mut store = store(cap);
            for s in steps {
                match s {
                    Step::Append(v) => store.append(v).unwrap(),
                    Step::Evict(n)  => store.evict(n, EvictPolicy::Clamp).unwrap(),
                }
                prop_assert!(store.len() <= store.capacity());
                prop_assert_eq!(store.to_ordered_list().len(), store.len());
            }
        }

        #[test]
        fn listing_matches_tail_of_appends(cap in 1usize..6, values in prop::collection::vec("[a-z]{1,4}", 0..20)) {
            let mut store = store(cap);
            store.append(values.clone()).unwrap();
            let keep = values.len().min(cap);
            prop_assert_eq!(store.to_ordered_list(), values[values.len() - keep..].to_vec());
        }
    }
}
