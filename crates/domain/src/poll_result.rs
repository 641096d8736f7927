use std::collections::BTreeMap;

/// Payloads observed so far, keyed by artifact identifier.
///
/// Entries are only ever added: once an artifact has been observed it stays
/// observed for the rest of the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollResult {
    payloads: BTreeMap<String, String>,
}

impl PollResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `payload` for `id` unless a payload is already present.
    /// Returns `true` when the entry is new.
    pub fn record(&mut self, id: impl Into<String>, payload: impl Into<String>) -> bool {
        use std::collections::btree_map::Entry;
        match self.payloads.entry(id.into()) {
            Entry::Vacant(slot) => {
                slot.insert(payload.into());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.payloads.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.payloads.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.payloads.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.payloads.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl FromIterator<(String, String)> for PollResult {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut result = PollResult::new();
        for (id, payload) in iter {
            result.record(id, payload);
        }
        result
    }
}
