use super::{StoreError, StringListStore};
use crate::api::Country;
use indexmap::IndexSet;

/// Store key the starred names live under.
pub const STARRED_KEY: &str = "starred-countries-info-names";

/// Names of the countries the user has starred, in the order they were
/// starred. Every mutation through [`StarredSet::toggle`] is persisted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StarredSet {
    names: IndexSet<String>,
}

impl StarredSet {
    /// Load from `store`; an absent key is an empty set.
    pub fn load(store: &dyn StringListStore) -> Result<Self, StoreError> {
        let names = store
            .get_string_list(STARRED_KEY)?
            .unwrap_or_default()
            .into_iter()
            .collect();
        Ok(Self { names })
    }

    pub fn save(&self, store: &mut dyn StringListStore) -> Result<(), StoreError> {
        let list: Vec<String> = self.names().map(String::from).collect();
        store.set_string_list(STARRED_KEY, &list)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn star(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn unstar(&mut self, name: &str) -> bool {
        self.names.shift_remove(name)
    }

    /// Flip membership of `name`, persist, and return the new membership.
    /// On a failed write the in-memory set is rolled back.
    pub fn toggle(&mut self, name: &str, store: &mut dyn StringListStore) -> Result<bool, StoreError> {
        let starred = if self.contains(name) {
            self.unstar(name);
            false
        } else {
            self.star(name);
            true
        };
        if let Err(e) = self.save(store) {
            if starred {
                self.unstar(name);
            } else {
                self.star(name);
            }
            return Err(e);
        }
        tracing::info!(name, starred, "toggled star");
        Ok(starred)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Keep the starred records, preserving the input order.
    pub fn filter(&self, records: &[Country]) -> Vec<Country> {
        records
            .iter()
            .filter(|c| self.contains(c.id()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::CountryName;
    use crate::store::{JsonFileStore, MemoryStore};
    use crate::view::pager::{advance, Pager};
    use std::num::NonZeroUsize;

    fn country(name: &str) -> Country {
        Country {
            name: CountryName {
                common: name.to_string(),
                ..CountryName::default()
            },
            ..Country::default()
        }
    }

    #[test]
    fn test_load_absent_is_empty() {
        let store = MemoryStore::default();
        let set = StarredSet::load(&store).unwrap();
        assert_eq!(set.names().count(), 0);
    }

    #[test]
    fn test_toggle_pair_restores_membership() {
        let mut store = MemoryStore::default();
        store
            .set_string_list(STARRED_KEY, &["Chile".into(), "Kenya".into()])
            .unwrap();
        let mut set = StarredSet::load(&store).unwrap();
        let original = set.clone();

        assert!(set.toggle("Nepal", &mut store).unwrap());
        assert!(StarredSet::load(&store).unwrap().contains("Nepal"));
        assert!(!set.toggle("Nepal", &mut store).unwrap());

        let reloaded = StarredSet::load(&store).unwrap();
        assert_eq!(reloaded, original);
        assert_eq!(set, original);

        assert!(!set.toggle("Chile", &mut store).unwrap());
        assert!(set.toggle("Chile", &mut store).unwrap());
        let names: Vec<_> = StarredSet::load(&store).unwrap().names().map(String::from).collect();
        assert_eq!(names, vec!["Kenya", "Chile"]);
    }

    #[test]
    fn test_filter_keeps_input_order() {
        let mut set = StarredSet::default();
        set.star("Peru");
        set.star("Chad");
        let records = vec![country("Chad"), country("Cuba"), country("Peru")];
        let names: Vec<_> = set.filter(&records).iter().map(|c| c.id().to_string()).collect();
        assert_eq!(names, vec!["Chad", "Peru"]);
    }

    #[test]
    fn test_starred_pages_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("store.json"));
        let records: Vec<Country> = (0..30).map(|i| country(&format!("Country {i:02}"))).collect();

        let mut set = StarredSet::load(&store).unwrap();
        for c in records.iter().take(25) {
            set.toggle(c.id(), &mut store).unwrap();
        }

        let set = StarredSet::load(&store).unwrap();
        let mut pager = Pager::new(NonZeroUsize::new(12).unwrap());
        pager.load(&set.filter(&records));
        let sizes: Vec<usize> = pager.pages().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![12, 12, 1]);

        let mut cursor = pager.cursor();
        for _ in 0..3 {
            cursor = advance(cursor, pager.page_count());
        }
        assert_eq!(cursor, 3);
        assert_eq!(advance(cursor, pager.page_count()), 3);
    }
}
