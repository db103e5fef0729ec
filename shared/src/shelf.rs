use indexmap::IndexMap;

use crate::Recommendation;

/// Anything a confirmed delete can remove an item from.
pub trait Shelf {
    fn remove(&mut self, id: &str) -> Option<Recommendation>;
}

/// Recommendations in display order, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recommendations {
    entries: IndexMap<String, Recommendation>,
}

impl Recommendations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and take `books` in the order given.
    pub fn replace_all(&mut self, books: impl IntoIterator<Item = Recommendation>) {
        self.entries.clear();
        for book in books {
            self.entries.insert(book.id.clone(), book);
        }
    }

    /// Append unseen ids at the end; a known id keeps its position and takes
    /// the newer copy. Returns how many ids were new.
    pub fn merge(&mut self, books: impl IntoIterator<Item = Recommendation>) -> usize {
        let mut added = 0;
        for book in books {
            if let Some(slot) = self.entries.get_mut(&book.id) {
                *slot = book;
            } else {
                self.entries.insert(book.id.clone(), book);
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, id: &str) -> Option<&Recommendation> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.entries.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<Recommendation> {
        self.entries.values().cloned().collect()
    }
}

impl Shelf for Recommendations {
    fn remove(&mut self, id: &str) -> Option<Recommendation> {
        self.entries.shift_remove(id)
    }
}

impl FromIterator<Recommendation> for Recommendations {
    fn from_iter<I: IntoIterator<Item = Recommendation>>(iter: I) -> Self {
        let mut list = Self::new();
        list.replace_all(iter);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::book;

    #[test]
    fn merge_skips_known_ids_and_keeps_first_seen_order() {
        let mut list: Recommendations = [book("a"), book("b")].into_iter().collect();
        let added = list.merge([book("b"), book("c"), book("a"), book("d")]);
        assert_eq!(added, 2);
        assert_eq!(list.ids().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn merge_replaces_repeated_id_in_place() {
        let mut list: Recommendations = [book("a"), book("b")].into_iter().collect();
        let mut newer = book("a");
        newer.caption = "edited".into();
        list.merge([newer]);
        assert_eq!(list.ids().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(list.get("a").unwrap().caption, "edited");
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut list: Recommendations = [book("a"), book("b"), book("c")].into_iter().collect();
        assert!(list.remove("b").is_some());
        assert!(list.remove("zzz").is_none());
        assert_eq!(list.ids().collect::<Vec<_>>(), ["a", "c"]);
    }
}
