use std::ops::{AddAssign, Deref};

use hashbrown::hash_map::HashMap;
use num_traits::Unsigned;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Counter<T>(T)
where
    T: Copy + Unsigned + AddAssign;

impl<T> Counter<T>
where
    T: Copy + Unsigned + AddAssign,
{
    #[inline]
    pub fn new(counter: T) -> Self {
        Self(counter)
    }

    #[inline]
    pub fn increment(&mut self) {
        self.0 += T::one();
    }
}

impl<T> Deref for Counter<T>
where
    T: Copy + Unsigned + AddAssign,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Occurrence count per term, i.e. a bag of words.
#[derive(Clone, Debug, Default)]
pub struct TermCounter {
    inner: HashMap<String, Counter<usize>>,
}

impl TermCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Self {
        let mut counter = Self::new();
        terms.iter().for_each(|term| counter.insert(term.as_ref()));
        counter
    }

    pub fn insert(&mut self, term: &str) {
        self.inner
            .entry_ref(term)
            .and_modify(Counter::increment)
            .or_insert_with(|| Counter::new(1));
    }

    /// Occurrences of `term`, zero when unseen.
    #[inline]
    pub fn get(&self, term: &str) -> usize {
        self.inner.get(term).map_or(0, |counter| **counter)
    }

    /// Number of distinct terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.inner
            .iter()
            .map(|(term, counter)| (term.as_str(), **counter))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}
