//! Store - the quote list and its persisted mirror.
//!
//! The store owns the ordered sequence of quotes. Every mutation (add,
//! import, merge, replace, remove) writes the whole sequence through the
//! injected [`Storage`] before returning.

use crate::{
    error::Result, quote::seed_quotes, reconcile::ConflictResolver, Error, Quote, QuoteId,
    ReconcileResult, Reconciler, Storage, Timestamp, LAST_SYNC_KEY, LOCAL_PREFIX, QUOTES_KEY,
    SELECTED_CATEGORY_KEY,
};
use rand::{seq::IndexedRandom, Rng};
use std::collections::HashMap;
use std::fmt;

/// How the store obtained its initial contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Quotes were read from storage
    Stored,
    /// Storage held nothing; the seed list was used
    Seeded,
    /// Stored value could not be read or parsed; the seed list was used
    Recovered(String),
}

/// The quote store.
pub struct QuoteStore {
    /// Quotes in insertion order
    quotes: Vec<Quote>,
    /// Position of each id in `quotes`
    index: HashMap<QuoteId, usize>,
    /// Persistence target
    storage: Box<dyn Storage>,
    /// How the initial contents were obtained
    load_outcome: LoadOutcome,
}

impl fmt::Debug for QuoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteStore")
            .field("quotes", &self.quotes.len())
            .field("load_outcome", &self.load_outcome)
            .finish_non_exhaustive()
    }
}

impl QuoteStore {
    /// Open a store backed by `storage`.
    ///
    /// Falls back to the seed list when nothing is stored or the stored
    /// value is unreadable. Nothing is written until the first mutation.
    pub fn open(storage: Box<dyn Storage>, now: Timestamp) -> Self {
        let (quotes, load_outcome) = match storage.get(QUOTES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Quote>>(&json) {
                Ok(quotes) => (quotes, LoadOutcome::Stored),
                Err(e) => (seed_quotes(now), LoadOutcome::Recovered(e.to_string())),
            },
            Ok(None) => (seed_quotes(now), LoadOutcome::Seeded),
            Err(e) => (seed_quotes(now), LoadOutcome::Recovered(e.to_string())),
        };

        let mut store = Self {
            quotes: Vec::with_capacity(quotes.len()),
            index: HashMap::new(),
            storage,
            load_outcome,
        };

        // Stored data may predate id uniqueness; re-key repeats on the way in
        for mut quote in quotes {
            if quote.id.is_empty() || store.index.contains_key(&quote.id) {
                quote.id = fresh_local_id(&store.index, now);
            }
            store.push(quote);
        }

        store
    }

    /// How the initial contents were obtained.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Validate user input for a new quote, returning the trimmed fields.
    pub fn validate_new<'s>(text: &'s str, category: &'s str) -> Result<(&'s str, &'s str)> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }
        Ok((text, category))
    }

    /// Add a user-submitted quote.
    pub fn add(&mut self, text: &str, category: &str, now: Timestamp) -> Result<&Quote> {
        let (text, category) = Self::validate_new(text, category)?;

        let id = fresh_local_id(&self.index, now);
        let mut next = self.quotes.clone();
        next.push(Quote::new(id, text, category, now));
        self.commit(next)?;

        Ok(&self.quotes[self.quotes.len() - 1])
    }

    /// Merge a remote batch using `resolver` and persist the result.
    pub fn merge(
        &mut self,
        remote: Vec<Quote>,
        resolver: &dyn ConflictResolver,
    ) -> Result<ReconcileResult> {
        let result = Reconciler::new(resolver).reconcile(&self.quotes, remote);
        self.commit(result.quotes.clone())?;

        Ok(result)
    }

    /// Append imported quotes in order.
    ///
    /// Quotes with an empty or already used id get a fresh local id.
    /// Returns the number of quotes appended.
    pub fn import(&mut self, quotes: Vec<Quote>, now: Timestamp) -> Result<usize> {
        let count = quotes.len();
        let mut next = self.quotes.clone();
        let mut taken = self.index.clone();

        for mut quote in quotes {
            if quote.id.is_empty() || taken.contains_key(&quote.id) {
                quote.id = fresh_local_id(&taken, now);
            }
            taken.insert(quote.id.clone(), next.len());
            next.push(quote);
        }
        self.commit(next)?;

        Ok(count)
    }

    /// Replace the quote with the same id wholesale.
    pub fn replace(&mut self, quote: Quote) -> Result<()> {
        let pos = self.position(&quote.id)?;

        let mut next = self.quotes.clone();
        next[pos] = quote;
        self.commit(next)
    }

    /// Edit text and category of an existing quote, stamping it with `now`.
    pub fn update(
        &mut self,
        id: &str,
        text: &str,
        category: &str,
        now: Timestamp,
    ) -> Result<&Quote> {
        let (text, category) = Self::validate_new(text, category)?;
        let pos = self.position(id)?;

        let mut next = self.quotes.clone();
        let quote = &mut next[pos];
        quote.text = text.to_string();
        quote.category = category.to_string();
        quote.timestamp = now;
        self.commit(next)?;

        Ok(&self.quotes[pos])
    }

    /// Remove a quote by id.
    pub fn remove(&mut self, id: &str) -> Result<Quote> {
        let pos = self.position(id)?;

        let mut next = self.quotes.clone();
        let removed = next.remove(pos);
        self.commit(next)?;

        Ok(removed)
    }

    /// All quotes in order.
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Get a quote by id.
    pub fn get(&self, id: &str) -> Option<&Quote> {
        self.index.get(id).map(|&pos| &self.quotes[pos])
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Check if the store holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for quote in &self.quotes {
            if !seen.contains(&quote.category.as_str()) {
                seen.push(quote.category.as_str());
            }
        }
        seen
    }

    /// Quotes in `category`, or all quotes when `None`.
    pub fn filter(&self, category: Option<&str>) -> Vec<&Quote> {
        match category {
            Some(category) => self
                .quotes
                .iter()
                .filter(|q| q.category == category)
                .collect(),
            None => self.quotes.iter().collect(),
        }
    }

    /// Pick a quote uniformly at random, optionally within one category.
    pub fn random<R: Rng + ?Sized>(&self, category: Option<&str>, rng: &mut R) -> Option<&Quote> {
        self.filter(category).choose(rng).copied()
    }

    /// The saved category filter.
    pub fn selected_category(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(SELECTED_CATEGORY_KEY)?
            .filter(|c| !c.is_empty()))
    }

    /// Save (or clear, with `None`) the category filter.
    pub fn set_selected_category(&mut self, category: Option<&str>) -> Result<()> {
        match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => self.storage.set(SELECTED_CATEGORY_KEY, category),
            None => self.storage.remove(SELECTED_CATEGORY_KEY),
        }
    }

    /// Timestamp of the last successful sync.
    pub fn last_sync(&self) -> Result<Option<Timestamp>> {
        Ok(self
            .storage
            .get(LAST_SYNC_KEY)?
            .and_then(|raw| raw.trim().parse().ok()))
    }

    /// Record a successful sync at `at`.
    pub fn record_sync(&mut self, at: Timestamp) -> Result<()> {
        self.storage.set(LAST_SYNC_KEY, &at.to_string())
    }

    /// Write the full sequence to storage.
    pub fn persist(&mut self) -> Result<()> {
        write_quotes(self.storage.as_mut(), &self.quotes)
    }

    /// Write `next` and adopt it only once storage accepted it.
    fn commit(&mut self, next: Vec<Quote>) -> Result<()> {
        write_quotes(self.storage.as_mut(), &next)?;
        self.quotes = next;
        self.rebuild_index();
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::QuoteNotFound(id.to_string()))
    }

    fn push(&mut self, quote: Quote) {
        self.index.insert(quote.id.clone(), self.quotes.len());
        self.quotes.push(quote);
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .quotes
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.clone(), i))
            .collect();
    }
}

fn write_quotes(storage: &mut dyn Storage, quotes: &[Quote]) -> Result<()> {
    let json = serde_json::to_string(quotes).map_err(|e| Error::Serialization(e.to_string()))?;
    storage.set(QUOTES_KEY, &json)
}

/// `local-<now>`, suffixed with `-<n>` when that id is taken.
fn fresh_local_id(taken: &HashMap<QuoteId, usize>, now: Timestamp) -> QuoteId {
    let base = format!("{LOCAL_PREFIX}{now}");
    if !taken.contains_key(&base) {
        return base;
    }
    (1u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains_key(candidate))
        .unwrap_or(base)
}
