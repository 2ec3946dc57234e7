//! Reconciliation of local quotes with a batch fetched from the server.
//!
//! # Algorithm
//!
//! 1. Start from a copy of the local sequence
//! 2. Walk the remote batch in order
//! 3. Unknown id: append the remote quote
//! 4. Known id: ask the [`ConflictResolver`] and replace in place if it says so
//!
//! Local-only quotes are never removed, so the output is never shorter than
//! the input. Remote quotes are matched against the working sequence, which
//! means duplicate ids inside one batch collapse into a single entry.

use crate::{Quote, QuoteId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of comparing a local quote with a remote quote of the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    /// Keep the quote already in the store
    KeepLocal,
    /// Overwrite it with the remote quote
    TakeRemote,
}

/// Decides which side of a same-id conflict survives.
pub trait ConflictResolver {
    fn resolve(&self, local: &Quote, remote: &Quote) -> Resolution;
}

impl<F> ConflictResolver for F
where
    F: Fn(&Quote, &Quote) -> Resolution,
{
    fn resolve(&self, local: &Quote, remote: &Quote) -> Resolution {
        self(local, remote)
    }
}

/// Built-in conflict resolution policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStrategy {
    /// Remote wins only with a strictly greater timestamp; ties keep local (default)
    #[default]
    LastWriteWins,
    /// Local copy is authoritative
    LocalWins,
    /// Remote copy is authoritative
    ServerWins,
}

impl ConflictResolver for MergeStrategy {
    fn resolve(&self, local: &Quote, remote: &Quote) -> Resolution {
        match self {
            MergeStrategy::LastWriteWins => {
                if remote.timestamp > local.timestamp {
                    Resolution::TakeRemote
                } else {
                    Resolution::KeepLocal
                }
            }
            MergeStrategy::LocalWins => Resolution::KeepLocal,
            MergeStrategy::ServerWins => Resolution::TakeRemote,
        }
    }
}

impl std::str::FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lastWriteWins" | "last-write-wins" => Ok(MergeStrategy::LastWriteWins),
            "localWins" | "local-wins" => Ok(MergeStrategy::LocalWins),
            "serverWins" | "server-wins" => Ok(MergeStrategy::ServerWins),
            other => Err(format!("unknown merge strategy: {other}")),
        }
    }
}

/// Result of reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResult {
    /// The merged sequence
    pub quotes: Vec<Quote>,
    /// Remote quotes appended because their id was unknown
    pub added: Vec<QuoteId>,
    /// Local quotes overwritten by a remote copy
    pub replaced: Vec<QuoteId>,
    /// Remote quotes that lost to the local copy
    pub kept_local: Vec<QuoteId>,
}

impl ReconcileResult {
    /// Whether the merge changed anything.
    pub fn is_changed(&self) -> bool {
        !self.added.is_empty() || !self.replaced.is_empty()
    }
}

/// Merges remote batches into a local sequence.
pub struct Reconciler<'a> {
    resolver: &'a dyn ConflictResolver,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler using the given resolver.
    pub fn new(resolver: &'a dyn ConflictResolver) -> Self {
        Self { resolver }
    }

    /// Merge `remote` into a copy of `local`.
    pub fn reconcile(&self, local: &[Quote], remote: Vec<Quote>) -> ReconcileResult {
        let mut quotes = local.to_vec();
        let mut index: HashMap<QuoteId, usize> = quotes
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.clone(), i))
            .collect();

        let mut added = Vec::new();
        let mut replaced = Vec::new();
        let mut kept_local = Vec::new();

        for incoming in remote {
            match index.get(&incoming.id) {
                None => {
                    index.insert(incoming.id.clone(), quotes.len());
                    added.push(incoming.id.clone());
                    quotes.push(incoming);
                }
                Some(&pos) => match self.resolver.resolve(&quotes[pos], &incoming) {
                    Resolution::TakeRemote => {
                        replaced.push(incoming.id.clone());
                        quotes[pos] = incoming;
                    }
                    Resolution::KeepLocal => kept_local.push(incoming.id),
                },
            }
        }

        ReconcileResult {
            quotes,
            added,
            replaced,
            kept_local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(id: &str, text: &str, ts: u64) -> Quote {
        Quote::new(id, text, "General", ts)
    }

    #[test]
    fn newer_remote_replaces_local() {
        let local = vec![quote("local-1", "A", 100)];
        let remote = vec![quote("local-1", "B", 200)];

        let result = Reconciler::new(&MergeStrategy::LastWriteWins).reconcile(&local, remote);

        assert_eq!(result.quotes, vec![quote("local-1", "B", 200)]);
        assert_eq!(result.replaced, vec!["local-1".to_string()]);
        assert!(result.added.is_empty());
    }

    #[test]
    fn unknown_remote_is_appended() {
        let remote = vec![quote("server-1", "X", 50)];

        let result = Reconciler::new(&MergeStrategy::LastWriteWins).reconcile(&[], remote);

        assert_eq!(result.quotes, vec![quote("server-1", "X", 50)]);
        assert_eq!(result.added, vec!["server-1".to_string()]);
    }

    #[test]
    fn equal_timestamp_keeps_local() {
        let local = vec![quote("server-1", "local text", 100)];
        let remote = vec![quote("server-1", "remote text", 100)];

        let result = Reconciler::new(&MergeStrategy::LastWriteWins).reconcile(&local, remote);

        assert_eq!(result.quotes[0].text, "local text");
        assert_eq!(result.kept_local, vec!["server-1".to_string()]);
        assert!(!result.is_changed());
    }

    #[test]
    fn older_remote_keeps_local() {
        let local = vec![quote("server-1", "new", 300)];
        let remote = vec![quote("server-1", "old", 100)];

        let result = Reconciler::new(&MergeStrategy::LastWriteWins).reconcile(&local, remote);

        assert_eq!(result.quotes, local);
    }

    #[test]
    fn local_only_quotes_survive() {
        let local = vec![quote("local-1", "A", 1), quote("local-2", "B", 2)];
        let remote = vec![quote("server-9", "Z", 9)];

        let result = Reconciler::new(&MergeStrategy::ServerWins).reconcile(&local, remote);

        let ids: Vec<_> = result.quotes.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["local-1", "local-2", "server-9"]);
    }

    #[test]
    fn duplicate_ids_in_batch_collapse() {
        let remote = vec![quote("server-1", "first", 10), quote("server-1", "second", 20)];

        let result = Reconciler::new(&MergeStrategy::LastWriteWins).reconcile(&[], remote);

        assert_eq!(result.quotes, vec![quote("server-1", "second", 20)]);
        assert_eq!(result.added, vec!["server-1".to_string()]);
        assert_eq!(result.replaced, vec!["server-1".to_string()]);
    }

    #[test]
    fn replacement_keeps_position() {
        let local = vec![quote("a", "1", 1), quote("b", "2", 1), quote("c", "3", 1)];
        let remote = vec![quote("b", "two", 5)];

        let result = Reconciler::new(&MergeStrategy::LastWriteWins).reconcile(&local, remote);

        assert_eq!(result.quotes[1].text, "two");
        assert_eq!(result.quotes.len(), 3);
    }

    #[test]
    fn local_wins_never_replaces() {
        let local = vec![quote("server-1", "mine", 1)];
        let remote = vec![quote("server-1", "theirs", 1000)];

        let result = Reconciler::new(&MergeStrategy::LocalWins).reconcile(&local, remote);

        assert_eq!(result.quotes[0].text, "mine");
    }

    #[test]
    fn server_wins_replaces_even_when_older() {
        let local = vec![quote("server-1", "mine", 1000)];
        let remote = vec![quote("server-1", "theirs", 1)];

        let result = Reconciler::new(&MergeStrategy::ServerWins).reconcile(&local, remote);

        assert_eq!(result.quotes[0].text, "theirs");
    }

    #[test]
    fn closure_resolver() {
        let longer_text_wins = |local: &Quote, remote: &Quote| {
            if remote.text.len() > local.text.len() {
                Resolution::TakeRemote
            } else {
                Resolution::KeepLocal
            }
        };
        let local = vec![quote("x", "short", 9)];
        let remote = vec![quote("x", "much longer", 1)];

        let result = Reconciler::new(&longer_text_wins).reconcile(&local, remote);

        assert_eq!(result.quotes[0].text, "much longer");
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!(
            "lastWriteWins".parse::<MergeStrategy>(),
            Ok(MergeStrategy::LastWriteWins)
        );
        assert_eq!(
            "server-wins".parse::<MergeStrategy>(),
            Ok(MergeStrategy::ServerWins)
        );
        assert!("coin-flip".parse::<MergeStrategy>().is_err());
    }

    #[test]
    fn strategy_serialization_format() {
        let json = serde_json::to_string(&MergeStrategy::LastWriteWins).unwrap();
        assert_eq!(json, r#""lastWriteWins""#);
    }
}
