use std::fmt::Debug;

use serde::Serialize;
use tracing::{debug, trace};

/// Who owns the committed value, resolved once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "owner", content = "value", rename_all = "lowercase")]
pub enum ValueSource<V> {
    /// Uncontrolled: commits update the local value immediately.
    Owned(V),
    /// Controlled: the host re-supplies the value after each change.
    External(V),
}

/// Change notification produced by every commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change<F, V> {
    pub formatted: F,
    pub instants: V,
}

/// Canonical value holder with controlled/uncontrolled semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStore<V> {
    source: ValueSource<V>,
}

impl<V: Clone + Debug + PartialEq> ValueStore<V> {
    #[must_use]
    pub fn owned(initial: V) -> Self {
        Self {
            source: ValueSource::Owned(initial),
        }
    }

    #[must_use]
    pub fn external(initial: V) -> Self {
        Self {
            source: ValueSource::External(initial),
        }
    }

    #[must_use]
    pub fn source(&self) -> &ValueSource<V> {
        &self.source
    }

    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self.source, ValueSource::External(_))
    }

    #[must_use]
    pub fn read(&self) -> &V {
        match &self.source {
            ValueSource::Owned(value) | ValueSource::External(value) => value,
        }
    }

    /// Commits `next`.
    ///
    /// Owned stores adopt `next` right away; external stores stay untouched.
    /// The returned change must always be delivered to the host.
    pub fn commit<F: Debug>(&mut self, formatted: F, next: V) -> Change<F, V> {
        match &mut self.source {
            ValueSource::Owned(value) => {
                debug!(formatted = ?formatted, next = ?next, "commit owned value");
                *value = next.clone();
            }
            ValueSource::External(_) => {
                trace!(formatted = ?formatted, "commit forwarded to external owner");
            }
        }
        Change {
            formatted,
            instants: next,
        }
    }

    /// Replaces the value with one supplied by the external owner.
    ///
    /// Returns `false` (and leaves the value alone) for owned stores.
    pub fn supply(&mut self, value: V) -> bool {
        match &mut self.source {
            ValueSource::External(current) => {
                if *current != value {
                    debug!(value = ?value, "external value supplied");
                }
                *current = value;
                true
            }
            ValueSource::Owned(_) => {
                debug!("ignoring externally supplied value for an uncontrolled picker");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ValueSource, ValueStore};

    #[test]
    fn owned_commit_updates_immediately() {
        let mut store = ValueStore::owned(None::<u32>);
        let change = store.commit("a", Some(1));
        assert_eq!(change.instants, Some(1));
        assert_eq!(store.read(), &Some(1));
    }

    #[test]
    fn external_commit_only_notifies() {
        let mut store = ValueStore::external(Some(1_u32));
        let change = store.commit("b", Some(2));
        assert_eq!(change.formatted, "b");
        assert_eq!(change.instants, Some(2));
        assert_eq!(store.read(), &Some(1));

        assert!(store.supply(Some(2)));
        assert_eq!(store.source(), &ValueSource::External(Some(2)));
    }

    #[test]
    fn owned_store_ignores_supplied_values() {
        let mut store = ValueStore::owned(Some(1_u32));
        assert!(!store.supply(Some(5)));
        assert_eq!(store.read(), &Some(1));
    }
}
