//! Client-side query cache with reversible patches.
//!
//! This crate holds the read cache that the UI renders from and the
//! synchronizer mutates against. Entries are keyed by query identity
//! ([`QueryKey`]) and mutated only through [`Patch`] values applied via
//! [`CacheStore::apply`], which records the exact structural inverse of the
//! edit and returns it as an [`UndoHandle`].
//!
//! # Design
//!
//! Undo is structural, not snapshot-based: the inverse of an append is the
//! removal of that one entry, the inverse of a removal is reinsertion at the
//! recorded position. Two in-flight mutations therefore never clobber each
//! other's edits when one of them rolls back.
//!
//! Subscribers are notified synchronously on every write, patch, undo, and
//! invalidation. Staleness is tracked per key; [`CacheStore::invalidate`]
//! marks a key stale and leaves the refresh to the read side's policy.

mod key;
mod patch;
mod store;
mod value;

pub use key::QueryKey;
pub use patch::Patch;
pub use store::{CacheStore, SubscriptionId, UndoHandle};
pub use value::CachedValue;
