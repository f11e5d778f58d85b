//! Responder channels (publish/subscribe by channel name, chained reduction).
//!
//! A channel is a named broadcast point. Zero or more filters are registered
//! against a channel pattern at startup; applying a channel runs **every**
//! matching filter in order, each receiving the previous filter's output:
//!
//! ```text
//! seed → F1(seed) → F2(F1(seed)) → … → result
//! ```
//!
//! ## Ordering
//!
//! Filters run by ascending priority; equal priorities keep registration order.
//! The registry is frozen once built: nothing is added or removed while a
//! request is being dispatched.
//!
//! ## Wildcards
//!
//! A pattern ending in `/*` (e.g. `template/*`) matches every channel that
//! starts with the part before `*` (`template/landing`, `template/a/b`), but
//! not the bare prefix (`template`).

use std::sync::Arc;

use tracing::trace;

/// Priority used by `register` (lower runs first).
pub const DEFAULT_PRIORITY: i32 = 10;

/// A responder registered on a channel.
///
/// `V` is the value threaded through the channel, `C` the read-only context of
/// the current cycle.
pub trait Filter<V, C>: Send + Sync {
    fn apply(&self, value: V, ctx: &C) -> V;
}

impl<V, C, F> Filter<V, C> for F
where
    F: Fn(V, &C) -> V + Send + Sync,
{
    fn apply(&self, value: V, ctx: &C) -> V {
        self(value, ctx)
    }
}

/// Channel name matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPattern {
    /// Matches one channel name exactly.
    Exact(String),
    /// Matches any channel starting with the prefix (which ends in `/`).
    Prefix(String),
}

impl ChannelPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix('*') {
            Some(prefix) if prefix.ends_with('/') => Self::Prefix(prefix.to_string()),
            _ => Self::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, channel: &str) -> bool {
        match self {
            Self::Exact(name) => name == channel,
            Self::Prefix(prefix) => channel.len() > prefix.len() && channel.starts_with(prefix),
        }
    }
}

impl core::fmt::Display for ChannelPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

struct Registration<V, C> {
    pattern: ChannelPattern,
    priority: i32,
    filter: Arc<dyn Filter<V, C>>,
}

/// Startup-time collector of filter registrations.
pub struct FilterRegistryBuilder<V, C> {
    entries: Vec<Registration<V, C>>,
}

impl<V, C> Default for FilterRegistryBuilder<V, C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V, C> FilterRegistryBuilder<V, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `filter` on `pattern` with the default priority.
    pub fn register<F>(self, pattern: &str, filter: F) -> Self
    where
        F: Filter<V, C> + 'static,
    {
        self.register_with_priority(pattern, DEFAULT_PRIORITY, filter)
    }

    pub fn register_with_priority<F>(self, pattern: &str, priority: i32, filter: F) -> Self
    where
        F: Filter<V, C> + 'static,
    {
        self.register_shared(pattern, priority, Arc::new(filter))
    }

    /// Register an already shared filter (one instance on several channels).
    pub fn register_shared(
        mut self,
        pattern: &str,
        priority: i32,
        filter: Arc<dyn Filter<V, C>>,
    ) -> Self {
        self.entries.push(Registration {
            pattern: ChannelPattern::parse(pattern),
            priority,
            filter,
        });
        self
    }

    pub fn build(mut self) -> FilterRegistry<V, C> {
        // Stable: equal priorities keep registration order.
        self.entries.sort_by_key(|entry| entry.priority);
        FilterRegistry {
            entries: self.entries,
        }
    }
}

/// Immutable set of channel registrations.
pub struct FilterRegistry<V, C> {
    entries: Vec<Registration<V, C>>,
}

impl<V, C> Default for FilterRegistry<V, C> {
    fn default() -> Self {
        FilterRegistryBuilder::new().build()
    }
}

impl<V, C> core::fmt::Debug for FilterRegistry<V, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("patterns", &self.patterns())
            .finish()
    }
}

impl<V, C> FilterRegistry<V, C> {
    pub fn builder() -> FilterRegistryBuilder<V, C> {
        FilterRegistryBuilder::new()
    }

    /// Run every filter matching `channel`, threading `seed` through them.
    ///
    /// Returns `seed` unchanged when nothing is registered for the channel.
    pub fn apply(&self, channel: &str, seed: V, ctx: &C) -> V {
        let mut value = seed;
        let mut ran = 0usize;
        for entry in self.entries.iter().filter(|e| e.pattern.matches(channel)) {
            value = entry.filter.apply(value, ctx);
            ran += 1;
        }
        trace!(channel, filters = ran, "applied channel");
        value
    }

    pub fn has_filters(&self, channel: &str) -> bool {
        self.entries.iter().any(|e| e.pattern.matches(channel))
    }

    /// Number of filters that would run for `channel`.
    pub fn count(&self, channel: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.pattern.matches(channel))
            .count()
    }

    /// Registered patterns in execution order (for diagnostics).
    pub fn patterns(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.pattern.to_string()).collect()
    }
}
