//! Lazy, replayable sequences and bounded slicing.
//!
//! A [`LazySequence`] pairs a producer (pulled at most once per element)
//! with an append-only cache. Enumeration replays the cache first and only
//! then advances the producer, so any number of iterators can walk the same
//! sequence, abandon it midway, and resume later from a fresh iterator.
//!
//! [`slice_lazy_iterable`] is the approximation boundary of the whole engine:
//! every report downstream is only as strong as the limits chosen here, and
//! every report carries the `truncated` flag it produces.

use crate::config::SliceConfig;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

/// Slice bound used when neither the caller nor the sequence supplies one.
pub const DEFAULT_SLICE_LIMIT: usize = 32;

/// What is known about the size of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Countability {
    /// Exactly this many elements.
    Finite(usize),
    /// Known to never end.
    CountablyInfinite,
    Unknown,
}

impl Countability {
    pub fn finite_size(self) -> Option<usize> {
        match self {
            Self::Finite(size) => Some(size),
            Self::CountablyInfinite | Self::Unknown => None,
        }
    }
}

/// A countability claim together with an already-known prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountabilityWitness<T> {
    pub countability: Countability,
    pub sample: Vec<T>,
}

impl<T> CountabilityWitness<T> {
    /// A finite witness whose sample is the whole sequence.
    pub fn finite(items: Vec<T>) -> Self {
        Self {
            countability: Countability::Finite(items.len()),
            sample: items,
        }
    }
}

struct Cache<T> {
    items: Vec<T>,
    /// `None` once the producer has reported exhaustion (or never existed).
    producer: Option<Box<dyn Iterator<Item = T>>>,
}

/// A possibly-infinite sequence with a growable replay cache.
///
/// Single-threaded: the cache lives behind a `RefCell`. A producer must not
/// enumerate the sequence it is producing for.
pub struct LazySequence<T> {
    cache: RefCell<Cache<T>>,
    countability: Countability,
}

impl<T> fmt::Debug for LazySequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.cache.borrow();
        f.debug_struct("LazySequence")
            .field("countability", &self.countability)
            .field("cached", &cache.items.len())
            .field("exhausted", &cache.producer.is_none())
            .finish()
    }
}

impl<T: Clone> LazySequence<T> {
    /// A finite sequence: the cache is the whole sequence.
    pub fn from_finite(items: Vec<T>) -> Self {
        Self::from_countability(CountabilityWitness::finite(items))
    }

    /// Seed the cache from a witness sample. Nothing is produced past it.
    pub fn from_countability(witness: CountabilityWitness<T>) -> Self {
        Self {
            cache: RefCell::new(Cache {
                items: witness.sample,
                producer: None,
            }),
            countability: witness.countability,
        }
    }

    /// Wrap an arbitrary producer. Countability is unknown until
    /// [`with_countability`](Self::with_countability) says otherwise.
    pub fn from_producer<I>(producer: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_parts(
            CountabilityWitness {
                countability: Countability::Unknown,
                sample: Vec::new(),
            },
            producer,
        )
    }

    /// A witness sample followed by whatever the producer yields after it.
    pub fn from_parts<I>(witness: CountabilityWitness<T>, producer: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self {
            cache: RefCell::new(Cache {
                items: witness.sample,
                producer: Some(Box::new(producer.into_iter())),
            }),
            countability: witness.countability,
        }
    }

    pub fn with_countability(mut self, countability: Countability) -> Self {
        self.countability = countability;
        self
    }

    pub fn countability(&self) -> Countability {
        self.countability
    }

    /// Restartable iterator: cached elements first, then fresh production.
    pub fn enumerate(&self) -> LazyIter<'_, T> {
        LazyIter {
            sequence: self,
            cursor: 0,
        }
    }

    /// Up to `limit` cached elements (all of them for `None`).
    ///
    /// Never forces the producer.
    pub fn replay(&self, limit: Option<usize>) -> Vec<T> {
        let cache = self.cache.borrow();
        let end = limit.map_or(cache.items.len(), |l| l.min(cache.items.len()));
        cache.items[..end].to_vec()
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.replay(None)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.borrow().items.len()
    }

    /// True once the producer is known to have nothing left.
    pub fn is_exhausted(&self) -> bool {
        self.cache.borrow().producer.is_none()
    }

    /// Element at `position`, producing at most one new element.
    ///
    /// Iterators only ask for a position past the cache when they sit exactly
    /// on its boundary, so the producer advances one step at a time.
    fn element_at(&self, position: usize) -> Option<T> {
        let mut cache = self.cache.borrow_mut();
        if position < cache.items.len() {
            return Some(cache.items[position].clone());
        }
        if position > cache.items.len() {
            return None;
        }
        let next = cache.producer.as_mut().and_then(|p| p.next());
        match next {
            Some(item) => {
                cache.items.push(item.clone());
                Some(item)
            }
            None => {
                cache.producer = None;
                None
            }
        }
    }
}

/// Cursor into a [`LazySequence`]'s cache.
pub struct LazyIter<'a, T> {
    sequence: &'a LazySequence<T>,
    cursor: usize,
}

impl<T> LazyIter<'_, T> {
    /// How many elements this iterator has yielded.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<T: Clone> Iterator for LazyIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.sequence.element_at(self.cursor)?;
        self.cursor += 1;
        Some(item)
    }
}

/// Bounds for one slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceOptions {
    /// Explicit limit; wins over everything else.
    pub limit: Option<usize>,
    /// Fallback when the sequence has no finite size.
    pub default_limit: Option<usize>,
}

impl SliceOptions {
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            default_limit: None,
        }
    }

    pub fn default_limit(default_limit: usize) -> Self {
        Self {
            limit: None,
            default_limit: Some(default_limit),
        }
    }
}

impl From<&SliceConfig> for SliceOptions {
    fn from(config: &SliceConfig) -> Self {
        Self::default_limit(config.default_limit)
    }
}

/// A bounded prefix of a sequence plus truncation accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceResult<T> {
    pub values: Vec<T>,
    /// The values may not cover the whole sequence.
    pub truncated: bool,
    pub limit: usize,
    pub consumed: usize,
}

impl<T> SliceResult<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Limit a slice would use for this sequence under `options`.
pub fn effective_limit<T: Clone>(sequence: &LazySequence<T>, options: SliceOptions) -> usize {
    options
        .limit
        .or(sequence.countability().finite_size())
        .or(options.default_limit)
        .unwrap_or(DEFAULT_SLICE_LIMIT)
}

/// Pull at most the effective limit of elements from `sequence`.
///
/// `truncated` is set whenever the slice cannot stand for the whole sequence:
/// a countably infinite source is always truncated, a finite one is truncated
/// when fewer than its declared size were pulled, and a source of unknown
/// size is truncated unless exhaustion was observed within the limit.
pub fn slice_lazy_iterable<T: Clone>(
    sequence: &LazySequence<T>,
    options: SliceOptions,
) -> SliceResult<T> {
    let limit = effective_limit(sequence, options);

    let mut values = Vec::new();
    let mut exhausted = false;
    let mut iter = sequence.enumerate();
    while values.len() < limit {
        match iter.next() {
            Some(value) => values.push(value),
            None => {
                exhausted = true;
                break;
            }
        }
    }

    let truncated = match sequence.countability() {
        Countability::Finite(size) => size > values.len(),
        Countability::CountablyInfinite => true,
        Countability::Unknown => {
            !exhausted && !(sequence.is_exhausted() && sequence.cached_len() <= limit)
        }
    };

    tracing::trace!(limit, consumed = values.len(), truncated, "sliced lazy sequence");

    SliceResult {
        consumed: values.len(),
        values,
        truncated,
        limit,
    }
}
