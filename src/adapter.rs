use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{BenchError, FlatMap, SplitMap};

/// Capability surface every container kind under test must provide.
///
/// Iteration is always in ascending key order. Equality is pairwise over
/// (key, value) entries and ignores how the container stores them.
pub trait OrderedMap<K, V>: Default + Clone + PartialEq {
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Insert `key`, replacing the value if the key is already present.
    fn insert_or_update(&mut self, key: K, value: V);

    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Self::Iter<'_>;

    /// Absorb every entry of `other`. On a duplicate key the receiver's
    /// value is kept and the donor's entry is dropped.
    fn merge(&mut self, other: Self);

    /// Insert a range of entries, keeping existing values on duplicate keys.
    fn bulk_insert<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (K, V)>;

    fn union_with(&mut self, other: Self, strategy: UnionStrategy)
    where
        K: Clone,
        V: Clone,
    {
        match strategy {
            UnionStrategy::Merge => self.merge(other),
            UnionStrategy::BulkInsert => self.bulk_insert(
                other
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<Vec<_>>(),
            ),
        }
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> OrderedMap<K, V> for BTreeMap<K, V> {
    type Iter<'a>
        = btree_map::Iter<'a, K, V>
    where
        Self: 'a;

    fn insert_or_update(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        BTreeMap::iter(self)
    }

    fn merge(&mut self, other: Self) {
        // `append` lets the donor win, so strip collisions first.
        let mut other = other;
        other.retain(|k, _| !self.contains_key(k));
        self.append(&mut other);
    }

    fn bulk_insert<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in items {
            self.entry(k).or_insert(v);
        }
    }
}

/// How the merge suite combines its two operands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnionStrategy {
    #[default]
    Merge,
    BulkInsert,
}

impl UnionStrategy {
    pub fn name(self) -> &'static str {
        match self {
            UnionStrategy::Merge => "merge",
            UnionStrategy::BulkInsert => "bulk-insert",
        }
    }
}

impl FromStr for UnionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(UnionStrategy::Merge),
            "bulk-insert" | "bulk_insert" | "insert" => Ok(UnionStrategy::BulkInsert),
            other => Err(format!("unknown union strategy: {other}")),
        }
    }
}

/// Runtime selector over the concrete container kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MapKind {
    StdMap,
    FlatMap,
    SplitMap,
}

/// Generic measurement code, instantiated for a concrete map type by
/// [`MapKind::dispatch`].
pub trait MapVisitor<K, V> {
    type Output;

    fn visit<M: OrderedMap<K, V>>(self, kind: MapKind) -> Self::Output;
}

impl MapKind {
    pub const ALL: [MapKind; 3] = [MapKind::StdMap, MapKind::FlatMap, MapKind::SplitMap];

    pub fn name(self) -> &'static str {
        match self {
            MapKind::StdMap => "std_map",
            MapKind::FlatMap => "flat_map",
            MapKind::SplitMap => "split_map",
        }
    }

    /// Human-readable label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            MapKind::StdMap => "std BTreeMap",
            MapKind::FlatMap => "flat_map",
            MapKind::SplitMap => "split_map",
        }
    }

    /// File name of this kind's result stream.
    pub fn file_name(self) -> String {
        format!("{}.py", self.name())
    }

    pub fn dispatch<K, V, T>(self, visitor: T) -> T::Output
    where
        K: Ord + Clone,
        V: Clone + PartialEq,
        T: MapVisitor<K, V>,
    {
        match self {
            MapKind::StdMap => visitor.visit::<BTreeMap<K, V>>(self),
            MapKind::FlatMap => visitor.visit::<FlatMap<K, V>>(self),
            MapKind::SplitMap => visitor.visit::<SplitMap<K, V>>(self),
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MapKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BenchError::UnknownKind(s.to_string()))
    }
}
