use std::fmt;

use crate::{MeminfoError, ObjectKind};
use clap::ValueEnum;

mod metrics;
pub use metrics::StructuralMetrics;

/// Handle to a live object, compared by identity (its address)
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct ObjectRef(pub u64);

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Which part of the live object population an enumeration selects
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum, Debug)]
#[clap(rename_all = "verbatim")]
pub enum Category {
    Mapping,
    /// Lists and tuples
    Sequence,
    List,
    Tuple,
}

impl Category {
    pub fn matches(self, kind: ObjectKind) -> bool {
        matches!(
            (self, kind),
            (Category::Mapping, ObjectKind::Mapping)
                | (Category::Sequence, ObjectKind::List)
                | (Category::Sequence, ObjectKind::Tuple)
                | (Category::List, ObjectKind::List)
                | (Category::Tuple, ObjectKind::Tuple)
        )
    }
}

/// A view of a runtime's object graph
///
/// Implementations answer the queries that need privileged access to the
/// runtime: what is alive, who points at whom, and how big the backing
/// storage of a container is. The analyses never mutate anything through
/// this interface.
///
/// Handles are only meaningful for the lifetime of the borrow they were
/// obtained under.
pub trait HeapSource {
    /// Live objects of a category, in a stable order
    fn live_objects(&self, category: Category) -> impl Iterator<Item = ObjectRef> + '_;
    /// Invoke `callback` for every object holding a reference to `o`
    fn scan_referrers<F>(&self, o: ObjectRef, callback: F)
    where
        F: FnMut(ObjectRef);
    /// Invoke `callback` for every object `o` holds a reference to
    fn scan_referents<F>(&self, o: ObjectRef, callback: F)
    where
        F: FnMut(ObjectRef);
    /// Fails with [`MeminfoError::UnsupportedCategory`] when the object's
    /// kind has no size rule
    fn metrics(&self, o: ObjectRef) -> Result<StructuralMetrics, MeminfoError>;
    fn kind(&self, o: ObjectRef) -> Option<ObjectKind>;
    /// For frame objects, the source file of the code being executed
    fn frame_source(&self, o: ObjectRef) -> Option<&str>;
    fn contains(&self, o: ObjectRef) -> bool {
        self.kind(o).is_some()
    }
}
