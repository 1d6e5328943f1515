//! Reference cycle search and container storage estimates over a dumped
//! object graph.

#[macro_use]
extern crate log;

pub mod analysis;
mod cli;
mod config;
mod error;
mod heapdump;
mod object_model;
mod sanity;
mod snapshot;

pub use crate::analysis::{
    aggregate_size, find_cycle, forest_size, mapping_fill, subtree_size, CycleReport, FillReport,
    ReferrerFilter,
};
pub use crate::cli::{parse_address, Args, Commands, CycleArgs, TotalArgs, TreeArgs};
pub use crate::config::{InspectConfig, DEFAULT_MAX_DEPTH, DEFAULT_SEARCH_LIMIT};
pub use crate::error::MeminfoError;
pub use crate::heapdump::{HeapDump, HeapObject, ObjectKind};
pub use crate::object_model::{Category, HeapSource, ObjectRef, StructuralMetrics};
pub use crate::sanity::sanity_check;
pub use crate::snapshot::HeapSnapshot;
