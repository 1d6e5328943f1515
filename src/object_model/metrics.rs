use crate::{HeapObject, MeminfoError, ObjectKind, ObjectRef};

/// Raw per-object structural metrics of a container
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StructuralMetrics {
    Mapping {
        reference_count: u64,
        per_slot_overhead: u64,
        /// Allocated slot count minus one
        slot_mask: u64,
        fill_count: u64,
        shared_backing_store: bool,
    },
    /// Both fixed-length and resizable ordered containers
    Sequence {
        reference_count: u64,
        per_slot_overhead: u64,
        allocated_capacity: u64,
    },
}

impl StructuralMetrics {
    pub fn from_object(obj: &HeapObject) -> Result<Self, MeminfoError> {
        match obj.object_kind() {
            ObjectKind::Mapping => Ok(StructuralMetrics::Mapping {
                reference_count: obj.reference_count,
                per_slot_overhead: obj.per_slot_overhead,
                slot_mask: obj.slot_mask,
                fill_count: obj.fill_count,
                shared_backing_store: obj.shared_backing_store,
            }),
            ObjectKind::List | ObjectKind::Tuple => Ok(StructuralMetrics::Sequence {
                reference_count: obj.reference_count,
                per_slot_overhead: obj.per_slot_overhead,
                allocated_capacity: obj.allocated_capacity,
            }),
            kind => Err(MeminfoError::UnsupportedCategory {
                object: ObjectRef(obj.start),
                kind,
            }),
        }
    }

    /// Estimated bytes of backing storage, `None` if it does not fit a `u64`
    ///
    /// Shared mapping storage is counted by its owner, so it contributes
    /// nothing here.
    pub fn storage_bytes(&self) -> Option<u64> {
        match *self {
            StructuralMetrics::Mapping {
                per_slot_overhead,
                slot_mask,
                shared_backing_store,
                ..
            } => {
                if shared_backing_store {
                    Some(0)
                } else {
                    slot_mask.checked_add(1)?.checked_mul(per_slot_overhead)
                }
            }
            StructuralMetrics::Sequence {
                per_slot_overhead,
                allocated_capacity,
                ..
            } => allocated_capacity.checked_mul(per_slot_overhead),
        }
    }
}
