use crate::{HeapDump, ObjectKind};
use anyhow::{bail, Result};
use std::collections::HashSet;

/// Check that a heap dump describes a closed, well-formed graph
///
/// Returns the number of non-null edges verified.
pub fn sanity_check(heapdump: &HeapDump) -> Result<usize> {
    let mut known: HashSet<u64> = HashSet::new();
    for obj in &heapdump.objects {
        if obj.start == 0 {
            bail!("Object with a null address");
        }
        if !known.insert(obj.start) {
            bail!("Object 0x{:x} is dumped twice", obj.start);
        }
    }
    let mut edges = 0;
    for obj in &heapdump.objects {
        if obj.object_kind() == ObjectKind::Mapping {
            let Some(slots) = obj.slot_mask.checked_add(1) else {
                bail!("Mapping 0x{:x} has too many slots", obj.start);
            };
            if obj.fill_count > slots {
                bail!(
                    "Mapping 0x{:x} holds {} entries in {} slots",
                    obj.start,
                    obj.fill_count,
                    slots
                );
            }
        }
        for &child in &obj.referents {
            if child == 0 {
                continue;
            }
            if !known.contains(&child) {
                bail!("Object 0x{:x} refers to unknown 0x{:x}", obj.start, child);
            }
            edges += 1;
        }
    }
    Ok(edges)
}
