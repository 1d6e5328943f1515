use crate::*;

/// Estimated backing storage of every live object in `category`
///
/// Mappings whose slots live in shared storage contribute nothing, so the
/// result is a lower bound on the real footprint. An object without a size
/// rule fails the whole aggregation rather than silently biasing it.
pub fn aggregate_size<S: HeapSource>(heap: &S, category: Category) -> Result<u64, MeminfoError> {
    let mut total: u64 = 0;
    let mut objects = 0;
    for o in heap.live_objects(category) {
        total = heap
            .metrics(o)?
            .storage_bytes()
            .and_then(|bytes| total.checked_add(bytes))
            .ok_or(MeminfoError::SizeOverflow(o))?;
        objects += 1;
    }
    debug!("{:?}: {} bytes over {} objects", category, total, objects);
    Ok(total)
}
