use std::collections::{HashSet, VecDeque};

use crate::*;

type Depth = usize;

/// Estimated storage reachable from `root` within `config.max_depth` hops
pub fn subtree_size<S: HeapSource>(
    heap: &S,
    root: ObjectRef,
    config: &InspectConfig,
) -> Result<u64, MeminfoError> {
    forest_size(heap, &[root], config)
}

/// Like [`subtree_size`], but for several roots sharing one visited set
///
/// The walk is breadth-first so every object is first reached at its
/// shortest distance from a root; an object is counted once no matter how
/// many paths lead to it.
pub fn forest_size<S: HeapSource>(
    heap: &S,
    roots: &[ObjectRef],
    config: &InspectConfig,
) -> Result<u64, MeminfoError> {
    let mut visited: HashSet<ObjectRef> = HashSet::new();
    let mut queue: VecDeque<(ObjectRef, Depth)> = VecDeque::new();
    for &root in roots {
        if !heap.contains(root) {
            return Err(MeminfoError::UnknownObject(root));
        }
        if visited.insert(root) {
            queue.push_back((root, 0));
        }
    }
    let mut size: u64 = 0;
    while let Some((o, depth)) = queue.pop_front() {
        let metrics = match heap.metrics(o) {
            Ok(m) => m,
            Err(MeminfoError::UnsupportedCategory { .. }) if config.skip_unmeasured => {
                trace!("Skipping unmeasured {}", o);
                continue;
            }
            Err(e) => return Err(e),
        };
        size = metrics
            .storage_bytes()
            .and_then(|bytes| size.checked_add(bytes))
            .ok_or(MeminfoError::SizeOverflow(o))?;
        if depth == config.max_depth {
            continue;
        }
        heap.scan_referents(o, |child| {
            if visited.insert(child) {
                queue.push_back((child, depth + 1));
            }
        });
    }
    debug!(
        "{} objects reachable within {} hops, {} bytes",
        visited.len(),
        config.max_depth,
        size
    );
    Ok(size)
}
