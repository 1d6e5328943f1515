use std::collections::HashSet;

use crate::*;

/// Referrers the cycle search must not walk through
///
/// An embedding context lists its own bookkeeping objects here so that they
/// cannot close a cycle back to the start object.
#[derive(Debug, Default, Clone)]
pub struct ReferrerFilter {
    deny: HashSet<ObjectRef>,
    frame_source: Option<String>,
}

impl ReferrerFilter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn deny(mut self, o: ObjectRef) -> Self {
        self.deny.insert(o);
        self
    }

    /// Reject every frame object executing code from `source`
    pub fn deny_frames_from(mut self, source: impl Into<String>) -> Self {
        self.frame_source = Some(source.into());
        self
    }

    fn rejects<S: HeapSource>(&self, heap: &S, o: ObjectRef) -> bool {
        if self.deny.contains(&o) {
            return true;
        }
        match (self.frame_source.as_deref(), heap.frame_source(o)) {
            (Some(denied), Some(source)) => denied == source,
            _ => false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Objects taken off the search queue
    pub examined: usize,
    /// Objects put on the search queue, including the start object
    pub discovered: usize,
    /// Referrer levels completed
    pub depth: usize,
    /// The rediscovered start object first; each entry holds a reference to
    /// the next one and the last holds a reference to the start object.
    /// Empty when no cycle was found.
    pub cycle: Vec<ObjectRef>,
}

/// Breadth-first search up the referrer graph for a path back to `start`
///
/// Every queue slot records the slot it was discovered from, so the first
/// time the start object comes off the queue again the cycle can be read
/// back along those parent links. Unless `dedup_referrers` is set, an object
/// reachable along several paths is queued once per path; the search still
/// returns the first cycle in BFS order either way.
///
/// Running past `search_limit` is not an error: the report just carries an
/// empty cycle.
pub fn find_cycle<S: HeapSource>(
    heap: &S,
    start: ObjectRef,
    filter: &ReferrerFilter,
    config: &InspectConfig,
) -> Result<CycleReport, MeminfoError> {
    if !heap.contains(start) {
        return Err(MeminfoError::UnknownObject(start));
    }
    let mut search: Vec<ObjectRef> = vec![start];
    // parents[i] is the queue slot search[i] was discovered from
    let mut parents: Vec<usize> = vec![0];
    let mut seen: HashSet<ObjectRef> = HashSet::new();
    let mut count: usize = 0;
    let mut level: usize = 0;
    let mut next: usize = 1;

    while count < search.len() {
        if search.len() > config.search_limit {
            debug!(
                "Giving up the cycle search from {} after {} objects",
                start,
                search.len()
            );
            return Ok(CycleReport {
                examined: count,
                discovered: search.len(),
                depth: level,
                cycle: vec![],
            });
        }
        let o = search[count];
        if o == start && count > 0 {
            let mut cycle = vec![];
            let mut step = count;
            while step != 0 {
                cycle.push(search[step]);
                step = parents[step];
            }
            debug!("Found a cycle of {} objects through {}", cycle.len(), start);
            return Ok(CycleReport {
                examined: count,
                discovered: search.len(),
                depth: level,
                cycle,
            });
        }
        heap.scan_referrers(o, |r| {
            if filter.rejects(heap, r) {
                return;
            }
            if config.dedup_referrers && r != start && !seen.insert(r) {
                return;
            }
            search.push(r);
            parents.push(count);
        });
        count += 1;
        if count == next {
            level += 1;
            next = search.len();
            if config.verbose {
                info!("{}\t{}\t{}", count, next, level);
            }
        }
    }
    Ok(CycleReport {
        examined: count,
        discovered: search.len(),
        depth: level,
        cycle: vec![],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::graph;

    const A: ObjectRef = ObjectRef(0xa0);
    const B: ObjectRef = ObjectRef(0xb0);
    const C: ObjectRef = ObjectRef(0xc0);
    const D: ObjectRef = ObjectRef(0xd0);

    fn search(heap: &HeapSnapshot, start: ObjectRef) -> CycleReport {
        find_cycle(heap, start, &ReferrerFilter::new(), &InspectConfig::default()).unwrap()
    }

    #[test]
    fn test_two_cycle() {
        let heap = graph(&[(0xa0, &[0xb0]), (0xb0, &[0xa0])]);
        let report = search(&heap, A);
        assert_eq!(report.cycle, vec![A, B]);
        assert_eq!(report.examined, 2);
        assert_eq!(report.discovered, 3);
        assert_eq!(report.depth, 2);
    }

    #[test]
    fn test_acyclic_drains_queue() {
        // c -> b -> a
        let heap = graph(&[(0xa0, &[]), (0xb0, &[0xa0]), (0xc0, &[0xb0])]);
        let report = search(&heap, A);
        assert!(report.cycle.is_empty());
        assert_eq!(report.examined, report.discovered);
        assert_eq!(report.discovered, 3);
        assert_eq!(report.depth, 3);
    }

    #[test]
    fn test_cycle_through_branch() {
        // b -> a, c -> a, d -> c, a -> d
        let heap = graph(&[
            (0xa0, &[0xd0]),
            (0xb0, &[0xa0]),
            (0xc0, &[0xa0]),
            (0xd0, &[0xc0]),
        ]);
        let report = search(&heap, A);
        assert_eq!(report.cycle, vec![A, D, C]);
        assert_eq!(report.examined, 4);
        assert_eq!(report.discovered, 5);
        assert_eq!(report.depth, 3);
    }

    fn diamond() -> HeapSnapshot {
        // b -> a, c -> a, d -> b, d -> c, a -> d
        graph(&[
            (0xa0, &[0xd0]),
            (0xb0, &[0xa0]),
            (0xc0, &[0xa0]),
            (0xd0, &[0xb0, 0xc0]),
        ])
    }

    #[test]
    fn test_fan_in_is_queued_per_path() {
        let report = search(&diamond(), A);
        assert_eq!(report.cycle, vec![A, D, B]);
        assert_eq!(report.examined, 5);
        assert_eq!(report.discovered, 7);
        assert_eq!(report.depth, 3);
    }

    #[test]
    fn test_dedup_finds_same_cycle() {
        let config = InspectConfig {
            dedup_referrers: true,
            ..Default::default()
        };
        let report = find_cycle(&diamond(), A, &ReferrerFilter::new(), &config).unwrap();
        assert_eq!(report.cycle, vec![A, D, B]);
        assert_eq!(report.examined, 4);
        assert_eq!(report.discovered, 5);
        assert_eq!(report.depth, 3);
    }

    #[test]
    fn test_zero_limit() {
        let heap = graph(&[(0xa0, &[0xb0]), (0xb0, &[0xa0])]);
        let config = InspectConfig {
            search_limit: 0,
            ..Default::default()
        };
        let report = find_cycle(&heap, A, &ReferrerFilter::new(), &config).unwrap();
        assert_eq!(
            report,
            CycleReport {
                examined: 0,
                discovered: 1,
                depth: 0,
                cycle: vec![],
            }
        );
    }

    #[test]
    fn test_limit_exceeded() {
        let heap = graph(&[
            (0x10, &[]),
            (0x20, &[0x10]),
            (0x30, &[0x20]),
            (0x40, &[0x30]),
            (0x50, &[0x40]),
            (0x60, &[0x50]),
        ]);
        let config = InspectConfig {
            search_limit: 3,
            ..Default::default()
        };
        let report = find_cycle(&heap, ObjectRef(0x10), &ReferrerFilter::new(), &config).unwrap();
        assert!(report.cycle.is_empty());
        assert_eq!(report.examined, 3);
        assert_eq!(report.discovered, 4);
        assert!(report.discovered > config.search_limit);
    }

    #[test]
    fn test_denied_referrer() {
        let heap = graph(&[(0xa0, &[0xb0]), (0xb0, &[0xa0])]);
        let filter = ReferrerFilter::new().deny(B);
        let report = find_cycle(&heap, A, &filter, &InspectConfig::default()).unwrap();
        assert!(report.cycle.is_empty());
        assert_eq!(report.discovered, 1);
    }

    #[test]
    fn test_own_frames_filtered() {
        let heap = HeapSnapshot::new(HeapDump {
            objects: vec![
                HeapObject::mapping(0xa0, 24, 7, 1).with_referents(&[0xf0]),
                HeapObject::frame(0xf0, "tools/inspect.py").with_referents(&[0xa0]),
            ],
        });
        let unfiltered = search(&heap, A);
        assert_eq!(unfiltered.cycle, vec![A, ObjectRef(0xf0)]);

        let filter = ReferrerFilter::new().deny_frames_from("tools/inspect.py");
        let report = find_cycle(&heap, A, &filter, &InspectConfig::default()).unwrap();
        assert!(report.cycle.is_empty());

        let other = ReferrerFilter::new().deny_frames_from("app/main.py");
        let report = find_cycle(&heap, A, &other, &InspectConfig::default()).unwrap();
        assert_eq!(report.cycle, vec![A, ObjectRef(0xf0)]);
    }

    #[test]
    fn test_idempotent() {
        let heap = diamond();
        assert_eq!(search(&heap, A), search(&heap, A));
    }

    #[test]
    fn test_unknown_start() {
        let heap = graph(&[(0xa0, &[])]);
        let r = find_cycle(&heap, B, &ReferrerFilter::new(), &InspectConfig::default());
        assert_eq!(r, Err(MeminfoError::UnknownObject(B)));
    }
}
