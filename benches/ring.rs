use harness::{bench, Bencher};
use meminfo::{
    find_cycle, CycleReport, HeapDump, HeapObject, HeapSnapshot, InspectConfig, ObjectRef,
    ReferrerFilter,
};

const RING: u64 = 4096;
const FAN_IN: u64 = 4;

/// A ring of mappings, each also referred to by a few leaf lists
fn ring() -> HeapSnapshot {
    let mut objects = vec![];
    for i in 0..RING {
        let start = (i + 1) * 0x100;
        let next = ((i + 1) % RING + 1) * 0x100;
        objects.push(HeapObject::mapping(start, 24, 7, 1).with_referents(&[next]));
        for j in 0..FAN_IN {
            objects.push(HeapObject::list(start + (j + 1) * 0x10, 8, 1).with_referents(&[start]));
        }
    }
    HeapSnapshot::new(HeapDump { objects })
}

#[bench]
fn ring_cycle(b: &Bencher) {
    let heap = ring();
    let config = InspectConfig {
        search_limit: usize::MAX,
        ..Default::default()
    };
    let mut report = CycleReport::default();
    b.time(|| {
        report = find_cycle(&heap, ObjectRef(0x100), &ReferrerFilter::new(), &config).unwrap();
    });
    assert_eq!(report.cycle.len() as u64, RING);
    b.add_stat("examined", report.examined as u64);
    b.add_stat("discovered", report.discovered as u64);
    b.add_stat("depth", report.depth as u64);
}
