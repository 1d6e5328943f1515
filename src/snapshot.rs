use std::collections::HashMap;

use crate::*;
use smallvec::SmallVec;

type Referrers = SmallVec<[ObjectRef; 4]>;

/// A [`HeapSource`] over a decoded heap dump
///
/// The dump only records outgoing edges, so the referrer index is built once
/// up front by inverting them. Referrers of an object are reported in dump
/// object order, which keeps every traversal deterministic.
pub struct HeapSnapshot {
    objects: Vec<HeapObject>,
    index: HashMap<u64, usize>,
    referrers: HashMap<u64, Referrers>,
}

impl HeapSnapshot {
    pub fn new(heapdump: HeapDump) -> Self {
        let objects = heapdump.objects;
        let index: HashMap<u64, usize> = objects
            .iter()
            .enumerate()
            .map(|(i, o)| (o.start, i))
            .collect();
        let mut referrers: HashMap<u64, Referrers> = HashMap::new();
        for obj in &objects {
            for &child in &obj.referents {
                if child == 0 {
                    continue;
                }
                // a referrer is reported once no matter how many slots hold the child
                let rs = referrers.entry(child).or_default();
                if rs.last() != Some(&ObjectRef(obj.start)) {
                    rs.push(ObjectRef(obj.start));
                }
            }
        }
        debug!(
            "Indexed {} objects, {} with referrers",
            objects.len(),
            referrers.len()
        );
        HeapSnapshot {
            objects,
            index,
            referrers,
        }
    }

    pub fn objects(&self) -> &[HeapObject] {
        &self.objects
    }

    fn get(&self, o: ObjectRef) -> Option<&HeapObject> {
        self.index.get(&o.0).map(|&i| &self.objects[i])
    }
}

impl HeapSource for HeapSnapshot {
    fn live_objects(&self, category: Category) -> impl Iterator<Item = ObjectRef> + '_ {
        self.objects
            .iter()
            .filter(move |o| category.matches(o.object_kind()))
            .map(|o| ObjectRef(o.start))
    }

    fn scan_referrers<F>(&self, o: ObjectRef, mut callback: F)
    where
        F: FnMut(ObjectRef),
    {
        if let Some(rs) = self.referrers.get(&o.0) {
            for r in rs {
                callback(*r);
            }
        }
    }

    fn scan_referents<F>(&self, o: ObjectRef, mut callback: F)
    where
        F: FnMut(ObjectRef),
    {
        if let Some(obj) = self.get(o) {
            for &child in &obj.referents {
                if child != 0 {
                    callback(ObjectRef(child));
                }
            }
        }
    }

    fn metrics(&self, o: ObjectRef) -> Result<StructuralMetrics, MeminfoError> {
        let obj = self.get(o).ok_or(MeminfoError::UnknownObject(o))?;
        StructuralMetrics::from_object(obj)
    }

    fn kind(&self, o: ObjectRef) -> Option<ObjectKind> {
        self.get(o).map(|obj| obj.object_kind())
    }

    fn frame_source(&self, o: ObjectRef) -> Option<&str> {
        self.get(o)
            .filter(|obj| obj.object_kind() == ObjectKind::Frame)
            .and_then(|obj| obj.frame_source.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> HeapSnapshot {
        HeapSnapshot::new(HeapDump {
            objects: vec![
                HeapObject::mapping(0x10, 24, 7, 2).with_referents(&[0x20, 0x30]),
                HeapObject::list(0x20, 8, 4).with_referents(&[0x30, 0, 0x30]),
                HeapObject::tuple(0x30, 8, 1).with_referents(&[0x10]),
                HeapObject::frame(0x40, "app/worker.py").with_referents(&[0x10]),
            ],
        })
    }

    fn referrers(s: &HeapSnapshot, o: u64) -> Vec<u64> {
        let mut v = vec![];
        s.scan_referrers(ObjectRef(o), |r| v.push(r.0));
        v
    }

    #[test]
    fn test_referrers_in_dump_order() {
        let s = snapshot();
        assert_eq!(referrers(&s, 0x10), vec![0x30, 0x40]);
        assert_eq!(referrers(&s, 0x30), vec![0x10, 0x20]);
        assert!(referrers(&s, 0x40).is_empty());
    }

    #[test]
    fn test_referents_skip_null() {
        let s = snapshot();
        let mut v = vec![];
        s.scan_referents(ObjectRef(0x20), |r| v.push(r.0));
        assert_eq!(v, vec![0x30, 0x30]);
    }

    #[test]
    fn test_live_objects() {
        let s = snapshot();
        let seqs: Vec<ObjectRef> = s.live_objects(Category::Sequence).collect();
        assert_eq!(seqs, vec![ObjectRef(0x20), ObjectRef(0x30)]);
        assert_eq!(s.live_objects(Category::Mapping).count(), 1);
    }

    #[test]
    fn test_frame_source() {
        let s = snapshot();
        assert_eq!(s.frame_source(ObjectRef(0x40)), Some("app/worker.py"));
        assert_eq!(s.frame_source(ObjectRef(0x10)), None);
        assert!(s.contains(ObjectRef(0x40)));
        assert!(!s.contains(ObjectRef(0x50)));
    }

    #[test]
    fn test_metrics_of_unknown_object() {
        let s = snapshot();
        assert_eq!(
            s.metrics(ObjectRef(0x50)),
            Err(MeminfoError::UnknownObject(ObjectRef(0x50)))
        );
    }
}
