use crate::*;

/// Occupancy of every live mapping, summed
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FillReport {
    /// Entries in use
    pub used: u64,
    /// Allocated slots
    pub slots: u64,
    /// Sum of the per-mapping `used / slots` ratios
    pub load_factor_sum: f64,
    pub mappings: u64,
}

impl FillReport {
    pub fn mean_load_factor(&self) -> Option<f64> {
        if self.mappings == 0 {
            None
        } else {
            Some(self.load_factor_sum / self.mappings as f64)
        }
    }
}

pub fn mapping_fill<S: HeapSource>(heap: &S) -> Result<FillReport, MeminfoError> {
    let mut report = FillReport::default();
    for o in heap.live_objects(Category::Mapping) {
        if let StructuralMetrics::Mapping {
            slot_mask,
            fill_count,
            ..
        } = heap.metrics(o)?
        {
            let overflow = MeminfoError::SizeOverflow(o);
            let slots = slot_mask.checked_add(1).ok_or(overflow.clone())?;
            report.used = report.used.checked_add(fill_count).ok_or(overflow.clone())?;
            report.slots = report.slots.checked_add(slots).ok_or(overflow)?;
            report.load_factor_sum += fill_count as f64 / slots as f64;
            report.mappings += 1;
        }
    }
    Ok(report)
}
