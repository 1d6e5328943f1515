mod cycle;
mod fill;
mod total;
mod tree;

pub use cycle::{find_cycle, CycleReport, ReferrerFilter};
pub use fill::{mapping_fill, FillReport};
pub use total::aggregate_size;
pub use tree::{forest_size, subtree_size};
