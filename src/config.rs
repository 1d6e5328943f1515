pub const DEFAULT_SEARCH_LIMIT: usize = 10000;
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Knobs shared by the analyses, passed explicitly into every call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InspectConfig {
    /// The cycle search gives up once it has discovered more objects than this
    pub search_limit: usize,
    /// Referent hops from the root beyond which subtree walks stop counting
    pub max_depth: usize,
    /// Log a progress line whenever the cycle search finishes a level
    pub verbose: bool,
    /// Enqueue each referrer at most once during the cycle search
    pub dedup_referrers: bool,
    /// Count objects without a size rule as zero instead of failing
    pub skip_unmeasured: bool,
}

impl Default for InspectConfig {
    fn default() -> Self {
        InspectConfig {
            search_limit: DEFAULT_SEARCH_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
            verbose: false,
            dedup_referrers: false,
            skip_unmeasured: false,
        }
    }
}
