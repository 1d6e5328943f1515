use crate::*;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, subcommand_precedence_over_arg = true)]
pub struct Args {
    #[arg(required = true)]
    pub paths: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug, Clone)]
pub struct CycleArgs {
    #[arg(short, long, value_parser = parse_address)]
    pub start: ObjectRef,
    #[arg(short = 'l', long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub search_limit: usize,
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
    /// Queue every referrer at most once
    #[arg(long, default_value_t = false)]
    pub dedup: bool,
    /// Objects the search must not walk through
    #[arg(long, value_parser = parse_address)]
    pub deny: Vec<ObjectRef>,
    /// Ignore frames executing code from this source file
    #[arg(long)]
    pub frame_source: Option<String>,
}

#[derive(Parser, Debug, Clone, Copy)]
pub struct TotalArgs {
    #[arg(short, long, value_enum)]
    pub category: Category,
}

#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    #[arg(short, long, required = true, value_parser = parse_address)]
    pub root: Vec<ObjectRef>,
    #[arg(short, long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    #[arg(long, default_value_t = false)]
    pub skip_unmeasured: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Cycle(CycleArgs),
    Total(TotalArgs),
    Tree(TreeArgs),
    Fill,
}

impl CycleArgs {
    pub fn config(&self) -> InspectConfig {
        InspectConfig {
            search_limit: self.search_limit,
            verbose: self.verbose,
            dedup_referrers: self.dedup,
            ..Default::default()
        }
    }

    pub fn filter(&self) -> ReferrerFilter {
        let mut filter = ReferrerFilter::new();
        for o in &self.deny {
            filter = filter.deny(*o);
        }
        if let Some(source) = &self.frame_source {
            filter = filter.deny_frames_from(source.clone());
        }
        filter
    }
}

impl TreeArgs {
    pub fn config(&self) -> InspectConfig {
        InspectConfig {
            max_depth: self.max_depth,
            skip_unmeasured: self.skip_unmeasured,
            ..Default::default()
        }
    }
}

/// Parse an object address, in hex with a `0x` prefix or in decimal
pub fn parse_address(s: &str) -> Result<ObjectRef, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    match parsed {
        Ok(0) => Err("address must not be null".to_string()),
        Ok(a) => Ok(ObjectRef(a)),
        Err(e) => Err(format!("invalid address {}: {}", s, e)),
    }
}
