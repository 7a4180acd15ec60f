//! Flow Graph infrastructure

pub mod cfg_builder;
pub mod finalize;
pub mod reachability;

pub use cfg_builder::{build_cfg, CfgBuilder};
pub use finalize::{finalize, prune_unreachable};
pub use reachability::{reachable_from_entry, reaching_exit, CfgGraph};
