//! Import-command reporting against the Terraform state.
//!
//! After a rewrite the new standalone resources exist in configuration but
//! not in state; this module cross-references the produced-resource registry
//! with the persisted state and prints the `terraform import` commands that
//! close the gap.

mod reporter;
mod state_parser;

pub use reporter::ImportReporter;
pub use state_parser::{ClusterIdIndex, StateParser};
