//! Structural rewriting of managed database cluster resources.
//!
//! This module is the core of the tool: a line-oriented, brace-depth rewriter
//! that promotes `database` and `user` sub-blocks nested inside a cluster
//! resource to independent top-level resources. It is deliberately not an HCL
//! parser — blocks are matched by net brace balance per line, and attributes
//! by whitespace token triples — so it shares the exact tolerance (and
//! fragility) of the configuration layouts it was written for.

mod cluster;
mod error;
mod permissions;
mod pipeline;
mod scanner;
mod tokens;
mod types;

pub use error::RewriteError;
pub use pipeline::DirectoryRewriter;
pub use types::{OwnershipIndex, ProducedResource};

/// Cluster resource kinds the rewriter recognizes.
pub const CLUSTER_KINDS: [&str; 2] = [
    "yandex_mdb_postgresql_cluster",
    "yandex_mdb_mysql_cluster",
];

/// True when `kind` is a recognized cluster resource kind.
pub fn is_cluster_kind(kind: &str) -> bool {
    CLUSTER_KINDS.iter().any(|cluster_kind| *cluster_kind == kind)
}

/// Standalone database resource kind for a cluster kind.
pub fn database_kind_for(cluster_kind: &str) -> &'static str {
    match cluster_kind {
        "yandex_mdb_postgresql_cluster" => "yandex_mdb_postgresql_database",
        "yandex_mdb_mysql_cluster" => "yandex_mdb_mysql_database",
        _ => "unknown_db_resource",
    }
}

/// Standalone user resource kind for a cluster kind.
pub fn user_kind_for(cluster_kind: &str) -> &'static str {
    match cluster_kind {
        "yandex_mdb_postgresql_cluster" => "yandex_mdb_postgresql_user",
        "yandex_mdb_mysql_cluster" => "yandex_mdb_mysql_user",
        _ => "unknown_user_resource",
    }
}
