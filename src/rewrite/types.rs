use std::collections::HashMap;

/// A top-level resource synthesized from a nested cluster sub-block.
///
/// This is the join key the import reporter uses to tie the new resource back
/// to the cluster it was extracted from. Records are created once per
/// extracted block, accumulated across all files of a run, and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedResource {
    pub cluster_kind: String,
    pub cluster_name: String,
    pub resource_kind: String,
    /// Always `{cluster_name}-{logical_name}`.
    pub resource_name: String,
    /// Name of the database or user inside the cluster.
    pub logical_name: String,
}

/// Databases owned by each user, keyed by `(cluster name, owner name)`.
///
/// Populated while a cluster's database blocks are decomposed and consulted
/// while the same cluster's user blocks are decomposed, so every database of
/// a cluster must be recorded before its users are processed. Scoped to one
/// processing run; cluster names are assumed unique within the processed set.
#[derive(Debug, Default)]
pub struct OwnershipIndex {
    owned: HashMap<(String, String), Vec<String>>,
}

impl OwnershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `owner` owns `database` within `cluster_name`.
    pub fn record(&mut self, cluster_name: &str, owner: &str, database: &str) {
        self.owned
            .entry((cluster_name.to_string(), owner.to_string()))
            .or_default()
            .push(database.to_string());
    }

    /// Databases owned by `owner` within `cluster_name`, in recording order.
    pub fn owned_by(&self, cluster_name: &str, owner: &str) -> &[String] {
        self.owned
            .get(&(cluster_name.to_string(), owner.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_is_scoped_per_cluster() {
        let mut index = OwnershipIndex::new();
        index.record("main", "admin", "app");
        index.record("main", "admin", "billing");
        index.record("other", "admin", "legacy");

        assert_eq!(index.owned_by("main", "admin"), ["app", "billing"]);
        assert_eq!(index.owned_by("other", "admin"), ["legacy"]);
        assert!(index.owned_by("main", "nobody").is_empty());
    }
}
