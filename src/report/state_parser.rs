use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::rewrite::is_cluster_kind;

/// Provider-assigned ids of recognized cluster resources, keyed by
/// `(kind, name)`. A key with a `None` id means the cluster is present in
/// state but none of its instances carries an id.
pub type ClusterIdIndex = HashMap<(String, String), Option<String>>;

/// Parses Terraform state files
pub struct StateParser {
    state_path: PathBuf,
}

impl StateParser {
    pub fn new(state_path: &Path) -> Self {
        Self {
            state_path: state_path.to_path_buf(),
        }
    }

    /// Parse the state file into a cluster id index
    pub fn parse(&self) -> Result<ClusterIdIndex> {
        let content = fs::read_to_string(&self.state_path)
            .with_context(|| format!("Failed to read state file: {}", self.state_path.display()))?;

        let state: Value =
            serde_json::from_str(&content).context("Failed to parse state file as JSON")?;

        Ok(Self::extract_cluster_ids(&state))
    }

    /// Record the id of the first instance that carries one, for every state
    /// entry whose type is a recognized cluster kind
    fn extract_cluster_ids(state: &Value) -> ClusterIdIndex {
        let mut index = ClusterIdIndex::new();

        if let Some(resources) = state.get("resources").and_then(|r| r.as_array()) {
            for resource in resources {
                let kind = resource.get("type").and_then(|t| t.as_str()).unwrap_or("");

                if !is_cluster_kind(kind) {
                    continue;
                }

                let name = resource.get("name").and_then(|n| n.as_str()).unwrap_or("");

                let mut id = None;
                if let Some(instances) = resource.get("instances").and_then(|i| i.as_array()) {
                    for instance in instances {
                        if let Some(instance_id) = instance
                            .get("attributes")
                            .and_then(|a| a.get("id"))
                            .and_then(|v| v.as_str())
                        {
                            id = Some(instance_id.to_string());
                            break;
                        }
                    }
                }

                index.insert((kind.to_string(), name.to_string()), id);
            }
        }

        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_cluster_ids() {
        let state = json!({
            "resources": [
                {
                    "type": "yandex_mdb_postgresql_cluster",
                    "name": "main",
                    "instances": [
                        { "attributes": { "id": "c9q1abc" } }
                    ]
                },
                {
                    "type": "yandex_compute_instance",
                    "name": "vm",
                    "instances": [
                        { "attributes": { "id": "fhm2xyz" } }
                    ]
                }
            ]
        });

        let index = StateParser::extract_cluster_ids(&state);

        assert_eq!(index.len(), 1);
        assert_eq!(
            index[&(
                "yandex_mdb_postgresql_cluster".to_string(),
                "main".to_string()
            )],
            Some("c9q1abc".to_string())
        );
    }

    #[test]
    fn test_first_instance_with_an_id_wins() {
        let state = json!({
            "resources": [
                {
                    "type": "yandex_mdb_mysql_cluster",
                    "name": "db1",
                    "instances": [
                        { "attributes": {} },
                        { "attributes": { "id": "c9qfirst" } },
                        { "attributes": { "id": "c9qsecond" } }
                    ]
                }
            ]
        });

        let index = StateParser::extract_cluster_ids(&state);

        assert_eq!(
            index[&("yandex_mdb_mysql_cluster".to_string(), "db1".to_string())],
            Some("c9qfirst".to_string())
        );
    }

    #[test]
    fn test_cluster_without_instance_ids_is_recorded_without_id() {
        let state = json!({
            "resources": [
                {
                    "type": "yandex_mdb_mysql_cluster",
                    "name": "db1",
                    "instances": []
                }
            ]
        });

        let index = StateParser::extract_cluster_ids(&state);

        assert_eq!(
            index[&("yandex_mdb_mysql_cluster".to_string(), "db1".to_string())],
            None
        );
    }

    #[test]
    fn test_state_without_resources_yields_empty_index() {
        let index = StateParser::extract_cluster_ids(&json!({ "version": 4 }));

        assert!(index.is_empty());
    }
}
