use crate::output;
use crate::rewrite::ProducedResource;

use super::state_parser::ClusterIdIndex;

/// Prints the `terraform import` commands that reconcile state after a
/// rewrite
pub struct ImportReporter {
    cluster_ids: ClusterIdIndex,
}

impl ImportReporter {
    pub fn new(cluster_ids: ClusterIdIndex) -> Self {
        Self { cluster_ids }
    }

    /// Emit one import command per produced resource whose parent cluster id
    /// is known; unmatched clusters get a diagnostic line instead.
    pub fn report(&self, produced: &[ProducedResource]) {
        let (commands, missing) = self.commands(produced);

        for diagnostic in &missing {
            output::warning(diagnostic);
        }

        output::section("Terraform commands to apply changes");
        for command in &commands {
            output::command(command);
        }
    }

    /// Build the command list and the diagnostics for clusters whose id is
    /// absent from state. Commands are never executed, only printed.
    fn commands(&self, produced: &[ProducedResource]) -> (Vec<String>, Vec<String>) {
        let mut commands = Vec::new();
        let mut missing = Vec::new();

        for resource in produced {
            let key = (
                resource.cluster_kind.clone(),
                resource.cluster_name.clone(),
            );
            let cluster_id = self
                .cluster_ids
                .get(&key)
                .and_then(|id| id.as_deref())
                .filter(|id| !id.is_empty());

            match cluster_id {
                Some(cluster_id) => commands.push(format!(
                    "terraform import {} {}:{}",
                    resource.resource_kind, cluster_id, resource.logical_name
                )),
                None => missing.push(format!(
                    "{} {} id is not found for new resource {}.{}",
                    resource.cluster_kind,
                    resource.cluster_name,
                    resource.resource_kind,
                    resource.resource_name
                )),
            }
        }

        (commands, missing)
    }
}
