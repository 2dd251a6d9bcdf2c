//! Cluster resource decomposition.
//!
//! Splits one cluster block into a residual cluster declaration plus
//! standalone database and user resources wired back to the cluster through
//! an injected `cluster_id` reference.

use super::error::RewriteError;
use super::permissions::filter_grants;
use super::scanner::scan_block;
use super::tokens::{first_token, opens_block, scalar_assignment};
use super::types::{OwnershipIndex, ProducedResource};
use super::{database_kind_for, user_kind_for};

/// Output of decomposing one cluster block.
#[derive(Debug)]
pub struct Decomposition {
    /// Residual cluster followed by the promoted user and database blocks,
    /// each separated by a blank line.
    pub lines: Vec<String>,
    pub produced: Vec<ProducedResource>,
}

/// Split one cluster block into a residual cluster plus standalone database
/// and user resources.
pub fn decompose_cluster(
    cluster: &[String],
    ownership: &mut OwnershipIndex,
) -> Result<Decomposition, RewriteError> {
    let declaration = cluster.first().map(String::as_str).unwrap_or("");
    let (kind, name) = parse_header(declaration)?;

    let mut residual = Vec::new();
    let mut databases = Vec::new();
    let mut raw_users = Vec::new();
    let mut produced = Vec::new();

    let mut i = 0;
    while i < cluster.len() {
        let line = &cluster[i];

        match first_token(line) {
            Some("database") => {
                let (block, end) = scan_block(cluster, i)?;
                let (lines, resource) = extract_database(block, &kind, &name, ownership)?;
                databases.push(lines);
                produced.push(resource);
                i = end + 1;
            }
            Some("user") => {
                let (block, end) = scan_block(cluster, i)?;
                raw_users.push(block);
                i = end + 1;
            }
            _ => {
                residual.push(line.clone());
                i += 1;
            }
        }
    }

    // Users are resolved only after every database of the cluster has been
    // recorded, so grant trimming sees the complete owned set regardless of
    // where the user blocks sit in the source.
    let mut users = Vec::new();
    for block in raw_users {
        let (lines, resource) = extract_user(block, &kind, &name, ownership)?;
        users.push(lines);
        produced.push(resource);
    }

    let mut lines = residual;
    for block in users.into_iter().chain(databases) {
        lines.push(String::new());
        lines.extend(block);
    }

    Ok(Decomposition { lines, produced })
}

/// Parse resource kind and name from the quote-delimited tokens of a
/// declaration line.
fn parse_header(line: &str) -> Result<(String, String), RewriteError> {
    let parts: Vec<&str> = line.split('"').collect();

    if parts.len() < 5 {
        return Err(RewriteError::MalformedHeader {
            line: line.to_string(),
        });
    }

    Ok((parts[1].to_string(), parts[3].to_string()))
}

/// Strip the leading indentation of a nested block, measured as the column of
/// its keyword on the opening line.
fn dedent_to_keyword(block: Vec<String>, keyword: &str) -> Vec<String> {
    let prefix = block.first().and_then(|line| line.find(keyword)).unwrap_or(0);

    block
        .into_iter()
        .map(|line| line.get(prefix..).unwrap_or("").to_string())
        .collect()
}

/// Rewrite the block opener into a resource declaration and wire the new
/// resource back to its parent cluster.
fn promote_to_resource(
    body: &mut Vec<String>,
    resource_kind: &str,
    resource_name: &str,
    cluster_kind: &str,
    cluster_name: &str,
) {
    body[0] = format!("resource \"{}\" \"{}\" {{", resource_kind, resource_name);
    body.insert(
        1,
        format!("  cluster_id = {}.{}.id", cluster_kind, cluster_name),
    );
}

/// Turn a nested `database { … }` block into a standalone database resource.
fn extract_database(
    block: Vec<String>,
    cluster_kind: &str,
    cluster_name: &str,
    ownership: &mut OwnershipIndex,
) -> Result<(Vec<String>, ProducedResource), RewriteError> {
    let lines = dedent_to_keyword(block, "database");

    let mut name = None;
    let mut owner = None;
    let mut body = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];

        if opens_block(line, "extension") {
            // The standalone database schema has no extension grouping, so
            // the sub-block header and closer go away and its arguments are
            // hoisted in place. Hoisted lines are not scanned for attributes.
            let (extension, end) = scan_block(&lines, i)?;
            if extension.len() > 1 {
                body.extend(extension[1..extension.len() - 1].iter().cloned());
            }
            i = end + 1;
            continue;
        }

        if let Some(value) = scalar_assignment(line, "name") {
            name = Some(value.to_string());
        }
        if let Some(value) = scalar_assignment(line, "owner") {
            owner = Some(value.to_string());
        }

        body.push(line.clone());
        i += 1;
    }

    let (name, owner) = match (name, owner) {
        (Some(name), Some(owner)) => (name, owner),
        _ => {
            return Err(RewriteError::MissingAttribute {
                attribute: "database name/owner",
                cluster_kind: cluster_kind.to_string(),
                cluster_name: cluster_name.to_string(),
            });
        }
    };

    let resource_kind = database_kind_for(cluster_kind);
    let resource_name = format!("{}-{}", cluster_name, name);
    promote_to_resource(&mut body, resource_kind, &resource_name, cluster_kind, cluster_name);

    ownership.record(cluster_name, &owner, &name);

    let resource = ProducedResource {
        cluster_kind: cluster_kind.to_string(),
        cluster_name: cluster_name.to_string(),
        resource_kind: resource_kind.to_string(),
        resource_name,
        logical_name: name,
    };

    Ok((body, resource))
}

/// Turn a nested `user { … }` block into a standalone user resource.
fn extract_user(
    block: Vec<String>,
    cluster_kind: &str,
    cluster_name: &str,
    ownership: &OwnershipIndex,
) -> Result<(Vec<String>, ProducedResource), RewriteError> {
    let lines = dedent_to_keyword(block, "user");

    let mut name: Option<String> = None;
    let mut body = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];

        if opens_block(line, "permission") {
            let (permission, end) = scan_block(&lines, i)?;
            // A permission block ahead of the name assignment sees an empty
            // owned set; the input schema always orders name first.
            let owned: &[String] = match &name {
                Some(user) => ownership.owned_by(cluster_name, user),
                None => &[],
            };
            body.extend(filter_grants(&permission, owned));
            i = end + 1;
            continue;
        }

        if let Some(value) = scalar_assignment(line, "name") {
            name = Some(value.to_string());
        }

        body.push(line.clone());
        i += 1;
    }

    let name = name.ok_or_else(|| RewriteError::MissingAttribute {
        attribute: "user name",
        cluster_kind: cluster_kind.to_string(),
        cluster_name: cluster_name.to_string(),
    })?;

    let resource_kind = user_kind_for(cluster_kind);
    let resource_name = format!("{}-{}", cluster_name, name);
    promote_to_resource(&mut body, resource_kind, &resource_name, cluster_kind, cluster_name);

    let resource = ProducedResource {
        cluster_kind: cluster_kind.to_string(),
        cluster_name: cluster_name.to_string(),
        resource_kind: resource_kind.to_string(),
        resource_name,
        logical_name: name,
    };

    Ok((body, resource))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(|l| l.to_string()).collect()
    }

    fn decompose(text: &str) -> Decomposition {
        let mut ownership = OwnershipIndex::new();
        decompose_cluster(&lines(text), &mut ownership).unwrap()
    }

    const PG_CLUSTER: &str = r#"resource "yandex_mdb_postgresql_cluster" "main" {
  name        = "main"
  environment = "PRODUCTION"

  database {
    name  = "app"
    owner = "admin"

    extension {
      name = "pg_trgm"
    }
  }

  user {
    name = "admin"
    permission {
      database_name = "app"
    }
  }
}"#;

    #[test]
    fn test_residual_cluster_has_no_nested_databases_or_users() {
        let result = decompose(PG_CLUSTER);

        let residual_end = result
            .lines
            .iter()
            .position(|l| l.trim() == "}")
            .expect("residual cluster should close");
        let residual = &result.lines[..=residual_end];

        assert!(residual.iter().all(|l| first_token(l) != Some("database")));
        assert!(residual.iter().all(|l| first_token(l) != Some("user")));
        assert_eq!(residual[0], PG_CLUSTER.lines().next().unwrap());
    }

    #[test]
    fn test_produces_one_record_per_extracted_block() {
        let result = decompose(PG_CLUSTER);

        assert_eq!(result.produced.len(), 2);

        let database = &result.produced[0];
        assert_eq!(database.resource_kind, "yandex_mdb_postgresql_database");
        assert_eq!(database.resource_name, "main-app");
        assert_eq!(database.logical_name, "app");

        let user = &result.produced[1];
        assert_eq!(user.resource_kind, "yandex_mdb_postgresql_user");
        assert_eq!(user.resource_name, "main-admin");
        assert_eq!(user.logical_name, "admin");
    }

    #[test]
    fn test_cluster_id_follows_the_new_header() {
        let result = decompose(PG_CLUSTER);

        let header = "resource \"yandex_mdb_postgresql_database\" \"main-app\" {";
        let at = result.lines.iter().position(|l| l == header).unwrap();
        assert_eq!(
            result.lines[at + 1],
            "  cluster_id = yandex_mdb_postgresql_cluster.main.id"
        );
    }

    #[test]
    fn test_extension_block_is_flattened() {
        let result = decompose(PG_CLUSTER);

        assert!(result.lines.iter().all(|l| !l.contains("extension {")));
        assert!(result.lines.iter().any(|l| l.trim() == "name = \"pg_trgm\""));
        // The hoisted extension name does not clobber the database name
        assert_eq!(result.produced[0].logical_name, "app");
    }

    #[test]
    fn test_owned_grant_is_trimmed_from_user_permissions() {
        let result = decompose(PG_CLUSTER);

        assert!(
            result
                .lines
                .iter()
                .all(|l| !l.contains("database_name = \"app\""))
        );
    }

    #[test]
    fn test_user_before_database_still_gets_trimmed_grants() {
        let result = decompose(
            r#"resource "yandex_mdb_postgresql_cluster" "main" {
  user {
    name = "admin"
    permission {
      database_name = "app"
      database_name = "other"
    }
  }
  database {
    name  = "app"
    owner = "admin"
  }
}"#,
        );

        assert!(result.lines.iter().all(|l| !l.contains("= \"app\"") || l.contains("name  =")));
        assert!(
            result
                .lines
                .iter()
                .any(|l| l.contains("database_name = \"other\""))
        );
    }

    #[test]
    fn test_users_are_emitted_before_databases() {
        let result = decompose(PG_CLUSTER);

        let user_at = result
            .lines
            .iter()
            .position(|l| l.contains("yandex_mdb_postgresql_user"))
            .unwrap();
        let database_at = result
            .lines
            .iter()
            .position(|l| l.contains("yandex_mdb_postgresql_database"))
            .unwrap();
        assert!(user_at < database_at);
    }

    #[test]
    fn test_unrecognized_cluster_kind_maps_to_sentinel() {
        let result = decompose(
            r#"resource "yandex_mdb_clickhouse_cluster" "ch" {
  database {
    name  = "events"
    owner = "svc"
  }
}"#,
        );

        assert_eq!(result.produced[0].resource_kind, "unknown_db_resource");
        assert_eq!(result.produced[0].resource_name, "ch-events");
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        let mut ownership = OwnershipIndex::new();
        let err = decompose_cluster(&lines("resource \"only_kind\" {\n}"), &mut ownership)
            .unwrap_err();

        assert!(matches!(err, RewriteError::MalformedHeader { .. }));
    }

    #[test]
    fn test_database_without_owner_is_rejected() {
        let mut ownership = OwnershipIndex::new();
        let err = decompose_cluster(
            &lines(
                r#"resource "yandex_mdb_postgresql_cluster" "main" {
  database {
    name = "app"
  }
}"#,
            ),
            &mut ownership,
        )
        .unwrap_err();

        assert!(matches!(err, RewriteError::MissingAttribute { .. }));
    }

    #[test]
    fn test_user_without_name_is_rejected() {
        let mut ownership = OwnershipIndex::new();
        let err = decompose_cluster(
            &lines(
                r#"resource "yandex_mdb_postgresql_cluster" "main" {
  user {
    grants = []
  }
}"#,
            ),
            &mut ownership,
        )
        .unwrap_err();

        assert!(matches!(err, RewriteError::MissingAttribute { .. }));
    }
}
