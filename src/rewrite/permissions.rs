//! Ownership-implies-access grant trimming.

use super::tokens::scalar_assignment;

/// Remove grant entries for databases the enclosing user already owns.
///
/// `block` is a full `permission { … }` block including its header and closing
/// line. One grant entry spans from a `database_name` assignment up to the
/// next one; inner lines ahead of the first assignment always survive, and
/// surviving entries keep their source order. When every entry is dropped the
/// whole block collapses to a single blank placeholder line so the rewritten
/// user body stays syntactically stable.
pub fn filter_grants(block: &[String], owned: &[String]) -> Vec<String> {
    if block.len() < 2 {
        return block.to_vec();
    }

    let header = &block[0];
    let closer = &block[block.len() - 1];
    let inner = &block[1..block.len() - 1];

    let mut kept = Vec::new();
    let mut dropping = false;

    for line in inner {
        if let Some(database) = scalar_assignment(line, "database_name") {
            dropping = owned.iter().any(|owned_db| owned_db == database);
        }

        if !dropping {
            kept.push(line.clone());
        }
    }

    if kept.is_empty() {
        return vec![String::new()];
    }

    let mut result = Vec::with_capacity(kept.len() + 2);
    result.push(header.clone());
    result.extend(kept);
    result.push(closer.clone());

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &[&str]) -> Vec<String> {
        text.iter().map(|l| l.to_string()).collect()
    }

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_owned_entry_is_dropped_with_its_trailing_lines() {
        let input = block(&[
            "permission {",
            "  database_name = \"app\"",
            "  roles         = [\"ALL\"]",
            "  database_name = \"reports\"",
            "  roles         = [\"SELECT\"]",
            "}",
        ]);

        let result = filter_grants(&input, &owned(&["app"]));
        assert_eq!(
            result,
            block(&[
                "permission {",
                "  database_name = \"reports\"",
                "  roles         = [\"SELECT\"]",
                "}",
            ])
        );
    }

    #[test]
    fn test_non_owned_grants_are_preserved_verbatim() {
        let input = block(&[
            "permission {",
            "  database_name = \"reports\"",
            "  database_name = \"audit\"",
            "}",
        ]);

        let result = filter_grants(&input, &owned(&["app"]));
        assert_eq!(result, input);
    }

    #[test]
    fn test_lines_before_first_grant_survive() {
        let input = block(&[
            "permission {",
            "  # grants",
            "  database_name = \"app\"",
            "}",
        ]);

        let result = filter_grants(&input, &owned(&["app"]));
        assert_eq!(result, block(&["permission {", "  # grants", "}"]));
    }

    #[test]
    fn test_fully_trimmed_block_collapses_to_placeholder() {
        let input = block(&[
            "permission {",
            "  database_name = \"app\"",
            "  roles         = [\"ALL\"]",
            "}",
        ]);

        let result = filter_grants(&input, &owned(&["app"]));
        assert_eq!(result, vec![String::new()]);
    }

    #[test]
    fn test_empty_body_collapses_to_placeholder() {
        let input = block(&["permission {", "}"]);

        let result = filter_grants(&input, &owned(&[]));
        assert_eq!(result, vec![String::new()]);
    }
}
