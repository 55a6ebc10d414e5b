//! Name decomposition for the users table
//!
//! Splits `name` into `first_name` / `last_name` after stripping one
//! honorific prefix and one suffix, and preserves the original value under
//! `full_name`.

use crate::error::Result;
use crate::table::{Field, Table};

/// Honorific prefixes stripped before splitting. First match in list order
/// wins, applied once.
const PREFIXES: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Miss", "Mx", "Prof.", "Dr.", "Rev.", "Fr", "Lord", "Lady", "Sir",
    "Dame", "Capt.", "Col.", "Gen.", "Lt.", "Maj.", "Sgt.", "Cpl.", "Pvt.", "Adm.",
];

/// Name suffixes stripped before splitting, same single-application rule.
const SUFFIXES: &[&str] = &[
    "Jr.", "Sr.", "MD", "PhD", "DDS", "DVM", "DSc", "DPhil", "JD", "Esq.", "CPA", "CFA", "MBA",
    "LLB", "LLM", "BSc", "BA", "MA", "MSc", "PharmD", "EdD", "RN", "PE", "II", "III", "IV", "V",
];

/// Final column order for the users table after decomposition
const USERS_FINAL_COLUMNS: &[&str] = &[
    "user_id",
    "full_name",
    "first_name",
    "last_name",
    "email",
    "tier",
    "created_at",
];

/// Decompose the `name` column into `first_name` and `last_name`.
///
/// No-op when the table carries no `name` column. The original value is kept
/// verbatim under the renamed `full_name` column, and the table is reordered
/// to the final users projection.
pub fn decompose_names(table: &mut Table) -> Result<()> {
    let Some(name_idx) = table.column_index("name") else {
        return Ok(());
    };

    let mut first_names = Vec::with_capacity(table.len());
    let mut last_names = Vec::with_capacity(table.len());
    for row in table.rows() {
        let (first, last) = match row[name_idx].as_str() {
            Some(name) => split_name(name),
            None => (None, None),
        };
        first_names.push(first.map_or(Field::Null, Field::Str));
        last_names.push(last.map_or(Field::Null, Field::Str));
    }

    table.rename_column("name", "full_name");
    table.insert_column(name_idx + 1, "first_name", first_names);
    table.insert_column(name_idx + 2, "last_name", last_names);
    table.select_columns(USERS_FINAL_COLUMNS)?;
    Ok(())
}

/// Strip at most one prefix and one suffix, then split on whitespace:
/// first token becomes the first name, the rest join into the last name.
fn split_name(name: &str) -> (Option<String>, Option<String>) {
    let cleaned = strip_affixes(name);
    let mut parts = cleaned.split_whitespace();
    let first = parts.next().map(str::to_string);
    let rest: Vec<&str> = parts.collect();
    let last = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };
    (first, last)
}

fn strip_affixes(mut name: &str) -> &str {
    for prefix in PREFIXES {
        if name.len() > prefix.len() + 1
            && name.starts_with(prefix)
            && name.as_bytes()[prefix.len()] == b' '
        {
            name = &name[prefix.len() + 1..];
            break;
        }
    }
    for suffix in SUFFIXES {
        if name.len() > suffix.len() + 1
            && name.ends_with(suffix)
            && name.as_bytes()[name.len() - suffix.len() - 1] == b' '
        {
            name = &name[..name.len() - suffix.len() - 1];
            break;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_name() {
        assert_eq!(
            split_name("Jane Doe"),
            (Some("Jane".to_string()), Some("Doe".to_string()))
        );
    }

    #[test]
    fn test_split_strips_prefix_and_suffix_once() {
        assert_eq!(
            split_name("Dr. Jane Q. Public Jr."),
            (Some("Jane".to_string()), Some("Q. Public".to_string()))
        );
    }

    #[test]
    fn test_single_token_has_no_last_name() {
        assert_eq!(split_name("Plato"), (Some("Plato".to_string()), None));
    }

    #[test]
    fn test_prefix_requires_following_space() {
        // "Dr.X" is a name, not an honorific
        assert_eq!(split_name("Dr.X"), (Some("Dr.X".to_string()), None));
    }

    #[test]
    fn test_only_first_matching_affix_applies() {
        // "Sr." is stripped; the remaining "MD" stays because only one suffix
        // is removed per name
        assert_eq!(
            split_name("John Smith MD Sr."),
            (Some("John".to_string()), Some("Smith MD".to_string()))
        );
    }
}
