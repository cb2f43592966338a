//! Field canonicalization applied before equality comparison.
//!
//! Only two normalization rules exist; every other field uses exact value
//! equality. Whitespace collapsing is deliberately dumb: no SQL parsing,
//! no semantic equivalence.

/// Collapse any run of whitespace to a single space and trim the ends.
///
/// Two SQL definitions that differ only in formatting compare equal after
/// this. Idempotent: normalizing twice yields the same string as once.
pub fn normalize_sql_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map a `pg_proc.provolatile` code to its keyword.
///
/// Unrecognized codes pass through unchanged rather than erroring; the
/// comparison still works, the report just shows the raw code.
pub fn map_volatility(code: &str) -> String {
    match code {
        "i" => "IMMUTABLE".to_string(),
        "s" => "STABLE".to_string(),
        "v" => "VOLATILE".to_string(),
        other => other.to_string(),
    }
}

/// Render a role list for a difference line.
///
/// Roles are compared as ordered sequences (exact sequence equality, not
/// set equality); this only formats them for the report.
pub fn format_roles(roles: &[String]) -> String {
    format!("[{}]", roles.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(
            normalize_sql_text("SELECT  1\n  FROM\t t"),
            "SELECT 1 FROM t"
        );
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_sql_text("  x  "), "x");
        assert_eq!(normalize_sql_text("   "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_sql_text("a\n\n  b\tc ");
        assert_eq!(normalize_sql_text(&once), once);
    }

    #[test]
    fn test_map_volatility_known_codes() {
        assert_eq!(map_volatility("i"), "IMMUTABLE");
        assert_eq!(map_volatility("s"), "STABLE");
        assert_eq!(map_volatility("v"), "VOLATILE");
    }

    #[test]
    fn test_map_volatility_unknown_passes_through() {
        assert_eq!(map_volatility("q"), "q");
        assert_eq!(map_volatility(""), "");
    }

    #[test]
    fn test_format_roles() {
        let roles = vec!["anon".to_string(), "authenticated".to_string()];
        assert_eq!(format_roles(&roles), "[anon,authenticated]");
        assert_eq!(format_roles(&[]), "[]");
    }
}
