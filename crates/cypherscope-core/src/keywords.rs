//! Keyword table shared by the parser and keyword completion.

/// All keywords offered by keyword completion, upper-cased.
pub const KEYWORDS: &[&str] = &[
    "ALL",
    "AND",
    "ANY",
    "AS",
    "ASC",
    "ASCENDING",
    "ASSERT",
    "BY",
    "CALL",
    "CASE",
    "COMMIT",
    "CONSTRAINT",
    "CONTAINS",
    "CREATE",
    "CSV",
    "DELETE",
    "DESC",
    "DESCENDING",
    "DETACH",
    "DISTINCT",
    "DROP",
    "ELSE",
    "END",
    "ENDS",
    "EXISTS",
    "EXPLAIN",
    "FALSE",
    "FIELDTERMINATOR",
    "FOREACH",
    "FROM",
    "HEADERS",
    "IN",
    "INDEX",
    "IS",
    "JOIN",
    "KEY",
    "LIMIT",
    "LOAD",
    "MATCH",
    "MERGE",
    "NONE",
    "NOT",
    "NULL",
    "ON",
    "OPTIONAL",
    "OR",
    "ORDER",
    "PERIODIC",
    "PROFILE",
    "REMOVE",
    "RETURN",
    "SCAN",
    "SET",
    "SINGLE",
    "SKIP",
    "START",
    "STARTS",
    "THEN",
    "TRUE",
    "UNION",
    "UNIQUE",
    "UNWIND",
    "USING",
    "WHEN",
    "WHERE",
    "WITH",
    "XOR",
    "YIELD",
];

/// Keywords that open a new top-level clause; body parsing stops at these.
pub(crate) const CLAUSE_KEYWORDS: &[&str] = &[
    "CALL", "CREATE", "DELETE", "DETACH", "DROP", "EXPLAIN", "FOREACH", "LIMIT", "LOAD", "MATCH",
    "MERGE", "OPTIONAL", "ORDER", "PROFILE", "REMOVE", "RETURN", "SET", "SKIP", "START", "UNION",
    "UNWIND", "USING", "WHERE", "WITH", "YIELD",
];

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

pub(crate) fn is_clause_keyword(word: &str) -> bool {
    CLAUSE_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert!(is_keyword("match"));
        assert!(is_keyword("Match"));
        assert!(is_keyword("YIELD"));
        assert!(!is_keyword("person"));
    }

    #[test]
    fn test_clause_keywords_are_keywords() {
        for clause in CLAUSE_KEYWORDS {
            assert!(is_keyword(clause), "{clause} missing from KEYWORDS");
        }
    }
}
