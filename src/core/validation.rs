//! Branch name validation
//!
//! New worktrees are named after their branch, so the name has to satisfy
//! git's reference rules before anything touches the repository.

use crate::constants::{
    FORBIDDEN_BRANCH_SEQUENCES, GIT_HEAD, GIT_REFS_PREFIX, SANITIZE_FALLBACK_NAME,
};
use crate::error::{GiwoError, Result};

/// Validates a candidate branch name
///
/// # Validation Rules
///
/// 1. **Non-empty**
/// 2. **No spaces**
/// 3. **No forbidden sequences**: `..`, `~`, `^`, `:`, `?`, `*`, `[`, `\`
/// 4. **No leading or trailing `-` or `.`**
/// 5. **Not `HEAD`** (case-insensitive)
/// 6. **No `refs/` prefix**
///
/// # Examples
///
/// ```rust
/// use giwo::core::validate_branch_name;
///
/// assert!(validate_branch_name("feature-auth").is_ok());
/// assert!(validate_branch_name("feature/login").is_ok());
///
/// assert!(validate_branch_name("feature..auth").is_err());
/// assert!(validate_branch_name("head").is_err());
/// assert!(validate_branch_name("-leading").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    let reject = |reason: &'static str| {
        Err(GiwoError::InvalidBranchName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return reject("name cannot be empty");
    }

    if name.contains(' ') {
        return reject("name cannot contain spaces");
    }

    if let Some(seq) = FORBIDDEN_BRANCH_SEQUENCES
        .iter()
        .find(|seq| name.contains(*seq))
    {
        return reject(forbidden_reason(seq));
    }

    if name.starts_with('-') || name.ends_with('-') {
        return reject("name cannot start or end with '-'");
    }

    if name.starts_with('.') || name.ends_with('.') {
        return reject("name cannot start or end with '.'");
    }

    if name.eq_ignore_ascii_case(GIT_HEAD) {
        return reject("'HEAD' is reserved");
    }

    if name.starts_with(GIT_REFS_PREFIX) {
        return reject("name cannot start with 'refs/'");
    }

    Ok(())
}

fn forbidden_reason(seq: &str) -> &'static str {
    match seq {
        ".." => "name cannot contain '..'",
        "~" => "name cannot contain '~'",
        "^" => "name cannot contain '^'",
        ":" => "name cannot contain ':'",
        "?" => "name cannot contain '?'",
        "*" => "name cannot contain '*'",
        "[" => "name cannot contain '['",
        _ => "name cannot contain '\\'",
    }
}

/// Normalizes an arbitrary string into a name accepted by [`validate_branch_name`]
///
/// Surrounding whitespace is trimmed, spaces and underscores become `-`,
/// forbidden sequences become `-`, and leading/trailing `-` and `.` are
/// stripped. A `refs/` prefix is dropped and a bare `HEAD` is replaced, so
/// the output always validates. An empty result becomes `unnamed-branch`.
///
/// ```rust
/// use giwo::core::sanitize_branch_name;
///
/// assert_eq!(sanitize_branch_name("  My Feature_1 "), "My-Feature-1");
/// assert_eq!(sanitize_branch_name("..~~"), "unnamed-branch");
/// ```
pub fn sanitize_branch_name(name: &str) -> String {
    let mut result = name.trim().replace([' ', '_'], "-");

    for seq in FORBIDDEN_BRANCH_SEQUENCES {
        result = result.replace(seq, "-");
    }

    let mut result = trim_edges(&result).to_string();

    while let Some(rest) = result.strip_prefix(GIT_REFS_PREFIX) {
        result = trim_edges(rest).to_string();
    }

    if result.is_empty() || result.eq_ignore_ascii_case(GIT_HEAD) {
        return SANITIZE_FALLBACK_NAME.to_string();
    }

    result
}

fn trim_edges(name: &str) -> &str {
    name.trim_matches(|c| c == '-' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("feature-auth" ; "hyphenated")]
    #[test_case("feature/login" ; "nested")]
    #[test_case("v1.2" ; "inner dot")]
    #[test_case("Head-start" ; "head prefix")]
    #[test_case("my-refs/x" ; "refs not at start")]
    #[test_case("日本語" ; "unicode")]
    fn test_validate_accepts(name: &str) {
        assert!(validate_branch_name(name).is_ok(), "{name} should be valid");
    }

    #[test_case("" ; "empty")]
    #[test_case("has space" ; "space")]
    #[test_case("feature..auth" ; "double dot")]
    #[test_case("a~b" ; "tilde")]
    #[test_case("a^b" ; "caret")]
    #[test_case("a:b" ; "colon")]
    #[test_case("a?b" ; "question mark")]
    #[test_case("a*b" ; "asterisk")]
    #[test_case("a[b" ; "bracket")]
    #[test_case("a\\b" ; "backslash")]
    #[test_case("-lead" ; "leading dash")]
    #[test_case("trail-" ; "trailing dash")]
    #[test_case(".hidden" ; "leading dot")]
    #[test_case("end." ; "trailing dot")]
    #[test_case("HEAD" ; "head")]
    #[test_case("head" ; "head lowercase")]
    #[test_case("refs/heads/x" ; "refs prefix")]
    fn test_validate_rejects(name: &str) {
        let err = validate_branch_name(name).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("invalid branch name"));
    }

    #[test]
    fn test_validate_reports_reason() {
        let err = validate_branch_name("feature..auth").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid branch name 'feature..auth': name cannot contain '..'"
        );
    }

    #[test_case("..~~", "unnamed-branch" ; "all forbidden")]
    #[test_case("", "unnamed-branch" ; "empty")]
    #[test_case("   ", "unnamed-branch" ; "whitespace")]
    #[test_case("my branch", "my-branch" ; "space")]
    #[test_case("snake_case", "snake-case" ; "underscore")]
    #[test_case("-.wrapped.-", "wrapped" ; "edges")]
    #[test_case("fix:bug*1", "fix-bug-1" ; "forbidden inside")]
    #[test_case("head", "unnamed-branch" ; "reserved head")]
    #[test_case("refs/heads/topic", "heads/topic" ; "refs prefix")]
    #[test_case("refs/refs/x", "x" ; "repeated refs prefix")]
    #[test_case("feature/login", "feature/login" ; "already valid")]
    fn test_sanitize(input: &str, expected: &str) {
        assert_eq!(sanitize_branch_name(input), expected);
    }

    proptest! {
        #[test]
        fn prop_sanitize_output_always_validates(s in any::<String>()) {
            let sanitized = sanitize_branch_name(&s);
            prop_assert!(validate_branch_name(&sanitized).is_ok(), "{:?} -> {:?}", s, sanitized);
        }

        #[test]
        fn prop_sanitize_keeps_valid_simple_names(s in "[a-z][a-z0-9/]{0,20}[a-z0-9]") {
            prop_assume!(!s.eq_ignore_ascii_case("head") && !s.starts_with("refs/"));
            prop_assert_eq!(sanitize_branch_name(&s), s);
        }
    }
}
