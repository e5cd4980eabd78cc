use std::cmp::Ordering;

/// Case-insensitive substring test over short strings.
///
/// Folding is byte-wise ASCII tolower; no locale or Unicode normalization.
/// The edge semantics mirror a forward search over the haystack range:
///
/// - an empty haystack never matches, even against an empty needle
/// - an empty needle matches any non-empty haystack
/// - a needle longer than the haystack never matches
///
/// Callers that want "empty match string means print everything" must
/// special-case that before calling in, because several catalogs route an
/// empty match string to a different (unfiltered) print path.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();

    if hay.is_empty() {
        return false;
    }
    if pat.is_empty() {
        return true;
    }
    if pat.len() > hay.len() {
        return false;
    }

    // Scan for either case of the leading byte, then verify the rest.
    let lower = pat[0].to_ascii_lowercase();
    let upper = pat[0].to_ascii_uppercase();
    let limit = hay.len() - pat.len();

    let mut pos = 0;
    while pos <= limit {
        match memchr::memchr2(lower, upper, &hay[pos..=limit]) {
            Some(offset) => {
                let start = pos + offset;
                if hay[start..start + pat.len()].eq_ignore_ascii_case(pat) {
                    return true;
                }
                pos = start + 1;
            }
            None => return false,
        }
    }

    false
}

/// ASCII case-insensitive total ordering, used as a sort tie-breaker.
pub fn cmp_ignore_ascii_case(lhs: &str, rhs: &str) -> Ordering {
    let lhs = lhs.bytes().map(|b| b.to_ascii_lowercase());
    let rhs = rhs.bytes().map(|b| b.to_ascii_lowercase());
    lhs.cmp(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_match() {
        assert!(contains_ci("fFloraBushRange", "flora"));
        assert!(contains_ci("flora", "flora"));
        assert!(contains_ci("xflorax", "FLORA"));
    }

    #[test]
    fn test_case_folding() {
        assert!(contains_ci("FFLORABUSHRANGE", "fflora"));
        assert!(contains_ci("fflorabushrange", "FFLORA"));
        assert!(contains_ci("MiXeDcAsE", "mixedcase"));
    }

    #[test]
    fn test_no_match() {
        assert!(!contains_ci("settings", "flora"));
        assert!(!contains_ci("flor", "flora"));
    }

    #[test]
    fn test_empty_haystack_never_matches() {
        assert!(!contains_ci("", ""));
        assert!(!contains_ci("", "a"));
    }

    #[test]
    fn test_empty_needle_matches_nonempty() {
        assert!(contains_ci("a", ""));
        assert!(contains_ci("anything", ""));
    }

    #[test]
    fn test_needle_longer_than_haystack() {
        assert!(!contains_ci("ab", "abc"));
    }

    #[test]
    fn test_match_at_tail() {
        assert!(contains_ci("WeatherStorm", "storm"));
        assert!(contains_ci("x", "X"));
    }

    #[test]
    fn test_non_alphabetic_leading_byte() {
        assert!(contains_ci("pre_fix_post", "_fix_"));
        assert!(contains_ci("a0b1c2", "0b1"));
    }

    #[test]
    fn test_repeated_leading_byte() {
        // First candidate fails, a later one succeeds.
        assert!(contains_ci("aabaac", "aac"));
    }

    #[test]
    fn test_cmp_ignore_ascii_case() {
        assert_eq!(cmp_ignore_ascii_case("abc", "ABC"), Ordering::Equal);
        assert_eq!(cmp_ignore_ascii_case("abc", "abd"), Ordering::Less);
        assert_eq!(cmp_ignore_ascii_case("B", "a"), Ordering::Greater);
        assert_eq!(cmp_ignore_ascii_case("ab", "abc"), Ordering::Less);
    }
}
