//! Wildcard host pattern matching.
//!
//! A host identifier is a *wildcard* when it contains `*` and is not the bare
//! catch-all `*`. Each `*` stands for **one or more** characters; every other
//! character matches itself, case-sensitively, and the whole candidate must be
//! consumed. So `web*` matches `web1` and `web-db` but not `web`, and a
//! wildcard always matches itself (its own `*` is one character).
//!
//! The matcher rewrites every `*` as "exactly one character, then zero or
//! more" and runs the usual two-pointer backtracking match, which stays
//! linear-ish for the short patterns found in SSH configs.

/// Returns `true` if `identifier` should be treated as a wildcard pattern.
#[must_use]
pub fn is_wildcard(identifier: &str) -> bool {
    identifier != "*" && identifier.contains('*')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    /// Exactly one character.
    One,
    /// Zero or more characters.
    Rest,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len() + 4);
    for c in pattern.chars() {
        if c == '*' {
            tokens.push(Token::One);
            tokens.push(Token::Rest);
        } else {
            tokens.push(Token::Literal(c));
        }
    }
    tokens
}

/// Full-string match of `candidate` against `pattern`.
///
/// `*` in `pattern` matches one or more characters. A `*` inside `candidate`
/// is an ordinary character.
#[must_use]
pub fn wildcard_match(pattern: &str, candidate: &str) -> bool {
    let tokens = tokenize(pattern);
    let text: Vec<char> = candidate.chars().collect();

    let mut t = 0;
    let mut p = 0;
    // Position of the last `Rest` token and the text index it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(Token::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            Some(Token::One) => {
                t += 1;
                p += 1;
            }
            Some(Token::Rest) => {
                backtrack = Some((p, t));
                p += 1;
            }
            _ => match backtrack {
                Some((rest_p, rest_t)) => {
                    // Let the last `Rest` swallow one more character and retry.
                    backtrack = Some((rest_p, rest_t + 1));
                    p = rest_p + 1;
                    t = rest_t + 1;
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|tok| *tok == Token::Rest)
}

/// Every candidate that `pattern` matches, in candidate order.
///
/// No filtering is applied: when `pattern` itself is among the candidates it
/// is returned too, and so is any other wildcard it covers. Callers decide
/// which matches to ignore.
pub fn matches<'a, I>(pattern: &str, candidates: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let wild = is_wildcard(pattern);
    candidates
        .into_iter()
        .filter(|candidate| {
            if wild {
                wildcard_match(pattern, candidate)
            } else {
                pattern == *candidate
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bare_star_is_not_a_wildcard() {
        assert!(!is_wildcard("*"));
        assert!(is_wildcard("*.corp"));
        assert!(is_wildcard("web*"));
        assert!(!is_wildcard("bastion"));
    }

    #[test]
    fn star_needs_at_least_one_character() {
        assert!(wildcard_match("web*", "web1"));
        assert!(wildcard_match("web*", "web-frontend"));
        assert!(!wildcard_match("web*", "web"));
        assert!(!wildcard_match("*.corp", ".corp"));
    }

    #[test]
    fn match_is_full_string_and_case_sensitive() {
        assert!(wildcard_match("db*.corp", "db1.corp"));
        assert!(!wildcard_match("db*.corp", "db1.corp.example"));
        assert!(!wildcard_match("db*", "DB1"));
        assert!(!wildcard_match("web*", "xweb1"));
    }

    #[test]
    fn dots_are_literal() {
        assert!(!wildcard_match("a*.b", "a1xb"));
        assert!(wildcard_match("a*.b", "a1.b"));
    }

    #[test]
    fn multiple_stars_backtrack() {
        assert!(wildcard_match("*-*-prod", "eu-west-prod"));
        assert!(wildcard_match("*-*-prod", "a-b-c-prod"));
        assert!(!wildcard_match("*-*-prod", "--prod"));
        assert!(!wildcard_match("*-*-prod", "eu-prod"));
    }

    #[test]
    fn wildcard_matches_itself_and_other_wildcards() {
        assert!(wildcard_match("web*", "web*"));
        assert!(wildcard_match("web*", "web-*"));
        assert!(!wildcard_match("web-*", "web*"));
    }

    #[test]
    fn matches_keeps_candidate_order_and_includes_self() {
        let candidates = ["web2", "gw", "web*", "web1", "*"];
        let found = matches("web*", candidates);
        assert_eq!(found, vec!["web2", "web*", "web1"]);
    }

    #[test]
    fn non_wildcard_pattern_matches_only_itself() {
        let found = matches("gw", ["gw", "gw1", "*"]);
        assert_eq!(found, vec!["gw"]);
    }

    proptest! {
        #[test]
        fn literal_patterns_match_exactly(s in "[a-z0-9._-]{0,16}", t in "[a-z0-9._-]{0,16}") {
            prop_assert_eq!(wildcard_match(&s, &t), s == t);
        }

        #[test]
        fn prefix_star_matches_any_nonempty_suffix(prefix in "[a-z]{1,8}", suffix in "[a-z0-9]{1,8}") {
            let pattern = format!("{prefix}*");
            let candidate = format!("{prefix}{suffix}");
            prop_assert!(wildcard_match(&pattern, &candidate));
            prop_assert!(!wildcard_match(&pattern, &prefix));
        }

        #[test]
        fn every_wildcard_matches_itself(pattern in "[a-z*.]{1,12}") {
            prop_assert!(wildcard_match(&pattern, &pattern));
        }
    }
}
