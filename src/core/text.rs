//! Article agreement and whitespace/punctuation cleanup for composed text.

/// A piece of composed output before articles are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Article { capitalized: bool },
}

fn starts_with_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn article_for(next: Option<char>, capitalized: bool) -> &'static str {
    let vowel = next.is_some_and(starts_with_vowel);
    match (vowel, capitalized) {
        (true, true) => "An",
        (true, false) => "an",
        (false, true) => "A",
        (false, false) => "a",
    }
}

/// Join pieces into a string, choosing `a`/`an` for each article from the
/// first non-whitespace character that follows it.
pub fn resolve_articles(pieces: &[Piece]) -> String {
    let mut next: Option<char> = None;
    let mut resolved: Vec<&str> = Vec::with_capacity(pieces.len());

    for piece in pieces.iter().rev() {
        match piece {
            Piece::Text(text) => {
                if let Some(c) = text.chars().find(|c| !c.is_whitespace()) {
                    next = Some(c);
                }
                resolved.push(text);
            }
            Piece::Article { capitalized } => {
                let word = article_for(next, *capitalized);
                next = word.chars().next();
                resolved.push(word);
            }
        }
    }

    resolved.iter().rev().copied().collect()
}

/// Collapse space runs and period runs, drop a period after `?` or `!` or
/// before which only spaces (or nothing) stand, then trim.
pub fn tidy(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            ' ' => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            '.' => {
                let kept = out.trim_end_matches(' ').len();
                out.truncate(kept);
                if !out.is_empty() && !out.ends_with(['.', '?', '!']) {
                    out.push('.');
                }
            }
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// True when a `{` or `}` survived composition.
pub fn has_unresolved_braces(text: &str) -> bool {
    text.contains(['{', '}'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Piece {
        Piece::Text(s.to_string())
    }

    #[test]
    fn articles_agree_with_following_word() {
        let pieces = [
            Piece::Article { capitalized: true },
            text(" ancient room. "),
            Piece::Article { capitalized: false },
            text(" icy corridor."),
        ];
        assert_eq!(resolve_articles(&pieces), "An ancient room. an icy corridor.");
    }

    #[test]
    fn consonants_take_a() {
        let pieces = [
            text("You enter "),
            Piece::Article { capitalized: false },
            text(" corroded hall."),
        ];
        assert_eq!(resolve_articles(&pieces), "You enter a corroded hall.");
    }

    #[test]
    fn vowel_check_is_case_insensitive() {
        let pieces = [Piece::Article { capitalized: false }, text(" Ice-covered vault")];
        assert_eq!(resolve_articles(&pieces), "an Ice-covered vault");
    }

    #[test]
    fn article_looks_past_empty_pieces() {
        let pieces = [
            Piece::Article { capitalized: false },
            text(""),
            text("   "),
            text("eerie hush"),
        ];
        assert_eq!(resolve_articles(&pieces), "an   eerie hush");
    }

    #[test]
    fn trailing_article_defaults_to_a() {
        let pieces = [text("Nothing follows "), Piece::Article { capitalized: false }];
        assert_eq!(resolve_articles(&pieces), "Nothing follows a");
    }

    #[test]
    fn tidy_collapses_spaces_and_periods() {
        assert_eq!(tidy("  A  long   hall..  It ends. "), "A long hall. It ends.");
        assert_eq!(tidy("Is anyone there?. Silence!."), "Is anyone there? Silence!");
    }

    #[test]
    fn tidy_removes_orphaned_period() {
        assert_eq!(tidy("The dust settles.  ."), "The dust settles.");
        assert_eq!(tidy("Quiet . Very quiet"), "Quiet. Very quiet");
        assert_eq!(tidy(" . Rest"), "Rest");
        assert_eq!(tidy(".. Rest."), "Rest.");
    }

    #[test]
    fn tidy_keeps_other_punctuation() {
        assert_eq!(tidy("Cold, damp; still"), "Cold, damp; still");
    }

    #[test]
    fn brace_scan() {
        assert!(has_unresolved_braces("a {Detail_1} b"));
        assert!(has_unresolved_braces("stray }"));
        assert!(!has_unresolved_braces("clean text"));
    }
}
