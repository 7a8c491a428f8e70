use lazy_static::lazy_static;
use regex::Regex;

/// Terms stripped from every free-text input before it reaches the server.
const BANNED_WORDS: [&str; 10] = [
    "asshole",
    "bastard",
    "bitch",
    "dick",
    "fuck",
    "pedophile",
    "rape",
    "rapist",
    "shit",
    "slut",
];

lazy_static! {
    static ref BANNED_RE: Regex = {
        let alternation = BANNED_WORDS
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("banned-word pattern")
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub cleaned: String,
    /// Deduplicated, lowercased terms that matched.
    pub found: Vec<String>,
}

/// Strips banned terms (case-insensitive, whole-word) from `text`.
///
/// Matches are removed outright, not masked. Removal runs to a fixed point so
/// that deleting a span can never leave behind a fresh concatenation that
/// still matches, which makes the function idempotent.
pub fn sanitize(text: &str) -> Sanitized {
    if text.is_empty() {
        return Sanitized {
            cleaned: String::new(),
            found: Vec::new(),
        };
    }

    let mut found: Vec<String> = Vec::new();
    let mut cleaned = text.to_string();
    loop {
        let mut matched_this_pass = false;
        for hit in BANNED_RE.find_iter(&cleaned) {
            matched_this_pass = true;
            let lowered = hit.as_str().to_lowercase();
            if !found.contains(&lowered) {
                found.push(lowered);
            }
        }
        if !matched_this_pass {
            break;
        }
        cleaned = BANNED_RE.replace_all(&cleaned, "").into_owned();
    }

    Sanitized { cleaned, found }
}

/// User-facing advisory for a non-empty match set, e.g.
/// `Inappropriate words removed: fuck, shit.`
pub fn advisory_message(found: &[String]) -> String {
    format!("Inappropriate words removed: {}.", found.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_standalone_banned_words() {
        let result = sanitize("fuck this");
        assert_eq!(result.cleaned, " this");
        assert_eq!(result.found, vec!["fuck".to_string()]);
    }

    #[test]
    fn leaves_embedded_substrings_alone() {
        // "dick" inside a longer word must not match the word boundary.
        let result = sanitize("Moby-Dickens is a classic");
        assert_eq!(result.cleaned, "Moby-Dickens is a classic");
        assert!(result.found.is_empty());
    }

    #[test]
    fn hyphen_is_a_word_boundary() {
        let result = sanitize("Moby-Dick is a classic");
        assert_eq!(result.cleaned, "Moby- is a classic");
        assert_eq!(result.found, vec!["dick".to_string()]);
    }

    #[test]
    fn matching_is_case_insensitive_and_deduplicated() {
        let result = sanitize("SHIT happens, shit stays, Shit goes");
        assert_eq!(result.found, vec!["shit".to_string()]);
        assert_eq!(result.cleaned, " happens,  stays,  goes");
    }

    #[test]
    fn empty_input_passes_through() {
        let result = sanitize("");
        assert_eq!(result.cleaned, "");
        assert!(result.found.is_empty());
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = [
            "fuck this shit",
            "clean text only",
            "ShitShit shit",
            "a bastard, a rapist, and an asshole walk in",
        ];
        for sample in samples {
            let once = sanitize(sample);
            let twice = sanitize(&once.cleaned);
            assert_eq!(twice.cleaned, once.cleaned, "input: {sample:?}");
            assert!(twice.found.is_empty(), "input: {sample:?}");
        }
    }

    #[test]
    fn advisory_lists_terms() {
        let found = vec!["fuck".to_string(), "shit".to_string()];
        assert_eq!(
            advisory_message(&found),
            "Inappropriate words removed: fuck, shit."
        );
    }
}
