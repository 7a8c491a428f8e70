use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MENTION_RE: Regex = Regex::new(r"@([A-Za-z0-9_]+)").expect("mention pattern");
}

/// A display segment produced by [`extract_mentions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Handle without the leading `@`. Not validated against any user store;
    /// resolution happens on click and may fail for unknown handles.
    Mention(String),
}

/// Splits `text` into plain-text and `@handle` segments, preserving order and
/// exact substring boundaries. Concatenating the segments (mentions rendered
/// as `@handle`) reproduces the input.
pub fn extract_mentions(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;
    for captures in MENTION_RE.captures_iter(text) {
        let whole = captures.get(0).expect("match group");
        if whole.start() > last_end {
            segments.push(Segment::Text(text[last_end..whole.start()].to_string()));
        }
        segments.push(Segment::Mention(captures[1].to_string()));
        last_end = whole.end();
    }
    if last_end < text.len() {
        segments.push(Segment::Text(text[last_end..].to_string()));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rejoin(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(value) => value.clone(),
                Segment::Mention(handle) => format!("@{handle}"),
            })
            .collect()
    }

    #[test]
    fn extracts_mentions_in_order() {
        let segments = extract_mentions("hi @alice, meet @bob_99!");
        assert_eq!(
            segments,
            vec![
                Segment::Text("hi ".into()),
                Segment::Mention("alice".into()),
                Segment::Text(", meet ".into()),
                Segment::Mention("bob_99".into()),
                Segment::Text("!".into()),
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(extract_mentions("").is_empty());
    }

    #[test]
    fn plain_text_is_a_single_segment() {
        assert_eq!(
            extract_mentions("no handles here"),
            vec![Segment::Text("no handles here".into())]
        );
    }

    #[test]
    fn bare_at_sign_is_text() {
        assert_eq!(
            extract_mentions("mail @ noon"),
            vec![Segment::Text("mail @ noon".into())]
        );
    }

    #[test]
    fn mention_stops_at_non_word_characters() {
        let segments = extract_mentions("@alice's post");
        assert_eq!(
            segments,
            vec![
                Segment::Mention("alice".into()),
                Segment::Text("'s post".into()),
            ]
        );
    }

    #[test]
    fn segments_round_trip_to_original_text() {
        let samples = [
            "",
            "@a",
            "plain",
            "hi @alice, meet @bob_99!",
            "@start middle @end",
            "double @@weird",
            "@alice@bob",
        ];
        for sample in samples {
            assert_eq!(rejoin(&extract_mentions(sample)), sample, "input: {sample:?}");
        }
    }
}
