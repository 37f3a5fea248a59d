//! GitHub-compatible heading anchors.

use std::collections::HashMap;

/// Characters GitHub drops when turning heading text into an anchor.
const STRIPPED_PUNCTUATION: &str = "!\"#$%&'()*+,./:;<=>?@[\\]^`{|}~";

/// Anchors handed out so far in one document, mapped to the repeat count of
/// each base slug. Owned by a single extraction call.
pub type Collisions = HashMap<String, u32>;

/// Choose the anchor for a heading's plain text, enumerating repeats.
///
/// The first use of a slug returns it unchanged; later uses get `-1`, `-2`, ...
/// A suffixed candidate that is itself already taken keeps counting up, so
/// anchors returned against one table never repeat.
pub fn make_anchor(text: &str, collisions: &mut Collisions) -> String {
    let base = slug_base(text);
    let mut anchor = base.clone();
    while collisions.contains_key(&anchor) {
        let count = collisions.entry(base.clone()).or_insert(0);
        *count = count.saturating_add(1);
        anchor = format!("{base}-{count}");
    }
    collisions.insert(anchor.clone(), 0);
    return anchor;
}

/// Slug before collision handling: lowercase, trimmed, space runs to `-`,
/// punctuation removed.
fn slug_base(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_spaces = false;

    for c in lowered.trim().chars() {
        if c == ' ' {
            if !in_spaces {
                slug.push('-');
            }
            in_spaces = true;
            continue;
        }
        in_spaces = false;
        if !STRIPPED_PUNCTUATION.contains(c) {
            slug.push(c);
        }
    }

    return slug;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_dropped() {
        let mut collisions = Collisions::new();
        assert_eq!(make_anchor("Header? Yes it is!", &mut collisions), "header-yes-it-is");
    }

    #[test]
    fn hyphens_and_underscores_survive() {
        assert_eq!(slug_base("snake_case and-kebab"), "snake_case-and-kebab");
    }

    #[test]
    fn removed_symbol_leaves_double_hyphen() {
        assert_eq!(slug_base("Advanced Find & Replace"), "advanced-find--replace");
    }

    #[test]
    fn space_runs_collapse() {
        assert_eq!(slug_base("  Hello   World  "), "hello-world");
    }

    #[test]
    fn repeats_are_enumerated() {
        let mut collisions = Collisions::new();
        let anchors: Vec<String> = (0..3).map(|_| make_anchor("Bork", &mut collisions)).collect();
        assert_eq!(anchors, ["bork", "bork-1", "bork-2"]);
    }

    #[test]
    fn empty_text_enumerates_from_empty_slug() {
        let mut collisions = Collisions::new();
        assert_eq!(make_anchor("", &mut collisions), "");
        assert_eq!(make_anchor("**", &mut collisions), "-1");
        assert_eq!(make_anchor("", &mut collisions), "-2");
    }

    #[test]
    fn suffixed_anchor_already_taken_keeps_counting() {
        let mut collisions = Collisions::new();
        assert_eq!(make_anchor("A", &mut collisions), "a");
        assert_eq!(make_anchor("A 1", &mut collisions), "a-1");
        assert_eq!(make_anchor("A", &mut collisions), "a-2");
        assert_eq!(make_anchor("A 1", &mut collisions), "a-1-1");
    }

    #[test]
    fn tables_are_independent() {
        let mut first = Collisions::new();
        let mut second = Collisions::new();
        assert_eq!(make_anchor("Intro", &mut first), "intro");
        assert_eq!(make_anchor("Intro", &mut second), "intro");
    }
}
