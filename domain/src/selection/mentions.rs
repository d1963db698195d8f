//! Participant mention counting

use std::collections::BTreeMap;

/// Count how often each of `names` is mentioned in `content`.
///
/// A mention only counts when the characters on both sides are not word
/// characters (alphanumerics or `_`), so `Bob` is found in `"ask Bob."` but
/// not in `"Bobby"`. Names that are never mentioned are left out of the map.
pub fn count_mentions<'a, I>(content: &str, names: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut mentions = BTreeMap::new();
    for name in names {
        if name.is_empty() {
            continue;
        }
        let count = content
            .match_indices(name)
            .filter(|(start, _)| {
                let before = content[..*start].chars().next_back();
                let after = content[start + name.len()..].chars().next();
                !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
            })
            .count();
        if count > 0 {
            mentions.insert(name.to_string(), count);
        }
    }
    mentions
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundaries() {
        let counts = count_mentions("Bobby asked Bob; bob_2 and (Bob)", ["Bob"]);
        assert_eq!(counts.get("Bob"), Some(&2));
    }

    #[test]
    fn test_unmentioned_names_absent() {
        let counts = count_mentions("nobody here", ["Coder", "Reviewer"]);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_mention_at_edges() {
        let counts = count_mentions("Coder", ["Coder"]);
        assert_eq!(counts.get("Coder"), Some(&1));
    }
}
