//! Whole-word matching and replacement helpers shared by the variety and
//! tone stages. Word boundaries are "not alphanumeric", which is close
//! enough for pt-BR text with accents since `char::is_alphanumeric` covers
//! them.

/// True when `word` appears in `text` delimited by non-alphanumeric
/// characters on both sides. Case-insensitive.
pub fn contains_whole_word(text: &str, word: &str) -> bool {
    let target = word.to_lowercase();
    word_runs(text).any(|(start, end)| text[start..end].to_lowercase() == target)
}

/// Replace every whole-word occurrence of `from` with `to`, preserving the
/// capitalization shape of each matched occurrence (ALL-CAPS stays caps,
/// Capitalized-first stays capitalized).
///
/// Words are compared lowercased but sliced from the original text, so
/// characters whose lowercase form changes byte length stay intact.
pub fn replace_whole_word(text: &str, from: &str, to: &str) -> String {
    let target = from.to_lowercase();
    if target.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for (start, end) in word_runs(text) {
        if text[start..end].to_lowercase() == target {
            out.push_str(&text[cursor..start]);
            out.push_str(&match_case(&text[start..end], to));
            cursor = end;
        }
    }
    out.push_str(&text[cursor..]);
    out
}

/// Byte ranges of the maximal alphanumeric runs in `text`.
fn word_runs(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut indices = text.char_indices().peekable();
    std::iter::from_fn(move || {
        while let Some((start, c)) = indices.next() {
            if !c.is_alphanumeric() {
                continue;
            }
            let mut end = start + c.len_utf8();
            while let Some(&(i, n)) = indices.peek() {
                if n.is_alphanumeric() {
                    end = i + n.len_utf8();
                    indices.next();
                } else {
                    break;
                }
            }
            return Some((start, end));
        }
        None
    })
}

/// Reshape `replacement` to mirror the capitalization of `original`.
fn match_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    let first_upper = chars.next().is_some_and(|c| c.is_uppercase());
    let all_upper = first_upper && original.chars().all(|c| !c.is_lowercase());

    if all_upper && original.chars().count() > 1 {
        replacement.to_uppercase()
    } else if first_upper {
        let mut out = String::with_capacity(replacement.len());
        let mut rest = replacement.chars();
        if let Some(first) = rest.next() {
            out.extend(first.to_uppercase());
            out.extend(rest);
        }
        out
    } else {
        replacement.to_string()
    }
}
