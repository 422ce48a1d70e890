use super::words::replace_whole_word;
use crate::nlp::sentiment::SentimentResult;
use crate::profile::Style;

/// Vocabulary swaps per style, applied whole-word with capitalization kept.
const INTELECTUAL_MAP: &[(&str, &str)] = &[
    ("legal", "interessante"),
    ("coisa", "questão"),
    ("muito", "consideravelmente"),
    ("acho", "considero"),
];

const CASUAL_MAP: &[(&str, &str)] = &[
    ("entretanto", "mas"),
    ("portanto", "então"),
    ("excelente", "show"),
    ("certamente", "com certeza"),
];

const PRATICO_MAP: &[(&str, &str)] = &[
    ("consideravelmente", "bem"),
    ("adicionalmente", "além disso"),
    ("possivelmente", "talvez"),
];

/// Rewrite the reply in the user's preferred register and close with a
/// sentiment-matched sentence.
pub fn apply_tone(text: &str, style: Style, sentiment: &SentimentResult) -> String {
    let map = match style {
        Style::Intelectual => INTELECTUAL_MAP,
        Style::Casual | Style::Entusiasmado => CASUAL_MAP,
        Style::Pratico | Style::Direto | Style::Cauteloso => PRATICO_MAP,
    };

    let mut out = text.to_string();
    for (from, to) in map {
        out = replace_whole_word(&out, from, to);
    }

    out.push_str(sentiment_suffix(sentiment.normalized));
    out
}

fn sentiment_suffix(normalized: f64) -> &'static str {
    if normalized > 0.7 {
        " Fico muito feliz em ajudar!"
    } else if normalized > 0.3 {
        " Espero ter ajudado!"
    } else if normalized < -0.7 {
        " Lamento que esteja passando por isso."
    } else if normalized < -0.3 {
        " Entendo sua preocupação."
    } else {
        " Certo."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intellectual_style_swaps_vocabulary() {
        let toned = apply_tone(
            "Isso é muito legal",
            Style::Intelectual,
            &SentimentResult::neutral(),
        );
        assert!(toned.contains("consideravelmente interessante"));
        assert!(toned.ends_with(" Certo."));
    }

    #[test]
    fn positive_sentiment_gets_happy_suffix() {
        let mut sentiment = SentimentResult::neutral();
        sentiment.normalized = 0.8;
        let toned = apply_tone("feito", Style::Pratico, &sentiment);
        assert!(toned.ends_with("Fico muito feliz em ajudar!"));
    }
}
