use axum::response::Html;
use lazy_static::lazy_static;
use rand::Rng;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tera::{Context, Tera};

use crate::data::models::WordItem;
use crate::features::errors::ApiError;
use crate::utils::render_template;

pub const EXAMPLE_TEMPLATE: &str = "example.html";

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Fallback sentences as (before, after) the highlighted Hebrew word
const FALLBACKS: [(&str, &str); 3] = [
    ("המילה ", " היא חלק חשוב באוצר המילים."),
    ("תוכל להשתמש במילה ", " במגוון הקשרים."),
    ("", " היא מילה שימושית בשפה האנגלית."),
];

/// A run of example text; highlighted runs are wrapped in `<strong>` by the
/// template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlight: bool,
}

impl Segment {
    fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), highlight: false }
    }

    fn strong(text: impl Into<String>) -> Self {
        Self { text: text.into(), highlight: true }
    }
}

pub fn segments<R: Rng>(word: &WordItem, rng: &mut R) -> Vec<Segment> {
    let example = WHITESPACE.replace_all(word.example.trim(), " ");

    if example.is_empty() {
        let (before, after) = FALLBACKS[rng.random_range(0..FALLBACKS.len())];
        let segments = [
            Segment::plain(before),
            Segment::strong(word.hebrew.as_str()),
            Segment::plain(after),
        ];
        return segments
            .into_iter()
            .filter(|s| !s.text.is_empty())
            .collect();
    }

    let english = word.english.trim();
    if !english.is_empty() {
        let pattern = RegexBuilder::new(&regex::escape(english)).case_insensitive(true).build();
        if let Ok(pattern) = pattern {
            let matches = pattern.find_iter(&example).map(|m| (m.start(), m.end()));
            let found = split_on(&example, matches);
            if found.iter().any(|s| s.highlight) {
                return found;
            }
        }
    }

    let hebrew = word.hebrew.trim();
    if let Some(start) = example.find(hebrew).filter(|_| !hebrew.is_empty()) {
        return split_on(&example, std::iter::once((start, start + hebrew.len())));
    }

    vec![Segment::strong(hebrew), Segment::plain(format!(" - {example}"))]
}

fn split_on(text: &str, ranges: impl Iterator<Item = (usize, usize)>) -> Vec<Segment> {
    let mut parts = Vec::new();
    let mut cursor = 0;
    for (start, end) in ranges {
        if start > cursor {
            parts.push(Segment::plain(&text[cursor..start]));
        }
        parts.push(Segment::strong(&text[start..end]));
        cursor = end;
    }
    if cursor < text.len() {
        parts.push(Segment::plain(&text[cursor..]));
    }
    parts
}

/// Renders the example sentence of a word as an HTML fragment. All text goes
/// through the template's autoescaping.
pub fn render<R: Rng>(tera: &Tera, word: &WordItem, rng: &mut R) -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("word_id", &word.word_id);
    context.insert("segments", &segments(word, rng));
    render_template(tera, EXAMPLE_TEMPLATE, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{Difficulty, ReviewStatus};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn word(english: &str, hebrew: &str, example: &str) -> WordItem {
        let at = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        WordItem {
            word_id: 1,
            english: english.into(),
            hebrew: hebrew.into(),
            example: example.into(),
            category: "Test".into(),
            difficulty: Difficulty::Easy,
            status: ReviewStatus::New,
            last_reviewed_at: None,
            next_review_at: at,
            created_at: at,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    #[test]
    fn english_word_is_found_case_insensitively() {
        let w = word("Ephemeral", "חולף", "Trends are often ephemeral, lasting days.");
        assert_eq!(
            segments(&w, &mut rng()),
            vec![
                Segment::plain("Trends are often "),
                Segment::strong("ephemeral"),
                Segment::plain(", lasting days."),
            ]
        );
    }

    #[test]
    fn missing_word_is_prefixed_with_hebrew() {
        let w = word("Ataraxia", "שלווה", "He sought calm.");
        assert_eq!(
            segments(&w, &mut rng()),
            vec![Segment::strong("שלווה"), Segment::plain(" - He sought calm.")]
        );
    }

    #[test]
    fn empty_example_uses_a_hebrew_fallback() {
        let w = word("Resilient", "עמיד", "   ");
        let parts = segments(&w, &mut rng());
        assert!(parts.contains(&Segment::strong("עמיד")));
        assert!(parts.len() >= 2);
    }

    #[test]
    fn rendered_fragment_escapes_markup() {
        let mut tera = Tera::default();
        tera.add_raw_template(EXAMPLE_TEMPLATE, include_str!("../../templates/example.html"))
            .unwrap();
        let w = word("bold", "מודגש", "<script>alert(1)</script> a bold move");
        let Html(html) = render(&tera, &w, &mut rng()).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<strong>bold</strong>"));
    }
}
