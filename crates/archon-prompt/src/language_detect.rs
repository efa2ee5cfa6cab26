//! ABOUTME: Content-based language heuristic used when `locale=auto`

const TURKISH_MARKERS: &[&str] = &["ı", "ğ", "ş", "için", "yapı", "bölüm", "ve"];
const GERMAN_MARKERS: &[&str] = &["ß", "ü", "ö", "und", "der", "die", "das"];
const FRENCH_MARKERS: &[&str] = &["é", "è", "ç", "le", "la", "des", "avec"];
const SPANISH_MARKERS: &[&str] = &["ñ", "¿", "¡", "el", "la", "con", "para"];

/// Heuristic language detection on raw prompt text: counts language-specific
/// character/word markers and picks the best-scoring language, defaulting to
/// English when no language scores above zero.
#[must_use]
pub fn detect(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let score = |markers: &[&str]| -> usize {
        markers
            .iter()
            .map(|marker| {
                if marker.chars().count() <= 2 {
                    lowered.matches(marker).count()
                } else {
                    words.iter().filter(|w| w == marker).count()
                }
            })
            .sum()
    };

    let scores = [
        ("tr", score(TURKISH_MARKERS)),
        ("de", score(GERMAN_MARKERS)),
        ("fr", score(FRENCH_MARKERS)),
        ("es", score(SPANISH_MARKERS)),
    ];

    scores
        .into_iter()
        .filter(|(_, s)| *s > 0)
        .max_by_key(|(_, s)| *s)
        .map_or("en", |(lang, _)| lang)
}
