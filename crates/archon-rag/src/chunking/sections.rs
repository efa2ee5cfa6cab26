//! ABOUTME: Section-header detection and sentence-boundary search for the chunker

/// Markers that, at the start of a line, mark it as a section header
/// regardless of language (building-code documents mix English, Turkish,
/// and German section vocabulary within the same corpus).
const SECTION_MARKERS: &[&str] = &[
    "Article", "Section", "Chapter", "Madde", "Bölüm", "Artikel", "Paragraf", "Clause", "Subsection", "Part",
];

pub fn section_markers() -> &'static [&'static str] {
    SECTION_MARKERS
}

/// Split `content` into logical sections on header boundaries. A header
/// starts a new section; everything before the first header (or the whole
/// document, if no headers are found) is one section.
pub fn split_into_sections(content: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if is_section_header(line) && !current.is_empty() {
            let section = current.join("\n").trim().to_string();
            if !section.is_empty() {
                sections.push(section);
            }
            current = vec![line];
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        let section = current.join("\n").trim().to_string();
        if !section.is_empty() {
            sections.push(section);
        }
    }

    if sections.is_empty() {
        sections.push(content.to_string());
    }

    sections
}

fn is_section_header(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }

    if SECTION_MARKERS.iter().any(|marker| line.starts_with(marker)) {
        return true;
    }

    if let Some(first_word) = line.split_whitespace().next() {
        let stripped: String = first_word.chars().filter(|c| *c != '.' && *c != '-').collect();
        if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        if first_word.chars().take(5).any(|c| c.is_ascii_digit()) {
            return true;
        }
    }

    let word_count = line.split_whitespace().count();
    if word_count > 0 && word_count <= 8 && line.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase) {
        return true;
    }

    false
}

/// Language-specific sentence delimiters; unrecognized languages fall back
/// to the English set.
fn sentence_delimiters(language: &str) -> &'static [char] {
    match language {
        "tr" | "de" | "fr" | "es" => &['.', '!', '?', ':', ';'],
        _ => &['.', '!', '?'],
    }
}

/// Search backwards from `preferred_end` (within 200 chars, and never before
/// `min_end`) for a sentence-ending delimiter followed by whitespace.
/// Returns `None` if no boundary is found, in which case the caller should
/// split at `preferred_end` verbatim.
pub fn find_sentence_boundary(chars: &[char], preferred_end: usize, language: &str, min_end: usize) -> Option<usize> {
    let delimiters = sentence_delimiters(language);
    let search_start = min_end.max(preferred_end.saturating_sub(200));

    if preferred_end == 0 {
        return None;
    }

    let mut i = preferred_end - 1;
    loop {
        if delimiters.contains(&chars[i]) {
            let next = chars.get(i + 1);
            if next.map_or(true, |c| c.is_whitespace()) {
                return Some(i + 1);
            }
        }
        if i <= search_start {
            break;
        }
        i -= 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_marker_prefixed_headers() {
        assert!(is_section_header("Article 5: Fire Safety"));
        assert!(is_section_header("Madde 12"));
        assert!(!is_section_header("this is body text about article placement"));
    }

    #[test]
    fn detects_all_uppercase_short_headers() {
        assert!(is_section_header("FIRE SAFETY REQUIREMENTS"));
        assert!(!is_section_header("THIS IS A VERY LONG UPPERCASE LINE THAT EXCEEDS EIGHT WORDS TOTAL"));
    }

    #[test]
    fn splits_on_headers_and_keeps_preceding_text_as_first_section() {
        let content = "Intro text.\nArticle 1\nBody one.\nArticle 2\nBody two.";
        let sections = split_into_sections(content);
        assert_eq!(sections.len(), 3);
        assert!(sections[0].starts_with("Intro"));
        assert!(sections[1].starts_with("Article 1"));
    }

    #[test]
    fn no_headers_yields_single_section() {
        let content = "just some plain text\nwith multiple lines\nand no headers at all";
        assert_eq!(split_into_sections(content).len(), 1);
    }

    #[test]
    fn sentence_boundary_prefers_delimiter_followed_by_space() {
        let text: Vec<char> = "One sentence here. Two sentence starts here and keeps going".chars().collect();
        let boundary = find_sentence_boundary(&text, 25, "en", 0);
        assert_eq!(boundary, Some(19));
    }
}
