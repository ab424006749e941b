use regex::Regex;
use std::sync::LazyLock;

// --- Patterns ---

static RE_CONTRIBUTORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*\d+\s+Contributors?.*\n?").unwrap());

static RE_TRANSLATIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Translations?.*\n?").unwrap());

static RE_LANGUAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:English|Spanish|Español|Portuguese|French).*\n?").unwrap()
});

static RE_LYRICS_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Lyrics?\n?").unwrap());

static RE_LETRA_DE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[Letra de.*?\]\n?").unwrap());

static RE_SECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\[(?:Verse|Chorus|Intro|Outro|Bridge|Hook|Refrain|Pre-Chorus|Post-Chorus",
        r"|Estribillo|Pre-Estribillo|Puente|Verso 2|Verso 1).*?\]\n?"
    ))
    .unwrap()
});

static RE_BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

// --- Rules ---

/// One named cleaning step. Every rule is a pure text -> text function.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// `"12 Contributors..."` as the very first line.
pub fn strip_contributors(text: &str) -> String {
    RE_CONTRIBUTORS.replace(text, "").into_owned()
}

/// Any line mentioning "Translation(s)", from that word to the end of the line.
pub fn strip_translations(text: &str) -> String {
    RE_TRANSLATIONS.replace_all(text, "").into_owned()
}

/// Lines that start with a language label such as "English" or "Español".
pub fn strip_language_labels(text: &str) -> String {
    RE_LANGUAGE_LINE.replace_all(text, "").into_owned()
}

/// Every "Lyric"/"Lyrics", e.g. the "Song Title Lyrics" header.
pub fn strip_lyrics_word(text: &str) -> String {
    RE_LYRICS_WORD.replace_all(text, "").into_owned()
}

/// `[Letra de "..."]` headers, up to the first `]`.
pub fn strip_letra_annotations(text: &str) -> String {
    RE_LETRA_DE.replace_all(text, "").into_owned()
}

/// `[Chorus]`, `[Verse 1: Someone]`, `[Estribillo]` and friends.
pub fn strip_section_markers(text: &str) -> String {
    RE_SECTION_MARKER.replace_all(text, "").into_owned()
}

/// Runs of two or more newlines become a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    RE_BLANK_RUNS.replace_all(text, "\n\n").into_owned()
}

/// Leading and trailing whitespace.
pub fn trim(text: &str) -> String {
    text.trim().to_string()
}

/// Applied in this order, each on the output of the previous one.
/// The "Lyrics" rule must run after the anchored header rules, and blank-line
/// collapsing must come after every deletion.
pub const RULES: [Rule; 8] = [
    Rule { name: "contributors", apply: strip_contributors },
    Rule { name: "translations", apply: strip_translations },
    Rule { name: "language_labels", apply: strip_language_labels },
    Rule { name: "lyrics_word", apply: strip_lyrics_word },
    Rule { name: "letra_annotations", apply: strip_letra_annotations },
    Rule { name: "section_markers", apply: strip_section_markers },
    Rule { name: "collapse_blank_lines", apply: collapse_blank_lines },
    Rule { name: "trim", apply: trim },
];

/// Cleans raw scraped lyrics. Heuristic: unlisted boilerplate survives and
/// real lyric text matching a rule is removed.
pub fn normalize_lyrics(raw_lyrics: &str) -> String {
    RULES
        .iter()
        .fold(raw_lyrics.to_string(), |text, rule| (rule.apply)(&text))
}
