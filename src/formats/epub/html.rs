//! Chapter HTML normalization
//!
//! Pure string transforms applied to every spine document before it is
//! handed to a reader. Output is an HTML fragment suited to simple renderers:
//! no styling, no scripts, no images, and list items flattened onto one line.

use std::sync::LazyLock;

use regex::Regex;

use crate::content::ChapterInfo;

static BODY_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<body[^>]*>").unwrap());
static BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body\s*>").unwrap());

static NON_TEXT: LazyLock<[Regex; 6]> = LazyLock::new(|| {
    [
        Regex::new(r"(?si)<style[^>]*>.*?</style>").unwrap(),
        Regex::new(r"(?si)<script[^>]*>.*?</script>").unwrap(),
        Regex::new(r"(?si)<svg[^>]*>.*?</svg>").unwrap(),
        Regex::new(r"(?si)<img\b[^>]*>").unwrap(),
        Regex::new(r"(?si)<image\b[^>]*>").unwrap(),
        Regex::new(r"(?s)<!--.*?-->").unwrap(),
    ]
});

static LI_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li(?:\s[^>]*)?>").unwrap());
static LI_P_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)<li>\s*<p(?:\s[^>]*)?>").unwrap());
static LI_P_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?si)</p>\s*</li>").unwrap());
static UL_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<ul\b[^>]*>").unwrap());
static UL_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</ul>").unwrap());
static OL_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<ol\b[^>]*>").unwrap());
static OL_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</ol>").unwrap());
static LI_LEADING_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)<li>\s*(?:<(?:p|div|h[1-6]|br)\b[^>]*>|\s+)+").unwrap()
});
static LI_TRAILING_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)(?:</(?:p|div|h[1-6])>\s*)+</li>").unwrap()
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:[A-Za-z]+|#[0-9]+|#[xX][0-9A-Fa-f]+);").unwrap());
static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6]|blockquote|tr)>").unwrap()
});
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Padding inserted at the start of every list item
pub const LIST_ITEM_PADDING: &str = "&#160;&#160;&#160;";

/// Inner content of `<body>`, or the whole document when there is none
///
/// A missing `</body>` keeps everything after the opening tag.
pub fn body_content(html: &str) -> &str {
    let Some(open) = BODY_OPEN.find(html) else {
        return html;
    };
    let rest = &html[open.end()..];
    match BODY_CLOSE.find(rest) {
        Some(close) => &rest[..close.start()],
        None => rest,
    }
}

/// Remove styling, scripts, images, SVG and comments
pub fn strip_non_text(html: &str) -> String {
    NON_TEXT.iter().fold(html.to_string(), |acc, re| {
        re.replace_all(&acc, "").into_owned()
    })
}

/// Flatten list items and indent lists for renderers without CSS
pub fn normalize_lists(html: &str) -> String {
    let mut out = LI_OPEN.replace_all(html, "<li>").into_owned();
    out = LI_P_OPEN.replace_all(&out, "<li>").into_owned();
    out = LI_P_CLOSE.replace_all(&out, "</li>").into_owned();

    out = UL_OPEN.replace_all(&out, "<br/><br/><ul><ul>").into_owned();
    out = UL_CLOSE.replace_all(&out, "</ul></ul><br/>").into_owned();
    out = OL_OPEN.replace_all(&out, "<br/><br/><ol><ol>").into_owned();
    out = OL_CLOSE.replace_all(&out, "</ol></ol><br/>").into_owned();

    out = LI_LEADING_BLOCKS.replace_all(&out, "<li>").into_owned();
    out = LI_TRAILING_BLOCKS.replace_all(&out, "</li>").into_owned();

    out.replace("<li>", &format!("<li>{LIST_ITEM_PADDING}"))
}

/// Whether any visible character survives once tags and entities are removed
pub fn has_visible_text(html: &str) -> bool {
    let without_tags = TAG.replace_all(html, "");
    let without_entities = ENTITY.replace_all(&without_tags, "");
    !without_entities.trim().is_empty()
}

/// Full normalization of one spine document
///
/// Returns `None` when nothing readable is left, in which case the chapter
/// is dropped.
pub fn normalize_chapter(html: &str) -> Option<String> {
    let content = strip_non_text(body_content(html));
    let content = normalize_lists(&content);
    if has_visible_text(&content) {
        Some(content.trim().to_string())
    } else {
        None
    }
}

/// Readable plain text of an HTML fragment
///
/// Block-level closings become line breaks, remaining tags are dropped and
/// entities decoded.
pub fn plain_text(html: &str) -> String {
    let cleaned = strip_non_text(html);
    let with_breaks = BLOCK_BREAK.replace_all(&cleaned, "\n");
    let without_tags = TAG.replace_all(&with_breaks, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    let collapsed = SPACES.replace_all(&decoded, " ");
    let lines: Vec<&str> = collapsed.lines().map(str::trim).collect();
    BLANK_LINES
        .replace_all(&lines.join("\n"), "\n")
        .trim()
        .to_string()
}

/// Build the final TOC for `chapter_count` chapters
///
/// NCX titles win when present, truncated to the chapter count and indexed
/// by position. Otherwise every chapter gets a "Chapter N" entry.
pub fn reconcile_toc(titles: Vec<String>, chapter_count: usize) -> Vec<ChapterInfo> {
    if titles.is_empty() {
        return ChapterInfo::placeholders(chapter_count);
    }
    titles
        .into_iter()
        .take(chapter_count)
        .enumerate()
        .map(|(index, title)| ChapterInfo::new(title, index))
        .collect()
}
