use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Matches the four immutable tag syntaxes used by the localization data:
/// `%...%`, `<...>`, `{...}` and `$...$`.
static TAG_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[^%]*%|<[^<>]*>|\{[^{}]*\}|\$[^$]*\$").unwrap());

/// One slice of a localization string: either free text the proofreader may
/// touch, or a protected region that must pass through byte-for-byte.
///
/// A protected region is a single tag (`%map,Bangor%`, `{アイテム名}`,
/// `<fontvar=-1>`, `$x,y$`) or, for angle tags that come in matching
/// open/close pairs like `<color=red>...</color>`, the whole element
/// including its enclosed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Free(&'a str),
    Protected(&'a str),
}

impl<'a> Piece<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Piece::Free(s) | Piece::Protected(s) => s,
        }
    }
}

/// Splits `input` into alternating free/protected pieces, in order, covering
/// the whole string. Unpaired delimiters are left in the free text.
pub fn pieces(input: &str) -> Vec<Piece<'_>> {
    let tags: Vec<Range<usize>> = TAG_SPAN.find_iter(input).map(|m| m.range()).collect();

    // Pair `<name ...>` openers with their nearest matching `</name>`.
    let mut paired: Vec<Option<usize>> = vec![None; tags.len()];
    let mut stack: Vec<(usize, &str)> = Vec::new();
    for (i, range) in tags.iter().enumerate() {
        let tag = &input[range.clone()];
        if let Some(name) = closing_name(tag) {
            if let Some(pos) = stack.iter().rposition(|(_, n)| *n == name) {
                let (open_idx, _) = stack.remove(pos);
                paired[open_idx] = Some(i);
            }
        } else if let Some(name) = opening_name(tag) {
            stack.push((i, name));
        }
    }

    // Outermost protected ranges; nested tags are absorbed by their parent.
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut i = 0;
    while i < tags.len() {
        match paired[i] {
            Some(close_idx) => {
                ranges.push(tags[i].start..tags[close_idx].end);
                i = close_idx + 1;
            }
            None => {
                ranges.push(tags[i].clone());
                i += 1;
            }
        }
    }

    let mut out = Vec::new();
    let mut last = 0;
    for range in ranges {
        if range.start > last {
            out.push(Piece::Free(&input[last..range.start]));
        }
        out.push(Piece::Protected(&input[range.clone()]));
        last = range.end;
    }
    if last < input.len() {
        out.push(Piece::Free(&input[last..]));
    }
    out
}

/// The ordered protected regions of `input`, exactly as they appear.
pub fn protected_spans(input: &str) -> Vec<&str> {
    pieces(input)
        .into_iter()
        .filter_map(|p| match p {
            Piece::Protected(s) => Some(s),
            Piece::Free(_) => None,
        })
        .collect()
}

/// Element name of a `</name>` closing tag.
fn closing_name(tag: &str) -> Option<&str> {
    let rest = tag.strip_prefix("</")?.strip_suffix('>')?;
    (!rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric())).then_some(rest)
}

/// Element name of a `<name ...>` opening tag, if it has one.
fn opening_name(tag: &str) -> Option<&str> {
    let rest = tag.strip_prefix('<')?.strip_suffix('>')?;
    if rest.starts_with('/') {
        return None;
    }
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}
