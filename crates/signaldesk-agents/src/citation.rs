//! Turn narrative text with bracketed citation markers into structured
//! segments that a front end can render as links or hover lists.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use signaldesk_models::Source;
use url::Url;

static CITATION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+(?:,\s*\d+)*\]").expect("citation pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedNarrative {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Citation(Citation),
}

/// One bracketed marker such as `[2]` or `[1,3]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// The marker exactly as it appeared in the text.
    pub label: String,
    pub kind: CitationKind,
    /// Resolved sources, in marker order. Empty for inert citations.
    pub sources: Vec<CitedSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationKind {
    /// No index resolved to a source; shown as plain superscript.
    Inert,
    /// Exactly one resolved source with a web uri.
    Link { uri: String },
    /// Several sources, or one without a uri. Shown emphasized with a hover
    /// list.
    Emphasized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitedSource {
    /// 1-based, as written in the marker.
    pub number: usize,
    pub title: String,
    pub uri: Option<String>,
}

/// Split `text` into paragraphs and citation segments resolved against
/// `sources`. Never fails: bad indices just make a citation inert.
pub fn render_narrative(text: &str, sources: &[Source]) -> RenderedNarrative {
    let paragraphs = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| render_paragraph(line, sources))
        .collect();
    RenderedNarrative { paragraphs }
}

fn render_paragraph(line: &str, sources: &[Source]) -> Paragraph {
    let mut segments = Vec::new();
    let mut last = 0;

    for token in CITATION_TOKEN.find_iter(line) {
        if token.start() > last {
            segments.push(Segment::Text(line[last..token.start()].to_string()));
        }
        segments.push(Segment::Citation(resolve_citation(token.as_str(), sources)));
        last = token.end();
    }
    if last < line.len() {
        segments.push(Segment::Text(line[last..].to_string()));
    }

    Paragraph { segments }
}

fn resolve_citation(label: &str, sources: &[Source]) -> Citation {
    let cited: Vec<CitedSource> = label
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter_map(|number| {
            let source = sources.get(number.checked_sub(1)?)?;
            Some(CitedSource {
                number,
                title: source_display_title(source),
                uri: source.uri().map(str::to_string),
            })
        })
        .collect();

    let kind = match cited.as_slice() {
        [] => CitationKind::Inert,
        [only] => match &only.uri {
            Some(uri) => CitationKind::Link { uri: uri.clone() },
            None => CitationKind::Emphasized,
        },
        _ => CitationKind::Emphasized,
    };

    Citation {
        label: label.to_string(),
        kind,
        sources: cited,
    }
}

/// The title, else the uri's host without `www.`, else the raw uri.
pub fn source_display_title(source: &Source) -> String {
    if let Some(title) = source.title() {
        return title.trim().to_string();
    }
    match source.uri() {
        Some(uri) => source_host(uri).unwrap_or_else(|| uri.to_string()),
        None => "Unknown source".to_string(),
    }
}

/// Host of `uri` with a leading `www.` removed, if the uri parses.
pub fn source_host(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

impl RenderedNarrative {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Every citation in reading order.
    pub fn citations(&self) -> impl Iterator<Item = &Citation> {
        self.paragraphs.iter().flat_map(|p| {
            p.segments.iter().filter_map(|s| match s {
                Segment::Citation(c) => Some(c),
                Segment::Text(_) => None,
            })
        })
    }

    /// Paragraphs separated by blank lines. Link citations become markdown
    /// links, emphasized ones bold, inert ones stay as written.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for (i, paragraph) in self.paragraphs.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            for segment in &paragraph.segments {
                match segment {
                    Segment::Text(text) => out.push_str(text),
                    Segment::Citation(citation) => match &citation.kind {
                        CitationKind::Inert => out.push_str(&citation.label),
                        CitationKind::Link { uri } => {
                            let _ = write!(out, "[{}]({uri})", citation.label);
                        }
                        CitationKind::Emphasized => {
                            let _ = write!(out, "**{}**", citation.label);
                        }
                    },
                }
            }
        }
        out
    }

    /// The text with markers kept verbatim, one paragraph per line.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| {
                p.segments
                    .iter()
                    .map(|s| match s {
                        Segment::Text(text) => text.as_str(),
                        Segment::Citation(c) => c.label.as_str(),
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
