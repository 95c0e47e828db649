//! Inline span recognition: code, bold, italic and links, in that order.
//!
//! Each pass sees the line as a run of characters interleaved with the spans
//! earlier passes produced. Those spans are opaque: a later pass may wrap one
//! whole, but never looks inside it or splits it.

use crate::block::Span;

enum Piece {
    Char(char),
    Node(Span),
}

/// Parse one line (or one joined blockquote) of raw text into spans.
pub fn parse(text: &str) -> Vec<Span> {
    let spans = code_spans(text);
    let spans = delimited(spans, "**", Span::Bold);
    let spans = delimited(spans, "*", Span::Italic);
    links(spans)
}

fn code_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('`') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('`') else {
            break;
        };
        if close == 0 {
            // Empty pair; the second backtick may still open a span.
            push_text(&mut spans, &rest[..=open]);
            rest = after;
            continue;
        }
        push_text(&mut spans, &rest[..open]);
        spans.push(Span::Code(after[..close].to_string()));
        rest = &after[close + 1..];
    }

    push_text(&mut spans, rest);
    spans
}

fn push_text(spans: &mut Vec<Span>, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(Span::Text(existing)) => existing.push_str(text),
        _ => spans.push(Span::Text(text.to_string())),
    }
}

/// Wrap the shortest non-empty runs enclosed by `marker` pairs.
fn delimited(spans: Vec<Span>, marker: &str, wrap: fn(Vec<Span>) -> Span) -> Vec<Span> {
    let spans = spans
        .into_iter()
        .map(|span| descend(span, &|children: Vec<Span>| delimited(children, marker, wrap)))
        .collect();
    let pieces = to_pieces(spans);
    let marker: Vec<char> = marker.chars().collect();
    let n = marker.len();

    let marker_at = |i: usize| {
        i + n <= pieces.len()
            && marker
                .iter()
                .zip(&pieces[i..i + n])
                .all(|(m, p)| matches!(p, Piece::Char(c) if c == m))
    };

    let mut ranges = Vec::new();
    let mut i = 0;
    while i + n <= pieces.len() {
        if !marker_at(i) {
            i += 1;
            continue;
        }
        // No closer for this opener means none for any later opener either.
        let Some(close) = (i + n + 1..=pieces.len() - n).find(|&j| marker_at(j)) else {
            break;
        };
        ranges.push((i, close));
        i = close + n;
    }

    if ranges.is_empty() {
        return from_pieces(pieces);
    }

    let mut out = Vec::with_capacity(pieces.len());
    let mut iter = pieces.into_iter();
    let mut pos = 0;
    for (open, close) in ranges {
        out.extend(iter.by_ref().take(open - pos));
        let inner: Vec<Piece> = iter.by_ref().skip(n).take(close - open - n).collect();
        iter.by_ref().nth(n - 1);
        out.push(Piece::Node(wrap(from_pieces(inner))));
        pos = close + n;
    }
    out.extend(iter);

    from_pieces(out)
}

struct LinkMatch {
    open: usize,
    label_end: usize,
    end: usize,
    url: String,
}

fn links(spans: Vec<Span>) -> Vec<Span> {
    let spans = spans
        .into_iter()
        .map(|span| descend(span, &links))
        .collect();
    let pieces = to_pieces(spans);

    let mut found = Vec::new();
    let mut closes = None;
    // Cached position of the next `]`.
    let mut next_bracket: Option<usize> = None;
    let mut i = 0;
    while i < pieces.len() {
        if !matches!(pieces[i], Piece::Char('[')) {
            i += 1;
            continue;
        }
        let label_end = match next_bracket {
            Some(j) if j > i => j,
            _ => match (i + 1..pieces.len()).find(|&j| matches!(pieces[j], Piece::Char(']'))) {
                Some(j) => j,
                None => break,
            },
        };
        next_bracket = Some(label_end);

        if label_end > i + 1 && matches!(pieces.get(label_end + 1), Some(Piece::Char('('))) {
            let start = label_end + 2;
            let closes = closes.get_or_insert_with(|| target_closes(&pieces));
            if let Some(end) = closes.get(start).copied().flatten().filter(|&end| end > start) {
                let url = pieces[start..end]
                    .iter()
                    .filter_map(|piece| match piece {
                        Piece::Char(c) => Some(*c),
                        Piece::Node(_) => None,
                    })
                    .collect();
                found.push(LinkMatch {
                    open: i,
                    label_end,
                    end,
                    url,
                });
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }

    if found.is_empty() {
        return from_pieces(pieces);
    }

    let mut out = Vec::with_capacity(pieces.len());
    let mut iter = pieces.into_iter();
    let mut pos = 0;
    for m in found {
        out.extend(iter.by_ref().take(m.open - pos));
        let label: Vec<Piece> = iter.by_ref().skip(1).take(m.label_end - m.open - 1).collect();
        // `](`, the target and `)`
        iter.by_ref().nth(m.end - m.label_end);
        out.push(Piece::Node(Span::Link {
            url: m.url,
            content: from_pieces(label),
        }));
        pos = m.end + 1;
    }
    out.extend(iter);

    from_pieces(out)
}

/// For each position, the `)` that would close a link target starting there.
/// Parentheses inside the target must balance; when they can't, the first `)`
/// closes it. A span from an earlier pass ends the target.
fn target_closes(pieces: &[Piece]) -> Vec<Option<usize>> {
    let mut closes = vec![None; pieces.len()];
    // Unmatched `)` to the right, nearest last.
    let mut unmatched = Vec::new();
    let mut first_paren = None;

    for (j, piece) in pieces.iter().enumerate().rev() {
        match piece {
            Piece::Node(_) => {
                unmatched.clear();
                first_paren = None;
            }
            Piece::Char(')') => {
                unmatched.push(j);
                first_paren = Some(j);
            }
            Piece::Char('(') => {
                unmatched.pop();
            }
            Piece::Char(_) => {}
        }
        closes[j] = unmatched.last().copied().or(first_paren);
    }

    closes
}

fn descend(span: Span, pass: &dyn Fn(Vec<Span>) -> Vec<Span>) -> Span {
    match span {
        Span::Bold(children) => Span::Bold(pass(children)),
        Span::Italic(children) => Span::Italic(pass(children)),
        Span::Link { url, content } => Span::Link {
            url,
            content: pass(content),
        },
        other => other,
    }
}

fn to_pieces(spans: Vec<Span>) -> Vec<Piece> {
    let mut pieces = Vec::new();
    for span in spans {
        match span {
            Span::Text(text) => pieces.extend(text.chars().map(Piece::Char)),
            other => pieces.push(Piece::Node(other)),
        }
    }
    pieces
}

fn from_pieces(pieces: Vec<Piece>) -> Vec<Span> {
    let mut spans = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Char(c) => match spans.last_mut() {
                Some(Span::Text(text)) => text.push(c),
                _ => spans.push(Span::Text(c.to_string())),
            },
            Piece::Node(span) => spans.push(span),
        }
    }
    spans
}
