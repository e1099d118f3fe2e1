use crate::text::spans::{pieces, protected_spans, Piece};
use crate::text::width::to_fullwidth;

/// Enforces the two mechanical proofreading rules on a model reply:
///
/// 1. Protected regions must survive byte-for-byte. When the reply carries
///    the same number of regions as the source, each one is spliced back
///    from the source verbatim, so the model cannot tamper inside tags.
/// 2. Half-width Latin letters and half-width katakana outside protected
///    regions are converted to full-width (digits exempt).
///
/// A reply whose region count diverges from the source keeps its own tags;
/// that case is logged and left to the tone/content rules the prompt already
/// carries.
pub fn enforce_output_contract(source: &str, reply: &str) -> String {
    let source_spans = protected_spans(source);
    let reply_pieces = pieces(reply);
    let reply_span_count = reply_pieces
        .iter()
        .filter(|p| matches!(p, Piece::Protected(_)))
        .count();

    let splice = source_spans.len() == reply_span_count;
    if !splice && !source_spans.is_empty() {
        tracing::warn!(
            source_spans = source_spans.len(),
            reply_spans = reply_span_count,
            "tag span count changed in reply; keeping reply spans as-is"
        );
    }

    let mut out = String::with_capacity(reply.len());
    let mut span_iter = source_spans.iter();
    for piece in reply_pieces {
        match piece {
            Piece::Free(t) => out.push_str(&to_fullwidth(t)),
            Piece::Protected(t) => match span_iter.next() {
                Some(original) if splice => out.push_str(original),
                _ => out.push_str(t),
            },
        }
    }
    out
}
