//! Boundary-marker text chunker.
//!
//! Splits file text into pieces that respect a configured `chunk_size`
//! limit, cutting at the highest-priority boundary marker that fits:
//! function definitions first, then class definitions, blank lines, line
//! breaks, and finally single spaces. Consecutive pieces overlap by
//! `chunk_overlap` bytes so retrieval keeps context across cut points.
//!
//! The cut points tile the input exactly: discarding the overlap prefix of
//! every non-first piece and concatenating the rest reproduces the input
//! byte-for-byte. Lengths are measured in bytes; all markers are ASCII, so
//! every cut lands on a UTF-8 character boundary (overlap starts are
//! snapped forward to one).

/// Boundary markers tried in priority order. The second field is how many
/// bytes of the marker stay with the preceding piece when a cut is made
/// there (the leading newline, or the space itself), so the remainder of
/// the marker opens the next piece and no input byte is lost.
const BOUNDARY_MARKERS: &[(&str, usize)] = &[
    ("\ndef ", 1),
    ("\nclass ", 1),
    ("\n\n", 2),
    ("\n", 1),
    (" ", 1),
];

/// Split text into pieces of at most `chunk_size` bytes with
/// `chunk_overlap` bytes of overlap between consecutive pieces.
///
/// A piece may exceed `chunk_size` only when its window holds no boundary
/// marker at all — an unsplittable run of at least `chunk_size -
/// chunk_overlap` marker-free bytes. Such a run is emitted whole (extending
/// to the next marker or end of input) rather than truncated. Empty input
/// yields an empty vector.
///
/// Callers must ensure `chunk_overlap < chunk_size` (enforced by config
/// validation); otherwise a chunk's overlap prefix could consume its whole
/// limit.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    // Start of the not-yet-emitted remainder.
    let mut pos = 0usize;

    while pos < text.len() {
        let overlap = if chunks.is_empty() {
            0
        } else {
            chunk_overlap.min(pos)
        };
        let mut start = pos - overlap;
        while !text.is_char_boundary(start) {
            start += 1;
        }

        let limit = start + chunk_size;
        let end = if text.len() <= limit {
            text.len()
        } else {
            match best_cut(text, pos, limit) {
                Some(cut) => cut,
                // No marker fits in the window: an unsplittable run.
                // Emit it whole, up to the next marker or end of input.
                None => next_cut(text, limit).unwrap_or(text.len()),
            }
        };

        chunks.push(text[start..end].to_string());
        pos = end;
    }

    chunks
}

/// Find the best cut position in `(pos, limit]`: the last occurrence of
/// the highest-priority marker whose cut point still fits the limit.
fn best_cut(text: &str, pos: usize, limit: usize) -> Option<usize> {
    for &(marker, keep) in BOUNDARY_MARKERS {
        let region = &text[pos..];
        let mut best = None;
        let mut from = 0;

        while let Some(found) = region[from..].find(marker) {
            let cut = pos + from + found + keep;
            if cut > limit {
                break;
            }
            best = Some(cut);
            from += found + 1;
        }

        if best.is_some() {
            return best;
        }
    }
    None
}

/// First marker cut at or after `from`, for terminating an unsplittable run.
fn next_cut(text: &str, from: usize) -> Option<usize> {
    let mut from = from.min(text.len());
    while !text.is_char_boundary(from) {
        from -= 1;
    }

    BOUNDARY_MARKERS
        .iter()
        .filter_map(|&(marker, keep)| text[from..].find(marker).map(|occ| from + occ + keep))
        .min()
}
