//! Edit-distance similarity scoring
//!
//! Lengths and edits are counted in chars so that multi-byte names score the
//! same way their ASCII counterparts do.

/// Levenshtein distance with unit cost insertions, deletions and substitutions
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let b_chars: Vec<char> = b.chars().collect();
    let m = b_chars.len();
    if a.is_empty() {
        return m;
    }
    if m == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0; m + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// Normalized similarity in [0, 1], 1.0 meaning identical
///
/// Score is `(len(longer) - distance) / len(longer)`; two empty strings score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let longer_len = a_len.max(b_len);

    if longer_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(a, b);
    (longer_len - distance) as f64 / longer_len as f64
}
