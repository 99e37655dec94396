//! Approximate string similarity used for sanctions screening.
//!
//! Scores are on a 0-100 scale. [`ratio`] is the normalized InDel similarity
//! (Levenshtein distance where a substitution costs two edits), which reduces
//! to `2 * LCS / (len_a + len_b)`. [`partial_ratio`] slides the shorter string
//! across the longer one and keeps the best window.

/// Length of the longest common subsequence of `a` and `b`.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Two rolling rows over `b`.
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Whole-string similarity of `a` and `b` in `[0, 100]`.
#[cfg(test)]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best whole-string similarity between the shorter string and every same-length window of the longer.
///
/// Which side is "shorter" is decided per call from the two lengths, so the
/// function is symmetric in its arguments. Equal lengths yield a single window
/// (the plain whole-string similarity). Either string empty yields 0.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut best = 0.0f64;
    for window in longer.windows(shorter.len()) {
        let score = ratio_chars(shorter, window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Capitalize the first letter of every run of letters and lower-case the rest.
///
/// `"vladimir putin"` → `"Vladimir Putin"`, `"o'neil"` → `"O'Neil"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}
