//! Ratcliff/Obershelp similarity: `2·M / (|a| + |b|)`, where M is the total
//! length of the longest common blocks found recursively left and right of
//! each match. Ties pick the block that starts earliest in `a`, then in `b`.

pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_block(a, b, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// `(start in a, start in b, length)` of the longest common run inside the windows.
fn longest_block(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best) = (alo, blo, 0);
    // run[j + 1] = length of the common run ending at (i - 1, j)
    let mut run = vec![0usize; b.len() + 1];
    for i in alo..ahi {
        let mut next = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = run[j] + 1;
                next[j + 1] = k;
                if k > best {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best = k;
                }
            }
        }
        run = next;
    }
    (best_i, best_j, best)
}
