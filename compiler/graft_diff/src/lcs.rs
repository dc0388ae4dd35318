//! Longest common subsequence over node sequences.

/// Index pairs `(i, j)` of one longest common subsequence of `xs` and `ys`
/// under `eq`, in increasing order. Ties prefer earlier elements of `xs`.
pub(crate) fn lcs<T: Copy, U: Copy>(
    xs: &[T],
    ys: &[U],
    mut eq: impl FnMut(T, U) -> bool,
) -> Vec<(usize, usize)> {
    let (n, m) = (xs.len(), ys.len());
    if n == 0 || m == 0 {
        return Vec::new();
    }
    // table[i][j] = LCS length of xs[i..] and ys[j..]
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    let mut matches = vec![false; n * m];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            let same = eq(xs[i], ys[j]);
            matches[i * m + j] = same;
            table[i * width + j] = if same {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }
    let mut out = Vec::with_capacity(table[0] as usize);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if matches[i * m + j] && table[i * width + j] == table[(i + 1) * width + j + 1] + 1 {
            out.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}
