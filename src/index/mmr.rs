use crate::similarity::cosine_similarity;

/// Greedy maximal marginal relevance selection.
///
/// Returns up to `k` indices into `candidates`. The first pick is the most relevant candidate;
/// each later pick maximises `lambda * sim(query, c) - (1 - lambda) * max sim(c, selected)`.
/// `lambda = 1.0` is pure relevance, `0.0` pure diversity. Ties keep the earlier candidate.
pub fn maximal_marginal_relevance(
    query: &[f32],
    candidates: &[Vec<f32>],
    k: usize,
    lambda: f32,
) -> Vec<usize> {
    let k = k.min(candidates.len());
    if k == 0 {
        return Vec::new();
    }

    let relevance: Vec<f32> = candidates
        .iter()
        .map(|c| cosine_similarity(query, c))
        .collect();

    let mut selected: Vec<usize> = Vec::with_capacity(k);
    // Running max similarity of each candidate to the selected set.
    let mut redundancy = vec![f32::NEG_INFINITY; candidates.len()];

    while selected.len() < k {
        let mut best: Option<(usize, f32)> = None;

        for idx in 0..candidates.len() {
            if selected.contains(&idx) {
                continue;
            }

            let score = if selected.is_empty() {
                relevance[idx]
            } else {
                lambda * relevance[idx] - (1.0 - lambda) * redundancy[idx]
            };

            if best.is_none_or(|(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        let Some((chosen, _)) = best else {
            break;
        };
        selected.push(chosen);

        for (idx, candidate) in candidates.iter().enumerate() {
            let sim = cosine_similarity(&candidates[chosen], candidate);
            if sim > redundancy[idx] {
                redundancy[idx] = sim;
            }
        }
    }

    selected
}
