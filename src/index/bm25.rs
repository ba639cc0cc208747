//! Okapi BM25 over an ephemeral corpus.

use std::collections::HashMap;

use crate::chunking::tokenize;

pub const BM25_K1: f32 = 1.5;
pub const BM25_B: f32 = 0.75;
/// Fraction of the mean IDF substituted for non-positive IDF values.
pub const BM25_EPSILON: f32 = 0.25;

/// In-memory BM25 index built once per query.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    doc_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    avgdl: f32,
    idf: HashMap<String, f32>,
}

impl Bm25Index {
    pub fn new<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut doc_freqs = Vec::with_capacity(documents.len());
        let mut doc_lens = Vec::with_capacity(documents.len());
        let mut df: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = tokenize(doc.as_ref());
            doc_lens.push(tokens.len());

            let mut freqs: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *freqs.entry(token).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
            doc_freqs.push(freqs);
        }

        let n = documents.len() as f32;
        let avgdl = if documents.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f32 / n
        };

        let mut idf: HashMap<String, f32> = HashMap::with_capacity(df.len());
        let mut idf_sum = 0.0f32;
        let mut non_positive: Vec<String> = Vec::new();
        for (term, freq) in df {
            let freq = freq as f32;
            let value = ((n - freq + 0.5) / (freq + 0.5)).ln();
            idf_sum += value;
            if value <= 0.0 {
                non_positive.push(term.clone());
            }
            idf.insert(term, value);
        }

        if !idf.is_empty() {
            let floor = BM25_EPSILON * (idf_sum / idf.len() as f32);
            for term in non_positive {
                idf.insert(term, floor);
            }
        }

        Self {
            doc_freqs,
            doc_lens,
            avgdl,
            idf,
        }
    }

    pub fn len(&self) -> usize {
        self.doc_lens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lens.is_empty()
    }

    /// Score of every document against `query`, in document order.
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let terms = tokenize(query);

        self.doc_freqs
            .iter()
            .zip(self.doc_lens.iter())
            .map(|(freqs, &len)| {
                let norm = if self.avgdl > 0.0 {
                    1.0 - BM25_B + BM25_B * len as f32 / self.avgdl
                } else {
                    1.0
                };

                terms
                    .iter()
                    .map(|term| {
                        let tf = freqs.get(term).copied().unwrap_or(0) as f32;
                        let idf = self.idf.get(term).copied().unwrap_or(0.0);
                        idf * (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * norm)
                    })
                    .sum()
            })
            .collect()
    }

    /// Indices of the `min(k, len)` best documents, highest score first.
    ///
    /// Zero-score documents still fill the list; equal scores keep document order.
    pub fn top_k(&self, query: &str, k: usize) -> Vec<usize> {
        let scores = self.scores(query);
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order.truncate(k);
        order
    }
}
