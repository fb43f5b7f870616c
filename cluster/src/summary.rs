use personalens_embed::vector::dot;
use serde::Serialize;

use crate::kmeans::KMeans;

/// Description of one cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub cluster_id: usize,
    pub size: usize,
    pub label: String,
    /// Member most similar to the centroid; `None` for an empty cluster.
    pub representative_index: Option<usize>,
    pub top_keywords: Vec<String>,
    /// Mean member similarity to the centroid; `None` for an empty cluster.
    pub avg_similarity: Option<f64>,
    #[serde(skip)]
    pub members: Vec<usize>,
    #[serde(skip)]
    pub centroid: Vec<f32>,
}

/// Builds per-cluster summaries from a k-means result.
///
/// `keywords(i)` returns the ranked keywords of item `i`. The label uses the
/// representative's keywords first; when it yields fewer than
/// `keyword_count`, the list is backfilled with the keywords most frequent
/// across all members. Labels join the top three keywords with `" / "`.
pub fn summarize_clusters<V, F>(
    vectors: &[V],
    km: &KMeans,
    keyword_count: usize,
    mut keywords: F,
) -> Vec<ClusterSummary>
where
    V: AsRef<[f32]>,
    F: FnMut(usize) -> Vec<String>,
{
    km.members()
        .into_iter()
        .enumerate()
        .map(|(id, members)| {
            let centroid = km.centroids.get(id).cloned().unwrap_or_default();
            if members.is_empty() {
                return ClusterSummary {
                    cluster_id: id,
                    size: 0,
                    label: format!("Cluster {id}"),
                    representative_index: None,
                    top_keywords: Vec::new(),
                    avg_similarity: None,
                    members,
                    centroid,
                };
            }

            let sims: Vec<f64> = members
                .iter()
                .map(|&i| dot(vectors[i].as_ref(), &centroid))
                .collect();
            let avg = sims.iter().sum::<f64>() / sims.len() as f64;

            let mut rep_local = 0;
            for (j, &s) in sims.iter().enumerate() {
                if s > sims[rep_local] {
                    rep_local = j;
                }
            }
            let rep = members[rep_local];

            let mut kw = keywords(rep);
            kw.truncate(keyword_count);
            if kw.len() < keyword_count {
                let mut freq: Vec<(String, usize)> = Vec::new();
                for &i in &members {
                    for word in keywords(i).into_iter().take(keyword_count) {
                        match freq.iter_mut().find(|(w, _)| *w == word) {
                            Some((_, n)) => *n += 1,
                            None => freq.push((word, 1)),
                        }
                    }
                }
                freq.sort_by(|a, b| b.1.cmp(&a.1));
                for (word, _) in freq {
                    if kw.len() >= keyword_count {
                        break;
                    }
                    if !kw.contains(&word) {
                        kw.push(word);
                    }
                }
            }

            let label = if kw.is_empty() {
                format!("Cluster {id}")
            } else {
                kw.iter().take(3).cloned().collect::<Vec<_>>().join(" / ")
            };

            ClusterSummary {
                cluster_id: id,
                size: members.len(),
                label,
                representative_index: Some(rep),
                top_keywords: kw,
                avg_similarity: Some(avg),
                members,
                centroid,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn km(assignments: Vec<usize>, centroids: Vec<Vec<f32>>) -> KMeans {
        KMeans {
            k: centroids.len(),
            assignments,
            centroids,
            iterations: 1,
            converged: true,
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn representative_and_label() {
        let vectors = vec![vec![0.8f32, 0.6], vec![1.0, 0.0], vec![0.0, 1.0]];
        let result = km(vec![0, 0, 1], vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let kws = [
            words(&["alpha", "beta"]),
            words(&["rust", "cargo", "crate", "trait"]),
            words(&["audio"]),
        ];
        let out = summarize_clusters(&vectors, &result, 3, |i| kws[i].clone());

        assert_eq!(out[0].representative_index, Some(1));
        assert_eq!(out[0].size, 2);
        assert_eq!(out[0].top_keywords, words(&["rust", "cargo", "crate"]));
        assert_eq!(out[0].label, "rust / cargo / crate");
        assert!((out[0].avg_similarity.unwrap() - 0.9).abs() < 1e-6);
        assert_eq!(out[1].label, "audio");
    }

    #[test]
    fn backfill_by_member_frequency() {
        let vectors = vec![vec![1.0f32, 0.0], vec![0.9, 0.1], vec![0.9, -0.1]];
        let result = km(vec![0, 0, 0], vec![vec![1.0, 0.0]]);
        let kws = [
            words(&["launch"]),
            words(&["pricing", "launch"]),
            words(&["pricing", "growth"]),
        ];
        let out = summarize_clusters(&vectors, &result, 4, |i| kws[i].clone());
        // launch and pricing both appear twice; launch was seen first.
        assert_eq!(out[0].top_keywords, words(&["launch", "pricing", "growth"]));
        assert_eq!(out[0].label, "launch / pricing / growth");
    }

    #[test]
    fn empty_cluster_gets_placeholder() {
        let vectors = vec![vec![1.0f32, 0.0], vec![0.9, 0.1]];
        let result = km(vec![0, 0], vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let out = summarize_clusters(&vectors, &result, 6, |_| Vec::new());
        assert_eq!(out[0].label, "Cluster 0");
        assert_eq!(out[1].size, 0);
        assert_eq!(out[1].label, "Cluster 1");
        assert_eq!(out[1].representative_index, None);
        assert_eq!(out[1].avg_similarity, None);
    }
}
