//! Dense vector helpers shared by the scoring and clustering engines.
//!
//! Sums use f64 intermediate precision.

/// Dot product. Equals cosine similarity when both inputs are unit length.
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum()
}

/// Euclidean norm.
pub fn norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt()
}

/// Cosine similarity between two arbitrary vectors. Returns 0 if either is zero.
pub fn cosine_sim(a: &[f32], b: &[f32]) -> f64 {
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    dot(a, b) / denom
}

/// Normalizes a vector to unit length in-place. Zero vectors are left as-is.
pub fn l2_normalize(v: &mut [f32]) {
    let n = norm(v);
    if n > 0.0 {
        let scale = (1.0 / n) as f32;
        for x in v.iter_mut() {
            *x *= scale;
        }
    }
}

/// Mean of the selected rows, re-normalized to unit length.
///
/// `eps` is added to the norm before dividing, so a mean that cancels out
/// stays finite. Returns `None` when `rows` is empty.
pub fn unit_mean<'a, I>(rows: I, dim: usize, eps: f64) -> Option<Vec<f32>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut acc = vec![0.0f64; dim];
    let mut count = 0usize;
    for row in rows {
        for (a, &x) in acc.iter_mut().zip(row.iter()) {
            *a += x as f64;
        }
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = count as f64;
    for a in acc.iter_mut() {
        *a /= n;
    }
    let len = acc.iter().map(|x| x * x).sum::<f64>().sqrt() + eps;
    Some(acc.into_iter().map(|x| (x / len) as f32).collect())
}
