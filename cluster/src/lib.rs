//! Cosine k-means over unit-length embeddings.
//!
//! # Usage
//!
//! ```
//! use personalens_cluster::{kmeans_cosine, summarize_clusters};
//!
//! let vectors = vec![
//!     vec![1.0, 0.0],
//!     vec![0.99, 0.14],
//!     vec![-1.0, 0.0],
//!     vec![-0.99, -0.14],
//! ];
//! let km = kmeans_cosine(&vectors, 2, 42, 25).unwrap();
//! assert_eq!(km.assignments.len(), 4);
//!
//! let clusters = summarize_clusters(&vectors, &km, 6, |i| vec![format!("item{i}")]);
//! assert_eq!(clusters.iter().map(|c| c.size).sum::<usize>(), 4);
//! ```
//!
//! Vectors must already be unit length: similarity is the plain dot
//! product. Identical `(vectors, k, seed, max_iterations)` always produce
//! identical assignments and centroids.

mod config;
mod error;
mod kmeans;
mod summary;

pub use config::ClusterConfig;
pub use error::ClusterError;
pub use kmeans::{kmeans_cosine, KMeans};
pub use summary::{summarize_clusters, ClusterSummary};
