use once_cell::sync::OnceCell;
use tracing::info;

use crate::embed::Embedder;
use crate::error::EmbedError;

type Factory = Box<dyn Fn() -> Result<Box<dyn Embedder>, EmbedError> + Send + Sync>;

/// A provider handle that is built at most once, on first use.
///
/// Concurrent first callers block on a single initialization; every later
/// call returns the cached provider without locking. If the factory fails,
/// the error is returned and the next call tries again.
///
/// ```
/// use personalens_embed::{Embedder, HashEmbedder, Payload, SharedEmbedder};
///
/// let shared = SharedEmbedder::new(|| Ok(Box::new(HashEmbedder::new())));
/// let provider: &dyn Embedder = shared.get().unwrap();
/// let vecs = provider.embed(&[Payload::text("hello")]).unwrap();
/// assert_eq!(vecs.len(), 1);
/// ```
pub struct SharedEmbedder {
    cell: OnceCell<Box<dyn Embedder>>,
    factory: Factory,
}

impl SharedEmbedder {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Embedder>, EmbedError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Returns the provider, initializing it if this is the first call.
    pub fn get(&self) -> Result<&dyn Embedder, EmbedError> {
        let provider = self.cell.get_or_try_init(|| {
            let p = (self.factory)()?;
            info!(model = p.model_name(), dim = p.dimension(), "embedding provider ready");
            Ok::<_, EmbedError>(p)
        })?;
        Ok(provider.as_ref())
    }

    /// Reports whether the provider has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::HashEmbedder;

    #[test]
    fn initializes_once_under_contention() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let shared = Arc::new(SharedEmbedder::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(HashEmbedder::new()))
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = Arc::clone(&shared);
                thread::spawn(move || s.get().map(|p| p.dimension()).unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 256);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(shared.is_initialized());
    }

    #[test]
    fn failed_init_propagates_and_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let shared = SharedEmbedder::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(EmbedError::Init("model not found".into()))
            } else {
                Ok(Box::new(HashEmbedder::new()))
            }
        });

        assert!(matches!(shared.get(), Err(EmbedError::Init(_))));
        assert!(!shared.is_initialized());
        assert!(shared.get().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
