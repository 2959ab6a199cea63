// Single-writer admission for ingest and rollback

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;

use crate::error::IndexerError;

/// Process-wide mutual exclusion for the write path. Waiters queue FIFO
/// (tokio's mutex is fair) and give up after the caller's TTL. Reads
/// never touch the gate.
#[derive(Clone, Default)]
pub struct WriteGate {
    inner: Arc<Mutex<()>>,
}

/// Held for the duration of one write operation; released on drop.
pub struct WriteGuard {
    _permit: OwnedMutexGuard<()>,
}

impl WriteGate {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(())),
        }
    }

    /// Wait up to `ttl` for exclusive write access.
    pub async fn acquire(&self, ttl: Duration) -> Result<WriteGuard, IndexerError> {
        match timeout(ttl, Arc::clone(&self.inner).lock_owned()).await {
            Ok(permit) => Ok(WriteGuard { _permit: permit }),
            Err(_) => Err(IndexerError::MutexTimeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_times_out_while_held() {
        let gate = WriteGate::new();
        let _held = gate.acquire(Duration::from_millis(100)).await.unwrap();

        let result = gate.acquire(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(IndexerError::MutexTimeout)));
    }

    #[tokio::test]
    async fn acquire_succeeds_after_release() {
        let gate = WriteGate::new();
        {
            let _held = gate.acquire(Duration::from_millis(100)).await.unwrap();
        }
        assert!(gate.acquire(Duration::from_millis(100)).await.is_ok());
    }

    #[tokio::test]
    async fn waiters_are_admitted_in_arrival_order() {
        let gate = WriteGate::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let held = gate.acquire(Duration::from_millis(500)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..3u32 {
            let gate = gate.clone();
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                let _guard = gate.acquire(Duration::from_secs(5)).await.unwrap();
                order.lock().await.push(i);
            }));
            // Let each waiter enqueue before spawning the next
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        drop(held);
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().await, vec![0, 1, 2]);
    }
}
