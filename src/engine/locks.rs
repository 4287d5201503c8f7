use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// One async mutex per character id. Holding the guard serializes every
/// read-modify-write against that character; other characters proceed
/// independently. An entry lives only while someone holds or waits on it.
#[derive(Default)]
pub struct CharacterLocks {
    locks: Arc<Mutex<LockMap>>,
}

/// Held for the duration of one operation on a character.
pub struct CharacterGuard {
    guard: Option<OwnedMutexGuard<()>>,
    character_id: String,
    locks: Arc<Mutex<LockMap>>,
}

fn lock_map(locks: &Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    // Every critical section leaves the map consistent, so a poisoned guard is still usable
    locks.lock().unwrap_or_else(|e| e.into_inner())
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, character_id: &str) -> CharacterGuard {
        let lock = lock_map(&self.locks)
            .entry(character_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        CharacterGuard {
            guard: Some(lock.lock_owned().await),
            character_id: character_id.to_string(),
            locks: self.locks.clone(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        lock_map(&self.locks).len()
    }
}

impl Drop for CharacterGuard {
    fn drop(&mut self) {
        let mut locks = lock_map(&self.locks);
        // Release the mutex first so its only remaining owner can be the map
        drop(self.guard.take());
        let idle = locks
            .get(&self.character_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.character_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_character_is_serialized() {
        let locks = Arc::new(CharacterLocks::new());
        let guard = locks.lock("a").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("a").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());
        drop(guard);
        contender.await.unwrap();
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_different_characters_do_not_block() {
        let locks = CharacterLocks::new();
        let _a = locks.lock("a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_entries_released_with_last_guard() {
        let locks = CharacterLocks::new();
        for i in 0..100 {
            let _guard = locks.lock(&format!("ghost{}", i)).await;
        }
        assert_eq!(locks.len(), 0);

        let held = locks.lock("a").await;
        assert_eq!(locks.len(), 1);
        drop(held);
        assert_eq!(locks.len(), 0);
    }
}
