//! Per-user mutual exclusion for reconciliation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{Error, models::UserID};

/// A registry of one lock per user.
///
/// Holding a user's lock for the whole "mutate, reload, recompute, persist"
/// sequence stops two requests for the same user from interleaving and
/// corrupting the chain of carried-over savings. Different users have
/// different locks, so their rebuilds do not wait on each other.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserID, Arc<Mutex<()>>>>,
}

impl UserLocks {
    /// Create an empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `user_id`.
    ///
    /// # Errors
    /// Returns [Error::UserLockError] if the registry itself is poisoned,
    /// otherwise whatever `f` returns.
    pub fn with_lock<T>(
        &self,
        user_id: UserID,
        f: impl FnOnce() -> Result<T, Error>,
    ) -> Result<T, Error> {
        let user_lock = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|_| Error::UserLockError(user_id.as_i64()))?;

            locks.entry(user_id).or_default().clone()
        };

        // The lock guards no data, so a poisoned lock is safe to reuse.
        let _guard = user_lock.lock().unwrap_or_else(PoisonError::into_inner);

        f()
    }

    /// Drop the lock for a user that no longer exists.
    ///
    /// The entry is kept while any caller still holds or waits on the lock,
    /// otherwise a later caller would get a fresh lock and run alongside them.
    pub fn forget(&self, user_id: UserID) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };

        if locks
            .get(&user_id)
            .is_some_and(|user_lock| Arc::strong_count(user_lock) == 1)
        {
            locks.remove(&user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            mpsc,
        },
        thread,
        time::Duration,
    };

    use crate::{Error, models::UserID};

    use super::UserLocks;

    #[test]
    fn returns_closure_result() {
        let locks = UserLocks::new();

        assert_eq!(locks.with_lock(UserID::new(1), || Ok(7)), Ok(7));
        assert_eq!(
            locks.with_lock(UserID::new(1), || Err::<(), _>(Error::NotFound)),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn same_user_is_serialised() {
        let locks = UserLocks::new();
        let inside = AtomicUsize::new(0);
        let max_inside = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    locks
                        .with_lock(UserID::new(1), || {
                            let now_inside = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_inside.fetch_max(now_inside, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(5));
                            inside.fetch_sub(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lock_survives_a_panicking_holder() {
        let locks = UserLocks::new();

        let result = thread::scope(|scope| {
            scope
                .spawn(|| locks.with_lock(UserID::new(1), || -> Result<(), Error> { panic!("boom") }))
                .join()
        });
        assert!(result.is_err());

        assert_eq!(locks.with_lock(UserID::new(1), || Ok("still usable")), Ok("still usable"));
    }

    /// Record how many callers are inside the lock at once.
    fn hold(inside: &AtomicUsize, max_inside: &AtomicUsize) {
        let now_inside = inside.fetch_add(1, Ordering::SeqCst) + 1;
        max_inside.fetch_max(now_inside, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        inside.fetch_sub(1, Ordering::SeqCst);
    }

    #[test]
    fn forget_keeps_a_lock_that_is_held() {
        let locks = UserLocks::new();
        let inside = AtomicUsize::new(0);
        let max_inside = AtomicUsize::new(0);
        let (entered_sender, entered_receiver) = mpsc::channel();

        thread::scope(|scope| {
            scope.spawn(|| {
                locks
                    .with_lock(UserID::new(1), || {
                        entered_sender.send(()).unwrap();
                        hold(&inside, &max_inside);
                        Ok(())
                    })
                    .unwrap();
            });

            entered_receiver.recv().unwrap();
            locks.forget(UserID::new(1));
            locks
                .with_lock(UserID::new(1), || {
                    hold(&inside, &max_inside);
                    Ok(())
                })
                .unwrap();
        });

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn forget_removes_an_idle_lock() {
        let locks = UserLocks::new();
        locks.with_lock(UserID::new(1), || Ok(())).unwrap();
        locks.with_lock(UserID::new(2), || Ok(())).unwrap();

        locks.forget(UserID::new(1));

        let registry = locks.locks.lock().unwrap();
        assert!(!registry.contains_key(&UserID::new(1)));
        assert!(registry.contains_key(&UserID::new(2)));
    }
}
