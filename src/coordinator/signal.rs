use tokio::sync::watch;

/// A level-triggered wake condition with set/clear/wait semantics.
///
/// Setting an already-set signal is a no-op. A waiter that arrives after the
/// signal was set returns immediately, so a `set` racing with the start of a
/// `wait` is never lost.
#[derive(Debug)]
pub struct Signal {
    state: watch::Sender<bool>,
}

impl Signal {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self { state }
    }

    /// Sets the signal and wakes every waiter. Returns `true` on a clear -> set transition.
    pub fn set(&self) -> bool {
        self.state.send_if_modified(|set| {
            if *set {
                false
            } else {
                *set = true;
                true
            }
        })
    }

    pub fn clear(&self) {
        self.state.send_if_modified(|set| {
            *set = false;
            false
        });
    }

    /// Clears the signal and reports whether it was set, as one atomic step.
    pub fn take(&self) -> bool {
        let mut was_set = false;
        self.state.send_if_modified(|set| {
            was_set = std::mem::replace(set, false);
            false
        });
        was_set
    }

    pub fn is_set(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once the signal is set. Does not clear it.
    pub async fn wait(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|set| *set).await;
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}
