use tokio::sync::watch;

/// Process-wide shutdown signal.
///
/// Cloned into every long-lived task; each checks (or selects on) its
/// receiver and winds down voluntarily. Triggered by the shutdown
/// sentinel command or an external signal, never forced.
#[derive(Clone)]
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx, rx }
    }

    /// Marks the process as exiting. Idempotent.
    pub fn trigger(&self) {
        // Ignore the error: it only means every receiver is already gone.
        let _ = self.tx.send(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been triggered.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        // wait_for returns immediately if the flag is already set.
        let _ = rx.wait_for(|exiting| *exiting).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
