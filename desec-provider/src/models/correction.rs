use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::Result;

type Action = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

/// An independently executable unit of remote change with a description.
///
/// The action is deferred: building a `Correction` performs no I/O.
pub struct Correction {
    /// Human-readable description, one diff message.
    pub msg: String,
    action: Option<Action>,
}

impl Correction {
    pub fn new<F, Fut>(msg: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            msg: msg.into(),
            action: Some(Box::new(move || f().boxed())),
        }
    }

    /// Informational entry that does nothing when executed.
    pub fn noop(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            action: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.action.is_none()
    }

    pub async fn execute(self) -> Result<()> {
        match self.action {
            Some(f) => f().await,
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Correction")
            .field("msg", &self.msg)
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Result of one executed correction, keyed by its message.
#[derive(Debug)]
pub struct CorrectionOutcome {
    pub msg: String,
    pub result: Result<()>,
}

/// Runs corrections one after another. A failed correction is recorded and the rest still run.
pub async fn execute_corrections(corrections: Vec<Correction>) -> Vec<CorrectionOutcome> {
    let mut outcomes = Vec::with_capacity(corrections.len());
    for correction in corrections {
        let msg = correction.msg.clone();
        let result = correction.execute().await;
        if let Err(e) = &result {
            if e.is_expected() {
                log::warn!("Correction failed: {msg}: {e}");
            } else {
                log::error!("Correction failed: {msg}: {e}");
            }
        }
        outcomes.push(CorrectionOutcome { msg, result });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::ProviderError;

    #[tokio::test]
    async fn construction_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let correction = Correction::new("CREATE A example.com 1.2.3.4 ttl=3600", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!correction.is_noop());

        assert!(correction.execute().await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_do_not_abort_the_list() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = Arc::clone(&calls);
        let last = Arc::clone(&calls);
        let corrections = vec![
            Correction::new("first", move || async move {
                first.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::InvalidParameter {
                    provider: "desec".to_string(),
                    param: "records".to_string(),
                    detail: "bad".to_string(),
                })
            }),
            Correction::noop("second"),
            Correction::new("third", move || async move {
                last.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        ];

        let outcomes = execute_corrections(corrections).await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].msg, "first");
        assert!(outcomes[0].result.is_err());
        assert!(outcomes[1].result.is_ok());
        assert!(outcomes[2].result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_shows_message() {
        let c = Correction::noop("DELETE A www.example.com 1.2.3.4 ttl=3600");
        let s = format!("{c:?}");
        assert!(s.contains("DELETE A www.example.com"));
        assert!(s.contains("noop: true"));
    }
}
