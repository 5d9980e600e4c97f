use std::sync::Arc;

use parking_lot::Mutex;

use super::{RegistrationToken, TopologySource};
use crate::error::DeviceResult;

/// Live endpoint notification registration.
///
/// Removes the registration exactly once: on [`unsubscribe`](Self::unsubscribe)
/// or on drop, whichever comes first.
pub struct TopologySubscription {
    topology: Arc<dyn TopologySource>,
    token: Mutex<Option<RegistrationToken>>,
}

impl TopologySubscription {
    pub(crate) fn new(topology: Arc<dyn TopologySource>, token: RegistrationToken) -> Self {
        Self {
            topology,
            token: Mutex::new(Some(token)),
        }
    }

    /// Returns true while the registration is still held.
    pub fn is_active(&self) -> bool {
        self.token.lock().is_some()
    }

    /// Removes the registration. Later calls are no-ops.
    pub fn unsubscribe(&self) -> DeviceResult<()> {
        let Some(token) = self.token.lock().take() else {
            return Ok(());
        };
        self.topology.unregister(token)?;
        log::info!("[Observer] Unregistered from endpoint notifications");
        Ok(())
    }
}

impl Drop for TopologySubscription {
    fn drop(&mut self) {
        if let Err(e) = self.unsubscribe() {
            log::warn!("[Observer] Failed to unregister endpoint notifications: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTopology;

    #[test]
    fn unsubscribe_is_idempotent() {
        let topology = Arc::new(MockTopology::with_default("D1"));
        let token = topology.register(Arc::new(crate::test_support::NullClient)).unwrap();
        let subscription = TopologySubscription::new(Arc::clone(&topology) as _, token);

        assert!(subscription.is_active());
        subscription.unsubscribe().unwrap();
        subscription.unsubscribe().unwrap();
        assert!(!subscription.is_active());
        drop(subscription);

        assert_eq!(topology.unregister_calls(), 1);
    }
}
