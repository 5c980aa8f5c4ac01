//! Trigger subscriptions
//!
//! A [`Subscription`] holds a weak reference back to the trigger that issued
//! it. Dropping or unsubscribing removes the registration; dropping the
//! trigger first simply leaves the subscription inert.

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

use slotmap::new_key_type;

new_key_type! {
    /// Identifies one registration on a trigger
    pub struct SubscriptionId;
}

/// Registration table a subscription can release itself from
pub(crate) trait Registry {
    /// Remove a registration, returning whether it existed
    fn release(&mut self, id: SubscriptionId) -> bool;

    fn contains(&self, id: SubscriptionId) -> bool;
}

/// Handle to an active trigger registration
///
/// Unregisters on drop. Hold on to it for as long as callbacks should fire.
#[must_use = "dropping a Subscription unregisters it immediately"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Option<Weak<RefCell<dyn Registry>>>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: Weak<RefCell<dyn Registry>>) -> Self {
        Self {
            id,
            registry: Some(registry),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the trigger still exists and holds this registration
    pub fn is_active(&self) -> bool {
        self.registry
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|registry| {
                registry
                    .try_borrow()
                    .map(|r| r.contains(self.id))
                    .unwrap_or(true)
            })
            .unwrap_or(false)
    }

    /// Unregister now
    ///
    /// Returns false when the trigger is gone or the registration was
    /// already removed.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) else {
            return false;
        };

        let released = match registry.try_borrow_mut() {
            Ok(mut registry) => registry.release(self.id),
            Err(_) => {
                tracing::warn!(
                    "Subscription {:?} released while its trigger was busy; it stays registered",
                    self.id
                );
                false
            }
        };
        released
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
