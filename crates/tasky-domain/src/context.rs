use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::gateway::RemoteGateway;
use crate::session::{SessionBus, SessionEvent, SubscriptionId};
use crate::Profile;

/// Session-wide state handed to every consumer that needs the signed-in user.
#[derive(Debug, Default)]
pub struct AppContext {
    profile: RwLock<Option<Profile>>,
    loading: AtomicBool,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.profile.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.profile.read().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Fetch the profile of the active session.
    ///
    /// A failed fetch is logged and leaves the context without a profile.
    pub async fn start_session(&self, gateway: &dyn RemoteGateway) -> Option<Profile> {
        self.loading.store(true, Ordering::SeqCst);
        let profile = match gateway.current_profile().await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Failed to fetch profile: {}", e);
                None
            }
        };
        *self.profile.write() = profile.clone();
        self.loading.store(false, Ordering::SeqCst);
        profile
    }

    pub fn clear(&self) {
        *self.profile.write() = None;
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Clear the context whenever the bus reports a sign-out.
    pub fn attach(self: &Arc<Self>, bus: &SessionBus) -> SubscriptionId {
        let context = Arc::downgrade(self);
        bus.subscribe(move |event| {
            if event == SessionEvent::SignedOut {
                if let Some(context) = context.upgrade() {
                    context.clear();
                }
            }
        })
    }
}
