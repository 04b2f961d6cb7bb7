use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Foreground state of the page hosting the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVisibility {
    Visible,
    Hidden,
}

/// Shared visibility flag read by every poller at the start of a tick.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    state: Arc<watch::Sender<PageVisibility>>,
}

impl VisibilityGate {
    pub fn new(initial: PageVisibility) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn set(&self, visibility: PageVisibility) {
        let changed = self.state.send_if_modified(|current| {
            if *current == visibility {
                return false;
            }
            *current = visibility;
            true
        });
        if changed {
            debug!(?visibility, "Page visibility changed");
        }
    }

    pub fn get(&self) -> PageVisibility {
        *self.state.borrow()
    }

    pub fn is_visible(&self) -> bool {
        self.get() == PageVisibility::Visible
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(PageVisibility::Visible)
    }
}
