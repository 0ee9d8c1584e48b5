//! Tab handle and command routing.

use std::fmt;
use std::sync::Arc;

use crate::browser::Window;
use crate::error::Result;
use crate::identifiers::{FrameId, TabId};
use crate::protocol::{Command, Response};

// ============================================================================
// Tab
// ============================================================================

pub(crate) struct TabInner {
    pub tab_id: TabId,
    pub frame_id: FrameId,
    pub window: Window,
}

/// A tab in a [`Window`]. Cheap to clone.
#[derive(Clone)]
pub struct Tab {
    pub(crate) inner: Arc<TabInner>,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("tab_id", &self.inner.tab_id)
            .field("frame_id", &self.inner.frame_id)
            .field("session_id", &self.inner.window.session_id())
            .finish()
    }
}

impl Tab {
    pub(crate) fn new(tab_id: TabId, frame_id: FrameId, window: Window) -> Self {
        Self {
            inner: Arc::new(TabInner {
                tab_id,
                frame_id,
                window,
            }),
        }
    }

    /// Tab id assigned by Firefox.
    #[inline]
    #[must_use]
    pub fn tab_id(&self) -> TabId {
        self.inner.tab_id
    }

    /// Frame commands are addressed to.
    #[inline]
    #[must_use]
    pub fn frame_id(&self) -> FrameId {
        self.inner.frame_id
    }

    /// Sends a command to this tab's frame.
    pub(crate) async fn send_command(&self, command: Command) -> Result<Response> {
        self.inner
            .window
            .send_to(self.inner.tab_id, self.inner.frame_id, command)
            .await
    }
}
