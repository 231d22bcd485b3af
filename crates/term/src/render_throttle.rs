//! Frame pacing for a mostly static board.
//!
//! A memory board only changes on input or when a pair resolves, so frames
//! are drawn when the snapshot fingerprint changes and otherwise at most once
//! per interval (to pick up adapter status and terminal damage).

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_static_interval_ms: u64,
    last_render_ms: u64,
    last_fingerprint: u64,
    has_rendered: bool,
}

impl RenderThrottle {
    pub fn new(min_static_interval_ms: u64) -> Self {
        Self {
            min_static_interval_ms,
            last_render_ms: 0,
            last_fingerprint: 0,
            has_rendered: false,
        }
    }

    /// Decide whether to render a new frame.
    ///
    /// `force` (resize, cursor move) always renders. Otherwise a changed
    /// fingerprint renders immediately and an unchanged one at most once per
    /// `min_static_interval_ms`.
    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64, force: bool) -> bool {
        let changed = !self.has_rendered || fingerprint != self.last_fingerprint;
        let stale = now_ms.saturating_sub(self.last_render_ms) >= self.min_static_interval_ms;

        if force || changed || stale {
            self.has_rendered = true;
            self.last_render_ms = now_ms;
            self.last_fingerprint = fingerprint;
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_always_renders() {
        let mut t = RenderThrottle::new(250);
        assert!(t.should_render(0, 7, false));
    }

    #[test]
    fn forced_frames_reset_the_interval() {
        let mut t = RenderThrottle::new(250);
        assert!(t.should_render(0, 7, false));
        assert!(t.should_render(100, 7, true));
        assert!(!t.should_render(300, 7, false));
        assert!(t.should_render(350, 7, false));
    }
}
