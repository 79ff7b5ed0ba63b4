//! User-facing advisories and fire-and-forget sound cues.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Advisory messages the core raises. The core keeps running (paused)
/// after either of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Playback could not start on its own; the user has to press play.
    PlaybackRejected,
    /// The track could not be loaded or decoded.
    LoadFailed { title: String },
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Advisory::PlaybackRejected => "Press play to resume your music".to_string(),
            Advisory::LoadFailed { title } => format!("Could not play \"{title}\""),
        }
    }
}

pub trait Notifier {
    fn advise(&mut self, advisory: Advisory);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SoundCue {
    /// next/previous
    Click,
    /// shuffle/repeat
    Toggle,
}

pub trait SoundEffects {
    fn play(&mut self, cue: SoundCue);
}

/// Used when sound effects are disabled or no output device exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundEffects for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}

#[derive(Debug)]
struct Toast {
    text: String,
    shown_at: Option<u64>,
}

/// Toasts waiting to be rendered. Each one is shown for `toast_ms` from the
/// moment it first reaches the screen, then the next one takes over.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Rc<RefCell<VecDeque<Toast>>>,
    toast_ms: u64,
}

impl ToastQueue {
    pub fn new(toast_ms: u64) -> Self {
        Self {
            toasts: Rc::new(RefCell::new(VecDeque::new())),
            toast_ms,
        }
    }

    pub fn push(&self, text: impl Into<String>) {
        self.toasts.borrow_mut().push_back(Toast {
            text: text.into(),
            shown_at: None,
        });
    }

    /// The toast to display at `now`, expiring old ones on the way.
    pub fn current(&self, now: u64) -> Option<String> {
        let mut toasts = self.toasts.borrow_mut();
        while let Some(front) = toasts.front_mut() {
            match front.shown_at {
                None => {
                    front.shown_at = Some(now);
                    return Some(front.text.clone());
                }
                Some(at) if now.saturating_sub(at) < self.toast_ms => {
                    return Some(front.text.clone());
                }
                Some(_) => {
                    toasts.pop_front();
                }
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.toasts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn advise(&mut self, advisory: Advisory) {
        tracing::info!(?advisory, "advisory");
        self.push(advisory.message());
    }
}

/// Keeps every advisory for later inspection.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub seen: Rc<RefCell<Vec<Advisory>>>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn advise(&mut self, advisory: Advisory) {
        self.seen.borrow_mut().push(advisory);
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingEffects {
    pub played: Rc<RefCell<Vec<SoundCue>>>,
}

#[cfg(test)]
impl SoundEffects for RecordingEffects {
    fn play(&mut self, cue: SoundCue) {
        self.played.borrow_mut().push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_show_in_order_for_their_duration() {
        let mut q = ToastQueue::new(1_000);
        q.advise(Advisory::PlaybackRejected);
        q.push("second");

        assert_eq!(q.current(10).as_deref(), Some("Press play to resume your music"));
        assert_eq!(q.current(900).as_deref(), Some("Press play to resume your music"));
        // first expires, second starts its own window now
        assert_eq!(q.current(1_010).as_deref(), Some("second"));
        assert_eq!(q.current(2_000).as_deref(), Some("second"));
        assert_eq!(q.current(2_010), None);
        assert!(q.is_empty());
    }

    #[test]
    fn load_failed_names_the_track() {
        let a = Advisory::LoadFailed {
            title: "Song".into(),
        };
        assert_eq!(a.message(), "Could not play \"Song\"");
    }
}
