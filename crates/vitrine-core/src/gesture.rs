#![forbid(unsafe_code)]

//! Single-pointer gesture tracking with explicit capture commands.
//!
//! [`GestureTracker`] turns browser pointer lifecycle signals into
//! [`GestureEvent`] values while enforcing:
//! - one active pointer at a time; other pointers are ignored,
//! - explicit capture acquire/release commands for the host to apply with
//!   `setPointerCapture()` / `releasePointerCapture()`, and
//! - cancellation on interruption paths (pointercancel, lost capture, blur,
//!   resize).
//!
//! The tracker knows nothing about slides or scroll positions. The carousel and
//! the thumbnail strip each own one and interpret its events.

use serde::Serialize;

use crate::input::{PointerButton, PointerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Requested,
    Acquired,
}

impl CaptureState {
    const fn is_acquired(self) -> bool {
        matches!(self, Self::Acquired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePointer {
    pointer_id: i32,
    origin_x: f64,
    current_x: f64,
    capture_state: CaptureState,
}

impl ActivePointer {
    fn delta_x(&self) -> f64 {
        self.current_x - self.origin_x
    }

    fn release_command(&self) -> Option<CaptureCommand> {
        self.capture_state
            .is_acquired()
            .then_some(CaptureCommand::Release {
                pointer_id: self.pointer_id,
            })
    }
}

/// Host command for browser pointer-capture control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CaptureCommand {
    Acquire { pointer_id: i32 },
    Release { pointer_id: i32 },
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    LostPointerCapture,
    CaptureAcquired,
    Blur,
    Resize,
}

/// Why a gesture ended without completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    PointerCancel,
    CaptureLost,
    FocusLost,
    Resized,
}

/// Reason an incoming lifecycle signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    ButtonNotAllowed,
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
    NonFiniteCoordinate,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum GestureOutcome {
    Forwarded,
    CaptureStateUpdated,
    Ignored(IgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureLogEntry {
    pub phase: GesturePhase,
    pub sequence: Option<u64>,
    pub pointer_id: Option<i32>,
    pub x: Option<f64>,
    pub capture_command: Option<CaptureCommand>,
    pub outcome: GestureOutcome,
}

impl GestureLogEntry {
    /// Encode as one JSON line for trace capture.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Semantic gesture event produced by a forwarded dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Started { pointer_id: i32, origin_x: f64 },
    Moved { pointer_id: i32, delta_x: f64 },
    Ended { pointer_id: i32, delta_x: f64 },
    Cancelled { pointer_id: i32, reason: CancelReason },
}

/// Result of one lifecycle dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDispatch {
    pub event: Option<GestureEvent>,
    pub capture_command: Option<CaptureCommand>,
    pub log: GestureLogEntry,
}

impl GestureDispatch {
    fn ignored(
        phase: GesturePhase,
        reason: IgnoredReason,
        pointer_id: Option<i32>,
        x: Option<f64>,
    ) -> Self {
        Self {
            event: None,
            capture_command: None,
            log: GestureLogEntry {
                phase,
                sequence: None,
                pointer_id,
                x,
                capture_command: None,
                outcome: GestureOutcome::Ignored(reason),
            },
        }
    }

    /// Whether the dispatch was accepted.
    #[must_use]
    pub fn is_forwarded(&self) -> bool {
        self.event.is_some()
    }
}

/// Single-pointer drag tracker.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    active: Option<ActivePointer>,
    next_sequence: u64,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: None,
            next_sequence: 1,
        }
    }

    /// Active pointer ID, if a gesture is in progress.
    #[must_use]
    pub fn active_pointer_id(&self) -> Option<i32> {
        self.active.map(|active| active.pointer_id)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Horizontal distance travelled by the active pointer.
    #[must_use]
    pub fn delta_x(&self) -> Option<f64> {
        self.active.map(|active| active.delta_x())
    }

    /// Begin a gesture and request capture for `pointer_id`.
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        x: f64,
        kind: PointerKind,
        button: PointerButton,
    ) -> GestureDispatch {
        let phase = GesturePhase::PointerDown;
        if !x.is_finite() {
            return GestureDispatch::ignored(
                phase,
                IgnoredReason::NonFiniteCoordinate,
                Some(pointer_id),
                None,
            );
        }
        if !button.starts_drag(kind) {
            return GestureDispatch::ignored(
                phase,
                IgnoredReason::ButtonNotAllowed,
                Some(pointer_id),
                Some(x),
            );
        }
        if self.active.is_some() {
            return GestureDispatch::ignored(
                phase,
                IgnoredReason::ActivePointerAlreadyInProgress,
                Some(pointer_id),
                Some(x),
            );
        }

        self.active = Some(ActivePointer {
            pointer_id,
            origin_x: x,
            current_x: x,
            capture_state: CaptureState::Requested,
        });
        self.forward(
            phase,
            pointer_id,
            Some(x),
            GestureEvent::Started {
                pointer_id,
                origin_x: x,
            },
            Some(CaptureCommand::Acquire { pointer_id }),
        )
    }

    /// Mark browser pointer capture as successfully acquired.
    pub fn capture_acquired(&mut self, pointer_id: i32) -> GestureDispatch {
        let phase = GesturePhase::CaptureAcquired;
        let Some(mut active) = self.active else {
            return GestureDispatch::ignored(
                phase,
                IgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
            );
        };
        if active.pointer_id != pointer_id {
            return GestureDispatch::ignored(
                phase,
                IgnoredReason::PointerMismatch,
                Some(pointer_id),
                None,
            );
        }
        active.capture_state = CaptureState::Acquired;
        self.active = Some(active);
        GestureDispatch {
            event: None,
            capture_command: None,
            log: GestureLogEntry {
                phase,
                sequence: None,
                pointer_id: Some(pointer_id),
                x: None,
                capture_command: None,
                outcome: GestureOutcome::CaptureStateUpdated,
            },
        }
    }

    /// Track movement of the active pointer.
    pub fn pointer_move(&mut self, pointer_id: i32, x: f64) -> GestureDispatch {
        let phase = GesturePhase::PointerMove;
        let mut active = match self.matching(phase, pointer_id, Some(x)) {
            Ok(active) => active,
            Err(ignored) => return ignored,
        };
        active.current_x = x;
        self.active = Some(active);
        self.forward(
            phase,
            pointer_id,
            Some(x),
            GestureEvent::Moved {
                pointer_id,
                delta_x: active.delta_x(),
            },
            None,
        )
    }

    /// Complete the gesture and release capture if it was acquired.
    pub fn pointer_up(&mut self, pointer_id: i32, x: f64) -> GestureDispatch {
        let phase = GesturePhase::PointerUp;
        let mut active = match self.matching(phase, pointer_id, Some(x)) {
            Ok(active) => active,
            Err(ignored) => return ignored,
        };
        active.current_x = x;
        self.active = None;
        self.forward(
            phase,
            pointer_id,
            Some(x),
            GestureEvent::Ended {
                pointer_id,
                delta_x: active.delta_x(),
            },
            active.release_command(),
        )
    }

    /// Handle browser `pointercancel`. A `None` id cancels whatever is active.
    pub fn pointer_cancel(&mut self, pointer_id: Option<i32>) -> GestureDispatch {
        self.cancel_active(
            GesturePhase::PointerCancel,
            pointer_id,
            CancelReason::PointerCancel,
            true,
        )
    }

    /// Handle `lostpointercapture`; the browser already released capture.
    pub fn lost_pointer_capture(&mut self, pointer_id: i32) -> GestureDispatch {
        self.cancel_active(
            GesturePhase::LostPointerCapture,
            Some(pointer_id),
            CancelReason::CaptureLost,
            false,
        )
    }

    /// Handle window blur.
    pub fn blur(&mut self) -> GestureDispatch {
        self.cancel_active(GesturePhase::Blur, None, CancelReason::FocusLost, true)
    }

    /// Abort the gesture because the geometry it was measured against changed.
    pub fn interrupt_for_resize(&mut self) -> GestureDispatch {
        self.cancel_active(GesturePhase::Resize, None, CancelReason::Resized, true)
    }

    fn matching(
        &self,
        phase: GesturePhase,
        pointer_id: i32,
        x: Option<f64>,
    ) -> Result<ActivePointer, GestureDispatch> {
        let Some(active) = self.active else {
            return Err(GestureDispatch::ignored(
                phase,
                IgnoredReason::NoActivePointer,
                Some(pointer_id),
                x,
            ));
        };
        if active.pointer_id != pointer_id {
            return Err(GestureDispatch::ignored(
                phase,
                IgnoredReason::PointerMismatch,
                Some(pointer_id),
                x,
            ));
        }
        if x.is_some_and(|x| !x.is_finite()) {
            return Err(GestureDispatch::ignored(
                phase,
                IgnoredReason::NonFiniteCoordinate,
                Some(pointer_id),
                None,
            ));
        }
        Ok(active)
    }

    fn cancel_active(
        &mut self,
        phase: GesturePhase,
        pointer_id: Option<i32>,
        reason: CancelReason,
        release_capture: bool,
    ) -> GestureDispatch {
        let Some(active) = self.active else {
            return GestureDispatch::ignored(phase, IgnoredReason::NoActivePointer, pointer_id, None);
        };
        if let Some(id) = pointer_id
            && id != active.pointer_id
        {
            return GestureDispatch::ignored(phase, IgnoredReason::PointerMismatch, Some(id), None);
        }

        self.active = None;
        let command = if release_capture {
            active.release_command()
        } else {
            None
        };
        self.forward(
            phase,
            active.pointer_id,
            None,
            GestureEvent::Cancelled {
                pointer_id: active.pointer_id,
                reason,
            },
            command,
        )
    }

    fn forward(
        &mut self,
        phase: GesturePhase,
        pointer_id: i32,
        x: Option<f64>,
        event: GestureEvent,
        capture_command: Option<CaptureCommand>,
    ) -> GestureDispatch {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        GestureDispatch {
            event: Some(event),
            capture_command,
            log: GestureLogEntry {
                phase,
                sequence: Some(sequence),
                pointer_id: Some(pointer_id),
                x,
                capture_command,
                outcome: GestureOutcome::Forwarded,
            },
        }
    }
}
