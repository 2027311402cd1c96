// Self-rescheduling frame loop. The loop itself is plain state; the
// scheduler behind it is either requestAnimationFrame in the browser or a
// hand-driven queue in tests.

use crate::error::{describe_js_error, FieldError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Handle for one requested frame, used to cancel it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameRequest(pub i32);

pub trait FrameScheduler {
    /// Requests one more call of the loop's callback before the next repaint.
    fn schedule_next_frame(&mut self) -> Result<FrameRequest, FieldError>;
    fn cancel_next_frame(&mut self, request: FrameRequest);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Unstarted,
    Running,
    Stopped,
}

pub struct FrameLoop<S> {
    scheduler: S,
    state: LoopState,
    pending: Option<FrameRequest>,
    frames: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        FrameLoop {
            scheduler,
            state: LoopState::Unstarted,
            pending: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Frames run since start.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn start(&mut self) -> Result<(), FieldError> {
        match self.state {
            LoopState::Running => Ok(()),
            LoopState::Stopped => Err(FieldError::AlreadyStopped),
            LoopState::Unstarted => {
                self.pending = Some(self.scheduler.schedule_next_frame()?);
                self.state = LoopState::Running;
                Ok(())
            }
        }
    }

    // The request that woke us up has been delivered, so it is no longer
    // pending whether or not the frame runs
    pub fn begin_frame(&mut self) -> bool {
        self.pending = None;
        if self.is_running() {
            self.frames += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) -> Result<(), FieldError> {
        if self.is_running() && self.pending.is_none() {
            self.pending = Some(self.scheduler.schedule_next_frame()?);
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_next_frame(request);
        }
        self.state = LoopState::Stopped;
    }
}

// requestAnimationFrame scheduler. The callback lives in a shared slot so
// the same Closure can be handed to the browser on every frame.
pub struct AnimationFrames {
    window: Window,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl AnimationFrames {
    pub fn new(window: Window, callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> Self {
        AnimationFrames { window, callback }
    }
}

impl FrameScheduler for AnimationFrames {
    fn schedule_next_frame(&mut self) -> Result<FrameRequest, FieldError> {
        let slot = self.callback.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| FieldError::Scheduler("frame callback not installed".to_owned()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameRequest)
            .map_err(|e| FieldError::Scheduler(describe_js_error(&e)))
    }

    fn cancel_next_frame(&mut self, request: FrameRequest) {
        let _ = self.window.cancel_animation_frame(request.0);
    }
}
