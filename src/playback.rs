//! Flipbook playback - steps a frame index through a sprite sheet on a fixed cadence
//!
//! A [`PlaybackDriver`] owns the current frame and the play/pause flag for one
//! preview. It arms at most one periodic timer task at a time; every
//! transition that invalidates the running timer (pause, image change, shape
//! change, disposal) cancels it before anything new is armed.
//!
//! # States
//!
//! | From | Event | To | Frame |
//! |------|-------|----|-------|
//! | Stopped | image supplied | Playing | reset to 0 |
//! | Playing | toggle | Paused | kept |
//! | Paused | toggle | Playing | kept |
//! | Playing/Paused | new image | unchanged | reset to 0 |
//! | Playing/Paused | image cleared | Stopped | discarded |
//! | Playing/Paused | valid shape | unchanged | `frame % total` |
//! | Playing/Paused | invalid shape | Paused (condition set) | held at 0 |
//!
//! Views observe the driver through [`PlaybackDriver::subscribe`], which always
//! holds the latest [`FrameUpdate`].

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, trace, warn};

use crate::grid::{render_coordinates, GridError};
use crate::models::{CompositeImage, GridShape, RenderCoordinates};

/// Time between two frames (10 frames per second).
pub const FRAME_PERIOD: Duration = Duration::from_millis(100);

/// Errors creating a playback driver
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaybackError {
    /// The driver schedules its timer on the ambient Tokio runtime
    #[error("playback needs a running Tokio runtime: {0}")]
    NoRuntime(#[from] TryCurrentError),
}

/// Observable driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No composite image
    Stopped,
    Playing,
    Paused,
}

/// Snapshot published to subscribers after each change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameUpdate {
    pub frame: u32,
    pub total_frames: u32,
    pub status: PlaybackStatus,
    /// Geometry for the current frame, absent while stopped or when the shape is invalid
    pub coordinates: Option<RenderCoordinates>,
    /// Why playback is held, if it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<GridError>,
}

/// Result of one timer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Advanced(u32),
    /// The callback belongs to a cancelled timer or a disposed driver
    StaleReferenceIgnored,
}

#[derive(Debug)]
struct PlaybackState {
    shape: GridShape,
    image: Option<CompositeImage>,
    frame: u32,
    /// User's play preference; only effective with an image and a valid shape
    playing: bool,
    /// Identifies the currently armed timer
    epoch: u64,
    disposed: bool,
}

impl PlaybackState {
    fn status(&self) -> PlaybackStatus {
        match self.image {
            None => PlaybackStatus::Stopped,
            Some(_) if self.playing && self.shape.is_valid() => PlaybackStatus::Playing,
            Some(_) => PlaybackStatus::Paused,
        }
    }

    fn snapshot(&self) -> FrameUpdate {
        let coordinates = match self.image {
            Some(_) => render_coordinates(self.frame, self.shape).ok(),
            None => None,
        };
        FrameUpdate {
            frame: self.frame,
            total_frames: if self.shape.is_valid() { self.shape.total_frames() } else { 0 },
            status: self.status(),
            coordinates,
            condition: self.shape.validate().err(),
        }
    }
}

struct Shared {
    state: Mutex<PlaybackState>,
    updates: watch::Sender<FrameUpdate>,
}

impl Shared {
    fn tick(&self, epoch: u64) -> TickOutcome {
        let mut state = self.state.lock();
        if state.disposed || state.epoch != epoch || state.status() != PlaybackStatus::Playing {
            trace!(epoch, current = state.epoch, "ignoring stale playback tick");
            return TickOutcome::StaleReferenceIgnored;
        }

        let total = state.shape.total_frames();
        if total == 0 {
            return TickOutcome::StaleReferenceIgnored;
        }
        state.frame = (state.frame + 1) % total;
        self.updates.send_replace(state.snapshot());
        TickOutcome::Advanced(state.frame)
    }
}

async fn run_timer(shared: Weak<Shared>, epoch: u64, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        match shared.tick(epoch) {
            TickOutcome::Advanced(frame) => trace!(frame, "playback tick"),
            TickOutcome::StaleReferenceIgnored => break,
        }
    }
}

/// Owns the frame counter and the periodic timer of one animation preview.
///
/// Must be created inside a Tokio runtime. Dropping the driver cancels its
/// timer exactly like [`PlaybackDriver::dispose`].
///
/// # Examples
///
/// ```
/// use spritestudio::models::{CompositeImage, GridShape};
/// use spritestudio::playback::{PlaybackDriver, PlaybackStatus};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut driver = PlaybackDriver::new(GridShape::new(2, 4), Some(CompositeImage::from("walk.png"))).unwrap();
/// assert_eq!(driver.status(), PlaybackStatus::Playing);
/// driver.toggle_play();
/// assert_eq!(driver.status(), PlaybackStatus::Paused);
/// driver.dispose();
/// # }
/// ```
pub struct PlaybackDriver {
    shared: Arc<Shared>,
    timer: Option<JoinHandle<()>>,
    runtime: Handle,
}

impl PlaybackDriver {
    /// Create a driver on the current Tokio runtime.
    ///
    /// Starts playing immediately when `image` is present and `shape` is valid.
    pub fn new(shape: GridShape, image: Option<CompositeImage>) -> Result<Self, PlaybackError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_handle(runtime, shape, image))
    }

    /// Create a driver that schedules its timer on `runtime`.
    pub fn with_handle(runtime: Handle, shape: GridShape, image: Option<CompositeImage>) -> Self {
        if let Err(err) = shape.validate() {
            warn!(%err, "playback created with an invalid grid, holding at frame 0");
        }

        let state = PlaybackState {
            shape,
            image,
            frame: 0,
            playing: true,
            epoch: 0,
            disposed: false,
        };
        let (updates, _) = watch::channel(state.snapshot());
        let mut driver = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                updates,
            }),
            timer: None,
            runtime,
        };
        driver.rearm();
        driver
    }

    /// Replace (or clear) the composite image.
    ///
    /// A different image always restarts at frame 0; the play flag is kept.
    /// Clearing the image stops playback and discards the driver state.
    /// Supplying the image already shown changes nothing.
    pub fn set_image(&mut self, image: Option<CompositeImage>) {
        {
            let mut state = self.shared.state.lock();
            if state.disposed || state.image == image {
                return;
            }
            match (&state.image, &image) {
                (_, None) => {
                    debug!("image cleared, stopping playback");
                    state.playing = true;
                }
                (None, Some(next)) => debug!(image = %next, "image available, starting playback"),
                (Some(_), Some(next)) => debug!(image = %next, "image replaced, restarting at frame 0"),
            }
            state.frame = 0;
            state.image = image;
        }
        self.rearm();
    }

    /// Change the grid partition of the current sheet.
    ///
    /// The frame is wrapped into the new range. An invalid shape holds
    /// playback at frame 0 and is reported through [`PlaybackDriver::condition`]
    /// until a valid shape arrives.
    pub fn set_shape(&mut self, shape: GridShape) {
        {
            let mut state = self.shared.state.lock();
            if state.disposed || state.shape == shape {
                return;
            }
            match shape.validate() {
                Ok(()) => {
                    state.frame %= shape.total_frames();
                    debug!(%shape, frame = state.frame, "grid shape changed");
                }
                Err(err) => {
                    warn!(%err, "invalid grid shape, holding playback at frame 0");
                    state.frame = 0;
                }
            }
            state.shape = shape;
        }
        self.rearm();
    }

    /// Flip between playing and paused. Returns whether the driver is now playing.
    ///
    /// Has no effect while stopped.
    pub fn toggle_play(&mut self) -> bool {
        let playing = self.shared.state.lock().playing;
        self.set_playing(!playing);
        self.is_playing()
    }

    /// Set the play flag explicitly. The current frame is preserved.
    pub fn set_playing(&mut self, playing: bool) {
        {
            let mut state = self.shared.state.lock();
            if state.disposed || state.image.is_none() || state.playing == playing {
                return;
            }
            debug!(playing, frame = state.frame, "playback toggled");
            state.playing = playing;
        }
        self.rearm();
    }

    pub fn current_frame(&self) -> u32 {
        self.shared.state.lock().frame
    }

    pub fn is_playing(&self) -> bool {
        self.status() == PlaybackStatus::Playing
    }

    pub fn status(&self) -> PlaybackStatus {
        self.shared.state.lock().status()
    }

    /// Reason playback is held, e.g. [`GridError::InvalidGridShape`].
    pub fn condition(&self) -> Option<GridError> {
        self.shared.state.lock().shape.validate().err()
    }

    pub fn shape(&self) -> GridShape {
        self.shared.state.lock().shape
    }

    pub fn image(&self) -> Option<CompositeImage> {
        self.shared.state.lock().image.clone()
    }

    /// Current snapshot, as last published to subscribers.
    pub fn snapshot(&self) -> FrameUpdate {
        self.shared.state.lock().snapshot()
    }

    /// Watch the latest [`FrameUpdate`].
    ///
    /// The receiver is notified after each tick and transition but only holds
    /// the most recent state, so a consumer slower than [`FRAME_PERIOD`] sees
    /// skipped frames. The channel closes once the driver is disposed.
    pub fn subscribe(&self) -> watch::Receiver<FrameUpdate> {
        self.shared.updates.subscribe()
    }

    /// Stop playback for good and cancel the timer.
    pub fn dispose(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.epoch = state.epoch.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        state.image = None;
        state.frame = 0;
        self.shared.updates.send_replace(state.snapshot());
        debug!("playback disposed");
    }

    /// Cancel the running timer, then arm a new one if playback should run.
    fn rearm(&mut self) {
        let mut state = self.shared.state.lock();
        state.epoch = state.epoch.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
            trace!("playback timer cancelled");
        }

        if !state.disposed && state.status() == PlaybackStatus::Playing {
            let epoch = state.epoch;
            let shared = Arc::downgrade(&self.shared);
            self.timer = Some(self.runtime.spawn(run_timer(shared, epoch, FRAME_PERIOD)));
            trace!(epoch, "playback timer armed");
        }
        self.shared.updates.send_replace(state.snapshot());
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PlaybackDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("PlaybackDriver")
            .field("shape", &state.shape)
            .field("frame", &state.frame)
            .field("status", &state.status())
            .field("timer_armed", &self.timer.is_some())
            .finish()
    }
}
