use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::Error;
use crate::simulation::{CraftState, Surface, ThrustCommand};

mod defaults {
    use std::time::Duration;

    // display refresh, 60 Hz
    pub const CADENCE: Duration = Duration::from_micros(16_667);
}

/// Everything a tick touches. Craft and surface share one lock so a thrust
/// command can never land in the middle of a frame.
pub struct Scene<S> {
    pub craft: CraftState,
    pub surface: S,
}

impl<S: Surface> Scene<S> {
    pub fn new(craft: CraftState, surface: S) -> Self {
        Self { craft, surface }
    }

    /// Contact resolution, physics and drawing of one frame. Nothing happens
    /// when the surface can't be acquired.
    pub fn tick(&mut self, elapsed: Duration) {
        let Scene { craft, surface } = self;
        let Some(mut surface) = SurfaceLock::acquire(surface) else {
            log::trace!("Surface unavailable, frame skipped");
            return;
        };
        craft.step(elapsed);
        craft.render(&mut *surface);
    }
}

/// Scoped acquisition of a surface; the frame is released on drop.
struct SurfaceLock<'a, S: Surface> {
    surface: &'a mut S,
}

impl<'a, S: Surface> SurfaceLock<'a, S> {
    fn acquire(surface: &'a mut S) -> Option<Self> {
        surface.begin_frame().then_some(Self { surface })
    }
}

impl<S: Surface> Deref for SurfaceLock<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface> DerefMut for SurfaceLock<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface> Drop for SurfaceLock<'_, S> {
    fn drop(&mut self) {
        self.surface.end_frame();
    }
}

type SharedScene<S> = Arc<Mutex<Scene<S>>>;

// scene data stays consistent even if a holder panicked mid-frame
fn lock<S>(scene: &Mutex<Scene<S>>) -> MutexGuard<'_, Scene<S>> {
    scene.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Command side of the scene, handed to whatever produces user input.
pub struct ControlHandle<S> {
    scene: SharedScene<S>,
}

impl<S> Clone for ControlHandle<S> {
    fn clone(&self) -> Self {
        Self {
            scene: Arc::clone(&self.scene),
        }
    }
}

impl<S> ControlHandle<S> {
    pub fn thrust_left(&self) {
        self.command(ThrustCommand::Left)
    }

    pub fn thrust_right(&self) {
        self.command(ThrustCommand::Right)
    }

    pub fn thrust_up(&self) {
        self.command(ThrustCommand::Up)
    }

    pub fn command(&self, cmd: ThrustCommand) {
        lock(&self.scene).craft.command(cmd)
    }
}

struct LoopFlags {
    running: AtomicBool,
    paused: AtomicBool,
}

pub struct RenderLoopDriver<S> {
    scene: SharedScene<S>,
    flags: Arc<LoopFlags>,
    handle: Option<JoinHandle<()>>,
}

impl<S: Surface + Send + 'static> RenderLoopDriver<S> {
    pub fn spawn(craft: CraftState, surface: S) -> Result<Self, Error> {
        Self::spawn_with_cadence(craft, surface, defaults::CADENCE)
    }

    pub fn spawn_with_cadence(
        craft: CraftState,
        surface: S,
        cadence: Duration,
    ) -> Result<Self, Error> {
        let scene = Arc::new(Mutex::new(Scene::new(craft, surface)));
        let flags = Arc::new(LoopFlags {
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
        });

        let handle = {
            let scene = Arc::clone(&scene);
            let flags = Arc::clone(&flags);
            thread::Builder::new()
                .name("render-loop".to_owned())
                .spawn(move || run_loop(&scene, &flags, cadence))
                .map_err(Error::Spawn)?
        };
        log::info!("Render loop started, cadence {cadence:?}");

        Ok(Self {
            scene,
            flags,
            handle: Some(handle),
        })
    }
}

impl<S> RenderLoopDriver<S> {
    pub fn controls(&self) -> ControlHandle<S> {
        ControlHandle {
            scene: Arc::clone(&self.scene),
        }
    }

    /// Runs `f` with the scene locked, between two ticks.
    pub fn inspect<R>(&self, f: impl FnOnce(&Scene<S>) -> R) -> R {
        f(&lock(&self.scene))
    }

    pub fn is_running(&self) -> bool {
        self.flags.running.load(Ordering::Acquire)
            && self
                .handle
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    pub fn pause(&self) {
        log::info!("Render loop paused");
        self.flags.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        log::info!("Render loop resumed");
        self.flags.paused.store(false, Ordering::Release);
    }

    /// Stops the loop after its current iteration and waits for the thread.
    pub fn stop(&mut self) -> Result<(), Error> {
        self.flags.running.store(false, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let joined = handle.join().map_err(|_| Error::RenderLoopPanicked);
        log::info!("Render loop stopped");
        joined
    }
}

impl<S> Drop for RenderLoopDriver<S> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("{e}");
        }
    }
}

fn run_loop<S: Surface>(scene: &Mutex<Scene<S>>, flags: &LoopFlags, cadence: Duration) {
    let mut last_tick = Instant::now();
    while flags.running.load(Ordering::Acquire) {
        let frame_start = Instant::now();
        let elapsed = frame_start - last_tick;
        last_tick = frame_start;

        if !flags.paused.load(Ordering::Acquire) {
            lock(scene).tick(elapsed);
        }

        thread::sleep(cadence.saturating_sub(frame_start.elapsed()));
    }
}
