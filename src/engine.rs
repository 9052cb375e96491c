use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::{
    classifier::Classifier,
    config::EngineConfig,
    dispatcher::Dispatcher,
    features,
    sink::ActionSink,
    types::{ActionCommand, TrackedFrame},
};

/// Frame-driven core: extract, classify, dispatch, sink — one hand at
/// a time, strictly in frame order. Each hand slot keeps its own
/// dispatcher so independent gesture streams never share cooldowns.
pub struct Engine<S: ActionSink> {
    config: EngineConfig,
    classifier: Classifier,
    dispatchers: Vec<Dispatcher>,
    sink: S,
}

impl<S: ActionSink> Engine<S> {
    pub fn new(config: EngineConfig, sink: S) -> Self {
        Engine {
            classifier: Classifier::new(config.thresholds.clone()),
            dispatchers: Vec::new(),
            config,
            sink,
        }
    }

    pub fn process_frame(&mut self, frame: &TrackedFrame, now: Instant) {
        for (slot, hand) in frame.hands.iter().enumerate() {
            // A malformed hand is discarded, never fatal; cooldowns
            // are wall-clock so the dropped frame costs nothing.
            let features = match features::extract(hand) {
                Ok(features) => features,
                Err(err) => {
                    log::warn!("discarding hand {slot}: {err}");
                    continue;
                }
            };

            let event = self.classifier.classify(&features);

            while self.dispatchers.len() <= slot {
                self.dispatchers.push(Dispatcher::new(&self.config));
            }
            let commands =
                self.dispatchers[slot].dispatch(event, frame.width, frame.height, now);
            for command in commands {
                self.forward(command);
            }
        }
    }

    /// Zeroes all per-stream dispatcher state.
    pub fn reset(&mut self) {
        for dispatcher in &mut self.dispatchers {
            dispatcher.reset();
        }
    }

    fn forward(&mut self, command: ActionCommand) {
        match command {
            ActionCommand::MoveCursor(x, y) => self.sink.move_cursor(x, y),
            ActionCommand::Click => self.sink.click(),
            ActionCommand::Scroll(delta) => self.sink.scroll(delta),
            ActionCommand::KeyPress(key) => self.sink.key_press(key),
        }
    }
}

#[derive(Debug)]
pub struct EngineHandle {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Runs the engine on its own thread until the source disconnects or
/// the handle asks it to stop. The stop flag is observed once per
/// frame; an in-flight frame always runs to completion.
pub fn start_engine<S: ActionSink + Send + 'static>(
    mut engine: Engine<S>,
    frame_rx: Receiver<TrackedFrame>,
) -> EngineHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let handle = thread::spawn(move || {
        while !stop_flag.load(Ordering::Relaxed) {
            let frame = match recv_latest_frame(&frame_rx) {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(()) => break,
            };
            engine.process_frame(&frame, Instant::now());
        }
        engine.reset();
        log::info!("gesture engine stopped");
    });

    EngineHandle {
        stop,
        handle: Some(handle),
    }
}

// Blocks briefly for the next frame, then drains to the newest one so
// a slow sink never builds a backlog.
fn recv_latest_frame(frame_rx: &Receiver<TrackedFrame>) -> Result<Option<TrackedFrame>, ()> {
    let mut frame = match frame_rx.recv_timeout(Duration::from_millis(100)) {
        Ok(frame) => frame,
        Err(RecvTimeoutError::Timeout) => return Ok(None),
        Err(RecvTimeoutError::Disconnected) => return Err(()),
    };
    while let Ok(newer) = frame_rx.try_recv() {
        frame = newer;
    }
    Ok(Some(frame))
}
