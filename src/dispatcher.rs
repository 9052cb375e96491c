use std::time::{Duration, Instant};

use crate::{
    config::EngineConfig,
    types::{ActionCommand, GestureEvent, KeyCode, ZoneCommand},
};

/// The only state carried across frames: cooldown clocks and the
/// smoothed pointer. `None` timestamps mean the channel has never
/// fired. Everything else is recomputed per frame.
#[derive(Clone, Debug)]
struct DispatcherState {
    last_click: Option<Instant>,
    last_zone: Option<Instant>,
    smoothed: (f32, f32),
}

impl DispatcherState {
    fn new() -> Self {
        DispatcherState {
            last_click: None,
            last_zone: None,
            smoothed: (0.0, 0.0),
        }
    }
}

/// Turns per-frame gesture events into debounced, smoothed action
/// commands. One instance per independent gesture stream (per hand);
/// sharing one across streams would cross-talk their cooldowns.
///
/// There is deliberately no multi-frame "gesture in progress" state:
/// each frame is classified independently and only the cooldown clocks
/// and smoothed position persist.
pub struct Dispatcher {
    click_cooldown: Duration,
    zone_cooldown: Duration,
    smoothing_factor: f32,
    mapping_buffer: f32,
    screen: (f32, f32),
    scroll_step: i32,
    zone_left_key: KeyCode,
    zone_right_key: KeyCode,
    state: DispatcherState,
}

impl Dispatcher {
    pub fn new(config: &EngineConfig) -> Self {
        Dispatcher {
            click_cooldown: Duration::from_secs_f32(config.cooldowns.click_secs),
            zone_cooldown: Duration::from_secs_f32(config.cooldowns.zone_secs),
            smoothing_factor: config.pointer.smoothing_factor as f32,
            mapping_buffer: config.pointer.mapping_buffer_px as f32,
            screen: (config.screen.width as f32, config.screen.height as f32),
            scroll_step: config.scroll_step,
            zone_left_key: KeyCode::Char(config.keys.zone_left),
            zone_right_key: KeyCode::Char(config.keys.zone_right),
            state: DispatcherState::new(),
        }
    }

    /// Clean stop/reset entry point: forget cooldowns and the smoothed
    /// pointer.
    pub fn reset(&mut self) {
        self.state = DispatcherState::new();
    }

    /// Applies debounce, smoothing and channel exclusion to one
    /// frame's event. A discrete gesture (pinch, scroll) suppresses
    /// cursor movement and zone commands for that frame, so a frame
    /// yields at most one category of action.
    pub fn dispatch(
        &mut self,
        event: GestureEvent,
        frame_width: u32,
        frame_height: u32,
        now: Instant,
    ) -> Vec<ActionCommand> {
        match event {
            GestureEvent::None => Vec::new(),
            GestureEvent::Pinch3Click => {
                if !cooldown_elapsed(self.state.last_click, self.click_cooldown, now) {
                    // Suppressed without resetting the timer.
                    return Vec::new();
                }
                self.state.last_click = Some(now);
                vec![ActionCommand::Click]
            }
            // The scroll channel is continuous: it repeats every frame
            // the pose is held, with no cooldown.
            GestureEvent::ScrollUp => vec![ActionCommand::Scroll(self.scroll_step)],
            GestureEvent::ScrollDown => vec![ActionCommand::Scroll(-self.scroll_step)],
            GestureEvent::Point { x, y, zone } => {
                self.dispatch_pointer(x, y, zone, frame_width, frame_height, now)
            }
        }
    }

    fn dispatch_pointer(
        &mut self,
        x: f32,
        y: f32,
        zone: Option<ZoneCommand>,
        frame_width: u32,
        frame_height: u32,
        now: Instant,
    ) -> Vec<ActionCommand> {
        let target_x = map_axis(
            x * frame_width as f32,
            frame_width as f32,
            self.mapping_buffer,
            self.screen.0,
        );
        let target_y = map_axis(
            y * frame_height as f32,
            frame_height as f32,
            self.mapping_buffer,
            self.screen.1,
        );

        // First-order IIR low-pass; factor 1 passes the target through
        // unchanged.
        self.state.smoothed.0 += (target_x - self.state.smoothed.0) / self.smoothing_factor;
        self.state.smoothed.1 += (target_y - self.state.smoothed.1) / self.smoothing_factor;

        let mut commands = Vec::with_capacity(2);
        // Cursor movement has no debounce, only discrete actions do.
        commands.push(ActionCommand::MoveCursor(
            self.state.smoothed.0,
            self.state.smoothed.1,
        ));

        // Zone command after the move, debounced on its own channel;
        // never a blocking sleep inside the frame path.
        if let Some(zone) = zone {
            if cooldown_elapsed(self.state.last_zone, self.zone_cooldown, now) {
                self.state.last_zone = Some(now);
                let key = match zone {
                    ZoneCommand::Left => self.zone_left_key,
                    ZoneCommand::Right => self.zone_right_key,
                };
                commands.push(ActionCommand::KeyPress(key));
            }
        }

        commands
    }
}

fn cooldown_elapsed(last: Option<Instant>, cooldown: Duration, now: Instant) -> bool {
    match last {
        None => true,
        Some(fired_at) => now.duration_since(fired_at) > cooldown,
    }
}

/// Linear map from the inset frame span `[buffer, dim - buffer]` onto
/// `[0, out_dim]`, clamped at both ends (numpy-interp semantics).
fn map_axis(value_px: f32, dim_px: f32, buffer: f32, out_dim: f32) -> f32 {
    let lo = buffer;
    let hi = dim_px - buffer;
    if hi <= lo || value_px <= lo {
        return 0.0;
    }
    if value_px >= hi {
        return out_dim;
    }
    (value_px - lo) / (hi - lo) * out_dim
}
