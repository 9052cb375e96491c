use crate::types::KeyCode;

/// Output collaborator contract. Calls are fire-and-forget: the engine
/// never retries and never rolls back dispatcher state when the host
/// rejects an injection.
pub trait ActionSink {
    fn move_cursor(&mut self, x: f32, y: f32);
    fn click(&mut self);
    fn scroll(&mut self, delta: i32);
    fn key_press(&mut self, key: KeyCode);
}

/// Headless sink: logs every command instead of injecting it. Default
/// when no injection backend feature is enabled.
pub struct LogSink;

impl ActionSink for LogSink {
    fn move_cursor(&mut self, x: f32, y: f32) {
        log::info!("move cursor to ({x:.1}, {y:.1})");
    }

    fn click(&mut self) {
        log::info!("click");
    }

    fn scroll(&mut self, delta: i32) {
        log::info!("scroll {delta}");
    }

    fn key_press(&mut self, key: KeyCode) {
        let KeyCode::Char(c) = key;
        log::info!("press key '{c}'");
    }
}

#[cfg(feature = "sink-enigo")]
pub use self::enigo_sink::EnigoSink;

#[cfg(feature = "sink-enigo")]
mod enigo_sink {
    use anyhow::Result;
    use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

    use super::ActionSink;
    use crate::types::KeyCode;

    /// OS-level input injection via enigo.
    pub struct EnigoSink {
        enigo: Enigo,
    }

    impl EnigoSink {
        pub fn new() -> Result<Self> {
            let enigo = Enigo::new(&Settings::default())?;
            Ok(EnigoSink { enigo })
        }
    }

    impl ActionSink for EnigoSink {
        fn move_cursor(&mut self, x: f32, y: f32) {
            let result = self
                .enigo
                .move_mouse(x.round() as i32, y.round() as i32, Coordinate::Abs);
            if let Err(err) = result {
                log::warn!("cursor move rejected: {err}");
            }
        }

        fn click(&mut self) {
            if let Err(err) = self.enigo.button(Button::Left, Direction::Click) {
                log::warn!("click rejected: {err}");
            }
        }

        fn scroll(&mut self, delta: i32) {
            // Positive delta means scroll up; enigo's vertical axis
            // grows downward.
            if let Err(err) = self.enigo.scroll(-delta, Axis::Vertical) {
                log::warn!("scroll rejected: {err}");
            }
        }

        fn key_press(&mut self, key: KeyCode) {
            let KeyCode::Char(c) = key;
            if let Err(err) = self.enigo.key(Key::Unicode(c), Direction::Click) {
                log::warn!("key press rejected: {err}");
            }
        }
    }
}
