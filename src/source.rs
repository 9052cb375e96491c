use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use serde::Deserialize;

use crate::types::{LandmarkFrame, TrackedFrame};

/// Input collaborator contract: pull one frame's worth of tracked
/// hands at a time. `None` means end of stream.
pub trait LandmarkSource: Send + 'static {
    fn next_frame(&mut self) -> Result<Option<TrackedFrame>>;
}

/// Spawns the producer thread and hands back the frame channel. The
/// channel holds a single frame and producers drop into it with
/// `try_send`, so a busy engine sheds frames instead of building a
/// backlog.
pub fn start_source<S: LandmarkSource>(
    mut source: S,
) -> (Receiver<TrackedFrame>, thread::JoinHandle<()>) {
    let (tx, rx) = crossbeam_channel::bounded(1);

    let handle = thread::spawn(move || {
        loop {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    let _ = tx.try_send(frame);
                }
                Ok(None) => break,
                Err(err) => {
                    log::warn!("landmark source read failed: {err:?}");
                }
            }
        }
        log::info!("landmark source drained");
    });

    (rx, handle)
}

#[derive(Debug, Deserialize)]
struct ReplayRecord {
    width: u32,
    height: u32,
    #[serde(default)]
    hands: Vec<Vec<[f32; 3]>>,
}

/// Plays a recorded landmark log (one JSON object per line) at a fixed
/// frame interval, standing in for a live tracker so the engine runs
/// with no camera or model attached.
pub struct ReplaySource {
    lines: Lines<BufReader<File>>,
    frame_interval: Duration,
}

impl ReplaySource {
    pub fn open(path: &Path, frame_interval: Duration) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open replay log {}", path.display()))?;
        Ok(ReplaySource {
            lines: BufReader::new(file).lines(),
            frame_interval,
        })
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<TrackedFrame>> {
        loop {
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            let line = line.context("failed to read replay log line")?;
            if line.trim().is_empty() {
                continue;
            }

            let record: ReplayRecord =
                serde_json::from_str(&line).context("malformed replay record")?;

            // Pace playback like a camera would.
            thread::sleep(self.frame_interval);

            return Ok(Some(TrackedFrame {
                hands: record
                    .hands
                    .into_iter()
                    .map(|points| LandmarkFrame { points })
                    .collect(),
                width: record.width,
                height: record.height,
                timestamp: Instant::now(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_log(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "airctl-replay-{}-{:?}.jsonl",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn replays_frames_and_ends_cleanly() {
        let path = write_log(concat!(
            r#"{"width":640,"height":480,"hands":[]}"#,
            "\n",
            "\n",
            r#"{"width":640,"height":480,"hands":[[[0.1,0.2,0.0],[0.1,0.2,0.0]]]}"#,
            "\n",
        ));
        let mut source = ReplaySource::open(&path, Duration::ZERO).unwrap();

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.width, 640);
        assert!(first.hands.is_empty());

        // Blank lines are skipped, short hands are still delivered
        // (the engine discards them per hand).
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.hands.len(), 1);
        assert_eq!(second.hands[0].points.len(), 2);

        assert!(source.next_frame().unwrap().is_none());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_record_is_an_error_not_a_panic() {
        let path = write_log("not json\n");
        let mut source = ReplaySource::open(&path, Duration::ZERO).unwrap();
        assert!(source.next_frame().is_err());
        std::fs::remove_file(&path).ok();
    }
}
