use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{Result, anyhow};
use beautex_core::{BeautyControls, ParamChannel, slider_value};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use tracing::debug;

/// A slider moved by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderEvent {
    Smoothing(u32),
    Whitening(u32),
}

impl SliderEvent {
    fn apply(self, controls: &impl BeautyControls) {
        match self {
            SliderEvent::Smoothing(progress) => controls.set_smoothing(slider_value(progress)),
            SliderEvent::Whitening(progress) => controls.set_whitening(slider_value(progress)),
        }
    }
}

/// Slider moves for a session: smoothing ramps up, whitening follows one step behind.
pub fn slider_script(smoothing: u32, whitening: u32) -> Vec<SliderEvent> {
    let mut script = Vec::new();
    let (mut s, mut w) = (smoothing, whitening);
    while s < 100 || w < 60 {
        if s < 100 {
            s = (s + 10).min(100);
            script.push(SliderEvent::Smoothing(s));
        }
        if w < 60 {
            w = (w + 10).min(60);
            script.push(SliderEvent::Whitening(w));
        }
    }
    script
}

/// Plays a slider script on its own thread, the way a UI thread writes controls while frames
/// are being drawn.
pub struct SliderPanel {
    stop_tx: Sender<()>,
    events: Receiver<SliderEvent>,
    handle: Option<JoinHandle<()>>,
}

impl SliderPanel {
    pub fn spawn(controls: ParamChannel, script: Vec<SliderEvent>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (event_tx, events) = unbounded();

        let handle = thread::spawn(move || {
            for event in script {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
                event.apply(&controls);
                if event_tx.send(event).is_err() {
                    return;
                }
            }
            debug!("slider script finished");
        });

        Self {
            stop_tx,
            events,
            handle: Some(handle),
        }
    }

    /// Slider moves applied since the last call.
    pub fn drain(&self) -> Vec<SliderEvent> {
        self.events.try_iter().collect()
    }

    pub fn stop(&mut self) -> Result<()> {
        let _ = self.stop_tx.try_send(());
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| anyhow!("slider thread panicked")),
            None => Ok(()),
        }
    }
}

impl Drop for SliderPanel {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_ends_at_full_smoothing() {
        let script = slider_script(20, 0);
        assert_eq!(script.first(), Some(&SliderEvent::Smoothing(30)));
        assert_eq!(script.get(1), Some(&SliderEvent::Whitening(10)));
        assert!(script.contains(&SliderEvent::Smoothing(100)));
        assert_eq!(script.last(), Some(&SliderEvent::Smoothing(100)));
        assert!(slider_script(100, 60).is_empty());
    }

    #[test]
    fn panel_applies_moves_to_controls() {
        let controls = ParamChannel::new(0.2, 0.0);
        let script = vec![SliderEvent::Smoothing(70), SliderEvent::Whitening(40)];
        let mut panel = SliderPanel::spawn(controls.clone(), script, Duration::from_millis(1));

        let seen: Vec<_> = (0..2)
            .map(|_| {
                panel
                    .events
                    .recv_timeout(Duration::from_secs(5))
                    .expect("slider event")
            })
            .collect();
        panel.stop().expect("slider thread");

        assert_eq!(seen, vec![SliderEvent::Smoothing(70), SliderEvent::Whitening(40)]);
        assert_eq!(controls.smoothing(), 0.7);
        assert_eq!(controls.whitening(), 0.4);
    }
}
