use std::sync::mpsc::{self, Receiver, Sender};

use crate::action::{ControlKey, InputEvent};

/// Create a connected sender/receiver pair for control-key events.
///
/// Hosts push events from their event handlers (possibly on another thread);
/// the camera controller drains them once per frame so every frame sees one
/// consistent snapshot of input state.
pub fn input_channel() -> (InputSender, InputReceiver) {
    let (tx, rx) = mpsc::channel();
    (InputSender { tx }, InputReceiver { rx })
}

/// Writing half of the input queue.
#[derive(Debug)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Enqueue an event. Returns false once the receiver is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Enqueue a key transition by key-code name. Codes that are not bound to
    /// a control are dropped and reported as not sent.
    pub fn key_event(&self, code: &str, pressed: bool, repeat: bool) -> bool {
        let Some(key) = ControlKey::from_code(code) else {
            tracing::trace!(code, "ignoring unbound key");
            return false;
        };
        self.send(InputEvent {
            key,
            pressed,
            repeat,
        })
    }

    /// Enqueue a release for every control key. Hosts call this when the
    /// window loses focus or a key-up may have been swallowed elsewhere.
    pub fn release_all(&self) -> bool {
        ControlKey::ALL
            .into_iter()
            .all(|key| self.send(InputEvent::release(key)))
    }
}

/// Reading half of the input queue.
#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<InputEvent>,
}

impl InputReceiver {
    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_events_in_order() {
        let (tx, rx) = input_channel();
        tx.send(InputEvent::press(ControlKey::Forward));
        tx.send(InputEvent::release(ControlKey::Forward));
        let events = rx.drain();
        assert_eq!(
            events,
            vec![
                InputEvent::press(ControlKey::Forward),
                InputEvent::release(ControlKey::Forward)
            ]
        );
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn unbound_codes_are_not_enqueued() {
        let (tx, rx) = input_channel();
        assert!(!tx.key_event("KeyZ", true, false));
        assert!(tx.key_event("ArrowLeft", true, false));
        assert_eq!(rx.drain().len(), 1);
    }

    #[test]
    fn sender_works_from_another_thread() {
        let (tx, rx) = input_channel();
        std::thread::spawn(move || {
            tx.key_event("KeyW", true, false);
        })
        .join()
        .unwrap();
        assert_eq!(rx.drain(), vec![InputEvent::press(ControlKey::Forward)]);
    }

    #[test]
    fn release_all_sends_one_release_per_key() {
        let (tx, rx) = input_channel();
        assert!(tx.release_all());
        let events = rx.drain();
        assert_eq!(events.len(), ControlKey::ALL.len());
        assert!(events.iter().all(|e| !e.pressed && !e.repeat));
    }

    #[test]
    fn send_fails_after_receiver_dropped() {
        let (tx, rx) = input_channel();
        drop(rx);
        assert!(!tx.send(InputEvent::press(ControlKey::Up)));
    }
}
