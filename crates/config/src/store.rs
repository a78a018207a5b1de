use roomview_common::WallRole;

use crate::appearance::{AppearanceEdit, WallAppearance};
use crate::room::{RoomConfig, RoomDimensions};

/// Handle returned by [`WallConfigStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut()>;

/// Room dimensions and wall appearances, with change notification.
///
/// Every mutation synchronously calls every active subscriber exactly once,
/// with no payload; subscribers re-read whatever they need. Mutations are
/// neither validated nor batched, and a mutation that writes the current
/// value still notifies. Subscribers cannot mutate the store from inside
/// their callback: the store stays mutably borrowed until notification ends.
pub struct WallConfigStore {
    config: RoomConfig,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
    revision: u64,
}

impl WallConfigStore {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            subscribers: Vec::new(),
            next_id: 0,
            revision: 0,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn room(&self) -> &RoomDimensions {
        &self.config.room
    }

    pub fn wall(&self, role: WallRole) -> &WallAppearance {
        self.config.walls.get(role)
    }

    /// Number of mutations applied since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_room_length(&mut self, length: f32) {
        self.config.room.length = length;
        self.notify();
    }

    pub fn set_room_height(&mut self, height: f32) {
        self.config.room.height = height;
        self.notify();
    }

    pub fn set_room_width(&mut self, width: f32) {
        self.config.room.width = width;
        self.notify();
    }

    /// Change one appearance field of one wall.
    pub fn set_wall(&mut self, role: WallRole, edit: AppearanceEdit) {
        edit.apply_to(self.config.walls.get_mut(role));
        self.notify();
    }

    /// Replace the whole configuration as a single mutation.
    pub fn replace(&mut self, config: RoomConfig) {
        self.config = config;
        self.notify();
    }

    /// Register a callback run after every mutation.
    pub fn subscribe(&mut self, callback: impl FnMut() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        tracing::debug!(?id, total = self.subscribers.len(), "store subscriber added");
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self) {
        self.revision += 1;
        for (_, callback) in &mut self.subscribers {
            callback();
        }
    }
}

impl Default for WallConfigStore {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl std::fmt::Debug for WallConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WallConfigStore")
            .field("config", &self.config)
            .field("subscribers", &self.subscribers.len())
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::{OverlayPattern, PatternColor};
    use roomview_common::Rgb;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting(store: &mut WallConfigStore) -> (Rc<Cell<u32>>, SubscriptionId) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = store.subscribe(move || c.set(c.get() + 1));
        (count, id)
    }

    #[test]
    fn each_mutation_notifies_once() {
        let mut store = WallConfigStore::default();
        let (count, _) = counting(&mut store);

        store.set_room_length(12.0);
        assert_eq!(count.get(), 1);
        store.set_wall(WallRole::Left, AppearanceEdit::PatternBlur(0.5));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn n_mutations_give_n_notifications() {
        let mut store = WallConfigStore::default();
        let (count, _) = counting(&mut store);
        for i in 0..7 {
            store.set_room_height(2.0 + i as f32);
        }
        assert_eq!(count.get(), 7);
        assert_eq!(store.revision(), 7);
    }

    #[test]
    fn every_subscriber_is_notified() {
        let mut store = WallConfigStore::default();
        let (a, _) = counting(&mut store);
        let (b, _) = counting(&mut store);
        store.set_room_width(3.0);
        assert_eq!((a.get(), b.get()), (1, 1));
    }

    #[test]
    fn unchanged_value_still_notifies() {
        let mut store = WallConfigStore::default();
        let (count, _) = counting(&mut store);
        let length = store.room().length;
        store.set_room_length(length);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = WallConfigStore::default();
        let (count, id) = counting(&mut store);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_room_length(5.0);
        assert_eq!(count.get(), 0);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_sees_new_state_through_shared_handle() {
        let mut store = WallConfigStore::default();
        let seen = Rc::new(Cell::new(false));
        let s = seen.clone();
        store.subscribe(move || s.set(true));
        store.set_wall(
            WallRole::Front,
            AppearanceEdit::OverlayPattern(OverlayPattern::Circle),
        );
        assert!(seen.get());
        assert_eq!(
            store.wall(WallRole::Front).overlay_pattern,
            OverlayPattern::Circle
        );
    }

    #[test]
    fn edits_only_touch_the_named_wall() {
        let mut store = WallConfigStore::default();
        store.set_wall(
            WallRole::Top,
            AppearanceEdit::PatternColor(PatternColor::Rgb(Rgb::RED)),
        );
        assert_eq!(
            store.wall(WallRole::Top).pattern_color,
            PatternColor::Rgb(Rgb::RED)
        );
        assert_eq!(*store.wall(WallRole::Bottom), WallAppearance::default());
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let mut store = WallConfigStore::default();
        store.set_room_length(-4.0);
        store.set_wall(WallRole::Back, AppearanceEdit::PatternAmount(1000.0));
        assert_eq!(store.room().length, -4.0);
        assert_eq!(store.wall(WallRole::Back).pattern_amount, 1000.0);
    }

    #[test]
    fn replace_is_one_mutation() {
        let mut store = WallConfigStore::default();
        let (count, _) = counting(&mut store);
        let mut config = RoomConfig::default();
        config.room.length = 30.0;
        config.walls.bottom.pattern_amount = 2.0;
        store.replace(config);
        assert_eq!(count.get(), 1);
        assert_eq!(store.config(), &config);
    }
}
