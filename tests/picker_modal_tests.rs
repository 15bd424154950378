//! Integration tests for the picker modal driven through store notifications

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use synchronize::animation::{Element, ViewportSize};
use synchronize::models::{Catalog, RgbColor};
use synchronize::picker::{IconView, PickerModal, PickerPhase};
use synchronize::store::{SelectionStore, StoreEvent};

const VIEWPORT: ViewportSize = ViewportSize::new(1280.0, 720.0);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Store plus a picker that mirrors it the way the front end does.
struct Harness {
    store: SelectionStore,
    picker: PickerModal,
    inbox: Rc<RefCell<VecDeque<StoreEvent>>>,
}

impl Harness {
    fn new() -> Self {
        let mut store = SelectionStore::new(Catalog::builtin());
        let inbox = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&inbox);
        store.subscribe(move |event| sink.borrow_mut().push_back(event.clone()));
        Self {
            store,
            picker: PickerModal::new(ms(50)),
            inbox,
        }
    }

    fn pump(&mut self, now: Duration) {
        loop {
            let Some(event) = self.inbox.borrow_mut().pop_front() else {
                break;
            };
            if let StoreEvent::ModalVisibilityChanged(_) = event {
                self.picker.sync_visibility(&self.store, now);
            }
        }
    }
}

#[test]
fn test_double_open_plays_one_reveal() {
    let mut h = Harness::new();
    h.store.set_modal_visible(true);
    h.store.set_modal_visible(true);
    h.pump(ms(0));

    assert_eq!(h.picker.phase(), PickerPhase::Open);
    assert_eq!(h.picker.open_transitions(), 1);
}

#[test]
fn test_reopen_replays_reveal() {
    let mut h = Harness::new();
    h.store.set_modal_visible(true);
    h.pump(ms(0));
    h.picker.close(&mut h.store);
    h.pump(ms(2_000));
    assert_eq!(h.picker.phase(), PickerPhase::Closed);

    h.store.set_modal_visible(true);
    h.pump(ms(3_000));
    assert_eq!(h.picker.open_transitions(), 2);
    assert!(h.picker.is_animating(ms(3_100)));
    assert!(!h.picker.sample(Element::Card(0), ms(3_000), VIEWPORT).is_visible());
}

#[test]
fn test_accent_follows_hover_then_selection() {
    let mut h = Harness::new();
    h.store.set_modal_visible(true);
    h.pump(ms(0));

    assert_eq!(h.picker.accent_color(&h.store), RgbColor::new(0x00, 0x55, 0xAA));

    h.picker.pointer_enter("widow");
    assert_eq!(h.picker.accent_color(&h.store), RgbColor::BLACK);

    h.picker.pointer_leave("widow");
    assert_eq!(h.picker.accent_color(&h.store), RgbColor::new(0x00, 0x55, 0xAA));
}

#[test]
fn test_equip_keeps_picker_open_and_updates_cards() {
    let mut h = Harness::new();
    h.store.set_modal_visible(true);
    h.pump(ms(0));

    h.picker.click(&mut h.store, "spidey").unwrap();
    h.pump(ms(500));
    assert!(h.picker.is_open());

    let cards = h.picker.cards(&h.store, ms(5_000), VIEWPORT);
    let selected: Vec<&str> = cards
        .iter()
        .filter(|card| card.selected)
        .map(|card| card.id.as_str())
        .collect();
    assert_eq!(selected, vec!["spidey"]);
    assert!(cards.iter().all(|card| card.visual.is_visible()));
}

#[test]
fn test_cards_wait_for_panel() {
    let mut h = Harness::new();
    h.store.set_modal_visible(true);
    h.pump(ms(0));

    let cards = h.picker.cards(&h.store, ms(500), VIEWPORT);
    assert!(cards.iter().all(|card| !card.visual.is_visible()));

    // First card starts at 0.6s, the last one 7 staggers later
    let cards = h.picker.cards(&h.store, ms(800), VIEWPORT);
    assert!(cards[0].visual.is_visible());
    assert!(!cards[7].visual.is_visible());
}

#[test]
fn test_missing_icon_uses_placeholder() {
    let mut h = Harness::new();
    h.store.set_modal_visible(true);
    h.pump(ms(0));

    let cards = h.picker.cards(&h.store, ms(5_000), VIEWPORT);
    let strange = cards.iter().find(|card| card.id == "strange").unwrap();
    assert_eq!(strange.icon, IconView::Placeholder);
    let cap = cards.iter().find(|card| card.id == "cap").unwrap();
    assert!(matches!(cap.icon, IconView::Asset(_)));
}
