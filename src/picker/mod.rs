//! Character picker modal.
//!
//! The modal has exactly two phases. It never changes phase on its own: the
//! store's visibility flag is the source of truth and [`PickerModal::sync_visibility`]
//! mirrors it. Hover state is local to the modal and is dropped on close.
//!
//! Opening plays a staggered reveal. Closing hides the modal immediately.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::animation::{presets, Element, Timeline, ViewportSize, VisualState};
use crate::error::SiteError;
use crate::models::{Catalog, CharacterOption, RgbColor};
use crate::store::SelectionStore;

/// Header accent when neither a hovered nor a current option has a color.
pub const DEFAULT_ACCENT: RgbColor = RgbColor::BLACK;

/// Whether the modal is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerPhase {
    /// Not rendered.
    #[default]
    Closed,
    /// Rendered and accepting input.
    Open,
}

#[derive(Debug, Clone)]
struct Reveal {
    started_at: Duration,
    timeline: Timeline,
}

/// What a card shows in place of the character artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconView {
    /// Icon file resolved on disk (or taken as-is when no assets dir is set).
    Asset(PathBuf),
    /// Neutral placeholder glyph.
    Placeholder,
}

/// Everything needed to draw one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    /// Option id
    pub id: String,
    /// Display name shown in the badge
    pub name: String,
    /// Option color
    pub color: RgbColor,
    /// Card artwork
    pub icon: IconView,
    /// Hovered or equipped
    pub active: bool,
    /// Equipped
    pub selected: bool,
    /// Has keyboard focus
    pub focused: bool,
    /// Reveal transform at the sampled instant
    pub visual: VisualState,
}

impl CardView {
    /// Badge text color: light on dark option colors, dark otherwise.
    #[must_use]
    pub fn badge_text_color(&self) -> RgbColor {
        if self.active && self.color.is_dark() {
            RgbColor::WHITE
        } else {
            RgbColor::BLACK
        }
    }

    /// Card color as drawn. Inactive cards are desaturated.
    #[must_use]
    pub fn display_color(&self) -> RgbColor {
        if self.active {
            self.color
        } else {
            self.color.grayscale()
        }
    }
}

/// Picker modal state.
#[derive(Debug, Clone)]
pub struct PickerModal {
    phase: PickerPhase,
    hovered: Option<String>,
    focus: usize,
    reveal: Option<Reveal>,
    open_transitions: u32,
    card_stagger: Duration,
    assets_dir: Option<PathBuf>,
}

impl Default for PickerModal {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

impl PickerModal {
    /// Creates a closed picker whose cards are revealed `card_stagger` apart.
    #[must_use]
    pub fn new(card_stagger: Duration) -> Self {
        Self {
            phase: PickerPhase::Closed,
            hovered: None,
            focus: 0,
            reveal: None,
            open_transitions: 0,
            card_stagger,
            assets_dir: None,
        }
    }

    /// Resolves icon paths against `dir` and checks that they exist.
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    /// Whether the picker is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase == PickerPhase::Open
    }

    /// Id under the pointer (or keyboard focus), if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Catalog position with keyboard focus.
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Number of Closed→Open transitions so far; each one played a reveal.
    #[must_use]
    pub fn open_transitions(&self) -> u32 {
        self.open_transitions
    }

    /// Mirrors the store's visibility flag. Returns whether the phase changed.
    ///
    /// Opening starts the reveal and puts keyboard focus on the equipped card.
    /// Closing drops hover immediately; there is no exit animation.
    pub fn sync_visibility(&mut self, store: &SelectionStore, now: Duration) -> bool {
        match (self.phase, store.is_modal_visible()) {
            (PickerPhase::Closed, true) => {
                let catalog = store.catalog();
                self.phase = PickerPhase::Open;
                self.hovered = None;
                self.focus = catalog.position(store.current()).unwrap_or(0);
                self.reveal = Some(Reveal {
                    started_at: now,
                    timeline: presets::picker_reveal(
                        catalog.len(),
                        self.card_stagger.as_secs_f32(),
                    ),
                });
                self.open_transitions += 1;
                tracing::debug!(cards = catalog.len(), "picker opened");
                true
            }
            (PickerPhase::Open, false) => {
                self.phase = PickerPhase::Closed;
                self.hovered = None;
                self.reveal = None;
                tracing::debug!("picker closed");
                true
            }
            _ => false,
        }
    }

    /// Pointer entered a card.
    pub fn pointer_enter(&mut self, id: &str) {
        if self.is_open() {
            self.hovered = Some(id.to_string());
        }
    }

    /// Pointer left a card. Ignored unless `id` is still the hovered card, so
    /// a late leave from the previous card cannot clear a newer hover.
    pub fn pointer_leave(&mut self, id: &str) {
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
    }

    /// Equips a card. The picker stays open.
    pub fn click(&mut self, store: &mut SelectionStore, id: &str) -> Result<(), SiteError> {
        if let Some(position) = store.catalog().position(id) {
            self.focus = position;
        }
        store.select(id)
    }

    /// Close button. Hides the picker through the store and clears hover.
    pub fn close(&mut self, store: &mut SelectionStore) {
        self.hovered = None;
        store.set_modal_visible(false);
    }

    /// Header accent: hovered color, else equipped color, else [`DEFAULT_ACCENT`].
    #[must_use]
    pub fn accent_color(&self, store: &SelectionStore) -> RgbColor {
        let catalog = store.catalog();
        self.hovered
            .as_deref()
            .and_then(|id| catalog.get(id))
            .or_else(|| catalog.get(store.current()))
            .map_or(DEFAULT_ACCENT, |option| option.color)
    }

    /// Whether a card is emphasized (hovered or equipped).
    #[must_use]
    pub fn is_active(&self, store: &SelectionStore, id: &str) -> bool {
        self.hovered.as_deref() == Some(id) || store.current() == id
    }

    /// Moves keyboard focus forward and previews the focused card.
    pub fn focus_next(&mut self, catalog: &Catalog) {
        if catalog.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % catalog.len();
        self.preview_focused(catalog);
    }

    /// Moves keyboard focus back and previews the focused card.
    pub fn focus_previous(&mut self, catalog: &Catalog) {
        if catalog.is_empty() {
            return;
        }
        self.focus = if self.focus == 0 {
            catalog.len() - 1
        } else {
            self.focus - 1
        };
        self.preview_focused(catalog);
    }

    /// Moves focus by `delta` cards without wrapping (grid rows).
    pub fn focus_by(&mut self, catalog: &Catalog, delta: isize) {
        if catalog.is_empty() {
            return;
        }
        let last = catalog.len() - 1;
        self.focus = self.focus.saturating_add_signed(delta).min(last);
        self.preview_focused(catalog);
    }

    fn preview_focused(&mut self, catalog: &Catalog) {
        if let Some(option) = catalog.options().get(self.focus) {
            self.pointer_enter(&option.id);
        }
    }

    /// Equips the card with keyboard focus.
    pub fn commit_focused(&mut self, store: &mut SelectionStore) -> Result<(), SiteError> {
        let id = store
            .catalog()
            .options()
            .get(self.focus)
            .map(|option| option.id.clone())
            .unwrap_or_else(|| store.catalog().default_id().to_string());
        self.click(store, &id)
    }

    /// Whether the reveal is still playing at `now`.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.reveal.as_ref().is_some_and(|reveal| {
            now.saturating_sub(reveal.started_at).as_secs_f32() < reveal.timeline.duration()
        })
    }

    /// Reveal transform of a picker element (backdrop, panel or card).
    #[must_use]
    pub fn sample(&self, element: Element, now: Duration, viewport: ViewportSize) -> VisualState {
        self.reveal.as_ref().map_or_else(VisualState::default, |reveal| {
            let t = now.saturating_sub(reveal.started_at).as_secs_f32();
            reveal.timeline.sample(element, t, viewport)
        })
    }

    /// Cards in catalog order, ready to draw.
    #[must_use]
    pub fn cards(
        &self,
        store: &SelectionStore,
        now: Duration,
        viewport: ViewportSize,
    ) -> Vec<CardView> {
        store
            .catalog()
            .iter()
            .enumerate()
            .map(|(index, option)| CardView {
                id: option.id.clone(),
                name: option.name.clone(),
                color: option.color,
                icon: self.resolve_icon(option),
                active: self.is_active(store, &option.id),
                selected: store.current() == option.id,
                focused: self.focus == index,
                visual: self.sample(Element::Card(index), now, viewport),
            })
            .collect()
    }

    fn resolve_icon(&self, option: &CharacterOption) -> IconView {
        let Some(icon) = option.icon.as_deref() else {
            return IconView::Placeholder;
        };

        match self.assets_dir.as_deref() {
            None => IconView::Asset(PathBuf::from(icon)),
            Some(dir) => resolve_in(dir, icon, &option.id),
        }
    }
}

fn resolve_in(dir: &Path, icon: &str, id: &str) -> IconView {
    let path = dir.join(icon);
    if path.is_file() {
        IconView::Asset(path)
    } else {
        tracing::debug!(
            character = %id,
            path = %path.display(),
            "icon asset missing, using placeholder"
        );
        IconView::Placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_picker(store: &mut SelectionStore) -> PickerModal {
        let mut picker = PickerModal::default();
        store.set_modal_visible(true);
        picker.sync_visibility(store, Duration::ZERO);
        picker
    }

    #[test]
    fn test_starts_closed() {
        let picker = PickerModal::default();
        assert_eq!(picker.phase(), PickerPhase::Closed);
        assert_eq!(picker.open_transitions(), 0);
    }

    #[test]
    fn test_sync_visibility_follows_store() {
        let mut store = SelectionStore::new(Catalog::builtin());
        let mut picker = open_picker(&mut store);
        assert!(picker.is_open());
        assert!(!picker.sync_visibility(&store, Duration::ZERO));

        store.set_modal_visible(false);
        assert!(picker.sync_visibility(&store, Duration::ZERO));
        assert_eq!(picker.phase(), PickerPhase::Closed);
        assert_eq!(picker.open_transitions(), 1);
    }

    #[test]
    fn test_stale_pointer_leave_is_ignored() {
        let mut store = SelectionStore::new(Catalog::builtin());
        let mut picker = open_picker(&mut store);

        picker.pointer_enter("thor");
        picker.pointer_enter("hulk");
        picker.pointer_leave("thor");
        assert_eq!(picker.hovered(), Some("hulk"));

        picker.pointer_leave("hulk");
        assert_eq!(picker.hovered(), None);
    }

    #[test]
    fn test_hover_ignored_while_closed() {
        let mut picker = PickerModal::default();
        picker.pointer_enter("thor");
        assert_eq!(picker.hovered(), None);
    }

    #[test]
    fn test_click_keeps_picker_open() {
        let mut store = SelectionStore::new(Catalog::builtin());
        let mut picker = open_picker(&mut store);

        picker.click(&mut store, "ironman").unwrap();
        assert_eq!(store.current(), "ironman");
        assert!(store.is_modal_visible());
        assert!(picker.is_open());
        assert!(picker.is_active(&store, "ironman"));
        assert!(!picker.is_active(&store, "cap"));
    }

    #[test]
    fn test_click_unknown_id_keeps_selection() {
        let mut store = SelectionStore::new(Catalog::builtin());
        let mut picker = open_picker(&mut store);

        assert!(picker.click(&mut store, "loki").is_err());
        assert_eq!(store.current(), "cap");
    }

    #[test]
    fn test_close_clears_hover() {
        let mut store = SelectionStore::new(Catalog::builtin());
        let mut picker = open_picker(&mut store);
        picker.pointer_enter("thor");

        picker.close(&mut store);
        assert_eq!(picker.hovered(), None);
        assert!(!store.is_modal_visible());
    }

    #[test]
    fn test_keyboard_focus_wraps_and_previews() {
        let mut store = SelectionStore::new(Catalog::builtin());
        let mut picker = open_picker(&mut store);
        let catalog = store.catalog().clone();
        assert_eq!(picker.focus(), 0);

        picker.focus_previous(&catalog);
        assert_eq!(picker.focus(), catalog.len() - 1);
        assert_eq!(picker.hovered(), Some("strange"));

        picker.focus_next(&catalog);
        picker.focus_next(&catalog);
        assert_eq!(picker.hovered(), Some("ironman"));

        picker.commit_focused(&mut store).unwrap();
        assert_eq!(store.current(), "ironman");

        picker.focus_by(&catalog, 100);
        assert_eq!(picker.focus(), catalog.len() - 1);
        picker.focus_by(&catalog, -100);
        assert_eq!(picker.focus(), 0);
    }

    #[test]
    fn test_open_focuses_equipped_card() {
        let mut store = SelectionStore::new(Catalog::builtin());
        store.select("hulk").unwrap();
        let picker = open_picker(&mut store);
        assert_eq!(picker.focus(), 3);
    }

    #[test]
    fn test_cards_reveal_in_catalog_order() {
        let mut store = SelectionStore::new(Catalog::builtin());
        let picker = open_picker(&mut store);
        let viewport = ViewportSize::new(800.0, 600.0);

        let early = picker.cards(&store, Duration::from_millis(700), viewport);
        assert_eq!(early.len(), 8);
        assert!(early[0].visual.opacity > early[7].visual.opacity);

        let settled = picker.cards(&store, Duration::from_secs(2), viewport);
        assert!(settled.iter().all(|card| (card.visual.opacity - 1.0).abs() < 1e-3));
        assert!(!picker.is_animating(Duration::from_secs(2)));
        assert!(picker.is_animating(Duration::from_millis(700)));
    }

    #[test]
    fn test_icon_resolution() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("cursors")).unwrap();
        std::fs::write(temp_dir.path().join("cursors/cap.png"), b"png").unwrap();

        let mut store = SelectionStore::new(Catalog::builtin());
        store.set_modal_visible(true);
        let mut picker = PickerModal::default().with_assets_dir(temp_dir.path());
        picker.sync_visibility(&store, Duration::ZERO);

        let cards = picker.cards(&store, Duration::ZERO, ViewportSize::new(800.0, 600.0));
        let icon = |id: &str| cards.iter().find(|card| card.id == id).unwrap().icon.clone();

        assert_eq!(icon("cap"), IconView::Asset(temp_dir.path().join("cursors/cap.png")));
        assert_eq!(icon("thor"), IconView::Placeholder);
        assert_eq!(icon("strange"), IconView::Placeholder);
    }

    #[test]
    fn test_badge_contrast() {
        let mut store = SelectionStore::new(Catalog::builtin());
        store.select("widow").unwrap();
        let picker = open_picker(&mut store);
        let cards = picker.cards(&store, Duration::ZERO, ViewportSize::new(800.0, 600.0));

        let widow = cards.iter().find(|card| card.id == "widow").unwrap();
        assert_eq!(widow.badge_text_color(), RgbColor::WHITE);
        let thor = cards.iter().find(|card| card.id == "thor").unwrap();
        assert_eq!(thor.badge_text_color(), RgbColor::BLACK);
        assert_eq!(thor.display_color(), thor.color.grayscale());
    }
}
