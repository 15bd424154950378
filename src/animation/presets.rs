//! The site's built-in animation scripts.

use super::script::{Element, Length, Offset, Props, Script, Stage};
use super::Timeline;

/// A named place the hero shield travels to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Name of the layout slot
    pub name: &'static str,
    /// Horizontal offset from the hero center
    pub x: Length,
    /// Vertical offset from the hero center
    pub y: Length,
}

/// Intermediate shield positions, one per content group, in visiting order.
pub const HERO_ANCHORS: [Anchor; 4] = [
    Anchor { name: "tag", x: Length::Vw(-30.0), y: Length::Vh(-35.0) },
    Anchor { name: "title", x: Length::Vw(-25.0), y: Length::Vh(-10.0) },
    Anchor { name: "subtext", x: Length::Vw(-20.0), y: Length::Vh(15.0) },
    Anchor { name: "buttons", x: Length::Vw(-10.0), y: Length::Vh(30.0) },
];

/// Where the shield lands, merged with the headline numeral.
pub const LANDING: Anchor = Anchor {
    name: "numeral",
    x: Length::Px(-100.0),
    y: Length::Px(-20.0),
};

/// Content group revealed at each anchor, with the shield rotation reached there.
const REVEALS: [(Element, f32); 4] = [
    (Element::Tag, 540.0),
    (Element::Headline, 720.0),
    (Element::Subtext, 900.0),
    (Element::Buttons, 1080.0),
];

/// Hero entrance script.
///
/// The shield starts centered and oversized, visits one anchor per content
/// group, then lands beside the numeral so the headline reads "4.0".
#[must_use]
pub fn hero_script() -> Script {
    let mut script = Script::new()
        .set(
            Element::Shield,
            Props::new()
                .x(Length::Px(0.0))
                .y(Length::Px(0.0))
                .scale(1.5)
                .opacity(1.0),
        )
        .set(Element::Tag, Props::new().opacity(0.0).scale(0.0))
        .set(Element::Headline, Props::new().opacity(0.0).x(Length::Px(-100.0)))
        .set(Element::Numeral, Props::new().opacity(0.0).scale(0.0))
        .set(Element::Subtext, Props::new().opacity(0.0).y(Length::Px(50.0)))
        .set(Element::Buttons, Props::new().opacity(0.0).y(Length::Px(30.0)))
        .then(
            Stage::to(Element::Shield, Props::new().rotation(360.0))
                .duration(0.6)
                .ease_named("power2.inOut"),
        );

    for (anchor, (group, rotation)) in HERO_ANCHORS.iter().zip(REVEALS) {
        script = script
            .then(
                Stage::to(Element::Shield, Props::new().x(anchor.x).y(anchor.y))
                    .duration(0.5)
                    .ease_named("power2.inOut"),
            )
            .then(
                Stage::to(Element::Shield, Props::new().rotation(rotation))
                    .duration(0.5)
                    .offset(Offset::WithPrevious(0.0)),
            )
            .then(reveal(group).offset(Offset::AfterPrevious(-0.2)));
    }

    script
        .then(
            Stage::to(
                Element::Shield,
                Props::new().x(LANDING.x).y(LANDING.y).scale(0.4),
            )
            .duration(0.8)
            .ease_named("elastic.out(1, 0.5)"),
        )
        .then(
            Stage::to(Element::Shield, Props::new().rotation(1440.0))
                .duration(0.8)
                .offset(Offset::WithPrevious(0.0)),
        )
        .then(
            Stage::to(Element::Numeral, Props::new().opacity(1.0).scale(1.0))
                .duration(0.5)
                .ease_named("back.out(2)")
                .offset(Offset::WithPrevious(0.2)),
        )
}

/// Reveal stage for one content group, undoing its hidden initial state.
fn reveal(group: Element) -> Stage {
    match group {
        Element::Tag => Stage::to(group, Props::new().opacity(1.0).scale(1.0))
            .duration(0.3)
            .ease_named("back.out(1.7)"),
        Element::Headline => Stage::to(group, Props::new().opacity(1.0).x(Length::Px(0.0)))
            .duration(0.4)
            .ease_named("power2.out"),
        _ => Stage::to(group, Props::new().opacity(1.0).y(Length::Px(0.0)))
            .duration(0.4)
            .ease_named("power2.out"),
    }
}

/// Compiled hero entrance.
#[must_use]
pub fn hero_entrance() -> Timeline {
    Timeline::compile(&hero_script())
}

/// Picker open animation: backdrop fade, panel pop, then staggered cards.
///
/// Cards start 0.2s before the panel finishes. There is deliberately no
/// matching close animation; the picker unmounts immediately.
#[must_use]
pub fn picker_reveal(card_count: usize, stagger: f32) -> Timeline {
    let cards = (0..card_count).map(Element::Card).collect();

    let script = Script::new()
        .then(
            Stage::to(Element::Backdrop, Props::new().opacity(1.0))
                .from(Props::new().opacity(0.0))
                .duration(0.3),
        )
        .then(
            Stage::to(
                Element::Panel,
                Props::new().scale(1.0).y(Length::Px(0.0)).opacity(1.0),
            )
            .from(Props::new().scale(0.8).y(Length::Px(100.0)).opacity(0.0))
            .duration(0.5)
            .ease_named("back.out(1.2)"),
        )
        .then(
            Stage::to_many(cards, Props::new().y(Length::Px(0.0)).opacity(1.0))
                .from(Props::new().y(Length::Px(20.0)).opacity(0.0))
                .duration(0.3)
                .stagger(stagger)
                .ease_named("power2.out")
                .offset(Offset::Sequence(-0.2)),
        );

    Timeline::compile(&script)
}
