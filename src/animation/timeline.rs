//! Compiled, sampleable timelines.
//!
//! Compiling resolves every stage offset to an absolute start time and splits
//! stages into per-element, per-property tweens. Sampling is pure: the same
//! `(element, time, viewport)` always yields the same [`VisualState`], so a
//! renderer can scrub freely.

use super::script::{Element, Offset, PropValue, Property, Props, Script};
use super::{Easing, ViewportSize};

const PROPERTIES: [Property; 5] = [
    Property::X,
    Property::Y,
    Property::Rotation,
    Property::Scale,
    Property::Opacity,
];

/// Resolved transform and opacity of one element at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Horizontal offset in pixels
    pub x: f32,
    /// Vertical offset in pixels
    pub y: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Uniform scale
    pub scale: f32,
    /// Opacity; eased values may briefly overshoot
    pub opacity: f32,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

impl VisualState {
    fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Rotation => self.rotation = value,
            Property::Scale => self.scale = value,
            Property::Opacity => self.opacity = value,
        }
    }

    /// Opacity clamped to the displayable range.
    #[must_use]
    pub fn visible_opacity(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0)
    }

    /// Whether the element should be drawn at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible_opacity() > 0.0 && self.scale > 0.0
    }
}

/// Absolute placement of one stage, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSpan {
    /// First target starts here
    pub start: f32,
    /// Last target finishes here
    pub end: f32,
}

#[derive(Debug, Clone)]
struct Tween {
    element: Element,
    property: Property,
    from: Option<PropValue>,
    to: PropValue,
    start: f32,
    duration: f32,
    easing: Easing,
}

impl Tween {
    fn progress(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.easing.apply((t - self.start) / self.duration)
    }
}

/// A script compiled to absolute times.
#[derive(Debug, Clone)]
pub struct Timeline {
    initial: Vec<(Element, Props)>,
    tweens: Vec<Tween>,
    spans: Vec<StageSpan>,
    duration: f32,
}

impl Timeline {
    /// Resolves stage offsets and splits stages into tweens.
    ///
    /// Offsets that would land before zero are clamped to zero.
    #[must_use]
    pub fn compile(script: &Script) -> Self {
        let mut tweens = Vec::new();
        let mut spans: Vec<StageSpan> = Vec::with_capacity(script.stages.len());
        let mut end = 0.0_f32;

        for stage in &script.stages {
            let previous = spans.last().copied().unwrap_or(StageSpan { start: 0.0, end: 0.0 });
            let start = match stage.offset {
                Offset::Sequence(delta) => end + delta,
                Offset::AfterPrevious(delta) => previous.end + delta,
                Offset::WithPrevious(delta) => previous.start + delta,
                Offset::At(at) => at,
            }
            .max(0.0);

            let mut stage_end = start;
            for (index, &element) in stage.targets.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let target_start = start + stage.stagger * index as f32;
                stage_end = stage_end.max(target_start + stage.duration);

                for (property, to) in stage.to.iter() {
                    tweens.push(Tween {
                        element,
                        property,
                        from: stage.from.as_ref().and_then(|from| from.get(property)),
                        to,
                        start: target_start,
                        duration: stage.duration,
                        easing: stage.easing,
                    });
                }
            }

            spans.push(StageSpan {
                start,
                end: stage_end,
            });
            end = end.max(stage_end);
        }

        Self {
            initial: script.initial.clone(),
            tweens,
            spans,
            duration: end,
        }
    }

    /// Total length in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Absolute placement of each stage, in declaration order.
    #[must_use]
    pub fn stage_spans(&self) -> &[StageSpan] {
        &self.spans
    }

    /// State of `element` at `t` seconds. Times past the end hold the final state.
    #[must_use]
    pub fn sample(&self, element: Element, t: f32, viewport: ViewportSize) -> VisualState {
        let mut state = VisualState::default();
        for property in PROPERTIES {
            state.set(property, self.property_at(element, property, t, viewport));
        }
        state
    }

    /// State of `element` before anything has played.
    #[must_use]
    pub fn initial_state(&self, element: Element, viewport: ViewportSize) -> VisualState {
        self.sample(element, f32::NEG_INFINITY, viewport)
    }

    /// State of `element` once everything has played.
    #[must_use]
    pub fn final_state(&self, element: Element, viewport: ViewportSize) -> VisualState {
        self.sample(element, f32::INFINITY, viewport)
    }

    fn base_value(&self, element: Element, property: Property, viewport: ViewportSize) -> f32 {
        self.initial
            .iter()
            .rev()
            .filter(|(e, _)| *e == element)
            .find_map(|(_, props)| props.get(property))
            .unwrap_or_else(|| property.rest_value())
            .resolve(viewport)
    }

    fn property_at(
        &self,
        element: Element,
        property: Property,
        t: f32,
        viewport: ViewportSize,
    ) -> f32 {
        let base = self.base_value(element, property, viewport);
        let matching: Vec<&Tween> = self
            .tweens
            .iter()
            .filter(|tween| tween.element == element && tween.property == property)
            .collect();

        // Implicit start values are whatever the earlier tweens leave behind
        let mut froms = Vec::with_capacity(matching.len());
        for (index, tween) in matching.iter().enumerate() {
            let from = match tween.from {
                Some(value) => value.resolve(viewport),
                None => evaluate(&matching[..index], &froms, tween.start, base, viewport),
            };
            froms.push(from);
        }

        evaluate(&matching, &froms, t, base, viewport)
    }
}

fn evaluate(tweens: &[&Tween], froms: &[f32], t: f32, base: f32, viewport: ViewportSize) -> f32 {
    let mut value = base;
    for (index, (tween, &from)) in tweens.iter().zip(froms).enumerate() {
        if t >= tween.start {
            let to = tween.to.resolve(viewport);
            value = from + (to - from) * tween.progress(t);
        } else if index == 0 && tween.from.is_some() {
            // Explicit start values render before the tween begins
            value = from;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::script::{Length, Stage};

    const VIEWPORT: ViewportSize = ViewportSize::new(1000.0, 800.0);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_sequence_and_relative_offsets() {
        let script = Script::new()
            .then(Stage::to(Element::Shield, Props::new().rotation(90.0)).duration(1.0))
            .then(
                Stage::to(Element::Tag, Props::new().opacity(1.0))
                    .duration(0.5)
                    .offset(Offset::WithPrevious(0.25)),
            )
            .then(
                Stage::to(Element::Headline, Props::new().opacity(1.0))
                    .duration(0.5)
                    .offset(Offset::AfterPrevious(-0.1)),
            )
            .then(
                Stage::to(Element::Buttons, Props::new().opacity(1.0))
                    .duration(0.2)
                    .offset(Offset::Sequence(0.5)),
            );
        let timeline = Timeline::compile(&script);
        let starts: Vec<f32> = timeline.stage_spans().iter().map(|s| s.start).collect();

        assert!(approx(starts[0], 0.0));
        assert!(approx(starts[1], 0.25));
        assert!(approx(starts[2], 0.65));
        assert!(approx(starts[3], 1.65));
        assert!(approx(timeline.duration(), 1.85));
    }

    #[test]
    fn test_negative_offsets_clamp_to_zero() {
        let script = Script::new().then(
            Stage::to(Element::Tag, Props::new().opacity(0.0)).offset(Offset::Sequence(-1.0)),
        );
        let timeline = Timeline::compile(&script);
        assert!(approx(timeline.stage_spans()[0].start, 0.0));
    }

    #[test]
    fn test_implicit_from_chains_through_stages() {
        let script = Script::new()
            .set(Element::Shield, Props::new().scale(1.5))
            .then(
                Stage::to(Element::Shield, Props::new().x(Length::Vw(-30.0)))
                    .duration(1.0)
                    .ease(Easing::Linear),
            )
            .then(
                Stage::to(Element::Shield, Props::new().x(Length::Px(-100.0)))
                    .duration(1.0)
                    .ease(Easing::Linear),
            );
        let timeline = Timeline::compile(&script);

        let start = timeline.sample(Element::Shield, 0.0, VIEWPORT);
        assert!(approx(start.x, 0.0));
        assert!(approx(start.scale, 1.5));

        assert!(approx(timeline.sample(Element::Shield, 0.5, VIEWPORT).x, -150.0));
        assert!(approx(timeline.sample(Element::Shield, 1.0, VIEWPORT).x, -300.0));
        assert!(approx(timeline.sample(Element::Shield, 1.5, VIEWPORT).x, -200.0));
        assert!(approx(timeline.final_state(Element::Shield, VIEWPORT).x, -100.0));
    }

    #[test]
    fn test_explicit_from_renders_immediately() {
        let script = Script::new()
            .then(Stage::to(Element::Shield, Props::new().rotation(10.0)).duration(1.0))
            .then(
                Stage::to(Element::Panel, Props::new().opacity(1.0))
                    .from(Props::new().opacity(0.0))
                    .duration(1.0),
            );
        let timeline = Timeline::compile(&script);

        assert!(approx(timeline.sample(Element::Panel, 0.5, VIEWPORT).opacity, 0.0));
        assert!(approx(timeline.final_state(Element::Panel, VIEWPORT).opacity, 1.0));
    }

    #[test]
    fn test_stagger_spreads_targets() {
        let cards = (0..3).map(Element::Card).collect();
        let script = Script::new().then(
            Stage::to_many(cards, Props::new().opacity(1.0))
                .from(Props::new().opacity(0.0))
                .duration(0.3)
                .stagger(0.05)
                .ease(Easing::Linear),
        );
        let timeline = Timeline::compile(&script);

        assert!(approx(timeline.duration(), 0.4));
        let first = timeline.sample(Element::Card(0), 0.1, VIEWPORT).opacity;
        let last = timeline.sample(Element::Card(2), 0.1, VIEWPORT).opacity;
        assert!(first > last);
        assert!(approx(last, 0.0));
    }

    #[test]
    fn test_absolute_offsets_ignore_earlier_stages() {
        let script = Script::new()
            .then(Stage::to(Element::Shield, Props::new().rotation(90.0)).duration(2.0))
            .then(
                Stage::to(Element::Tag, Props::new().opacity(1.0))
                    .duration(0.5)
                    .offset(Offset::At(0.75)),
            )
            .then(
                Stage::to(Element::Headline, Props::new().opacity(1.0))
                    .duration(0.5)
                    .offset(Offset::At(-3.0)),
            )
            .then(
                Stage::to(Element::Buttons, Props::new().opacity(1.0))
                    .duration(0.5)
                    .offset(Offset::At(4.0)),
            );
        let timeline = Timeline::compile(&script);
        let spans = timeline.stage_spans();

        assert!(approx(spans[1].start, 0.75));
        assert!(approx(spans[1].end, 1.25));
        assert!(approx(spans[2].start, 0.0));
        assert!(approx(spans[3].start, 4.0));
        assert!(approx(timeline.duration(), 4.5));
    }

    #[test]
    fn test_untouched_element_is_default() {
        let timeline = Timeline::compile(&Script::new());
        assert_eq!(timeline.sample(Element::Tag, 1.0, VIEWPORT), VisualState::default());
        assert!(approx(timeline.duration(), 0.0));
    }
}
