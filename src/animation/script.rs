//! Declarative animation scripts.
//!
//! A script is an initial state plus an ordered list of stages. Each stage
//! tweens some properties of one or more elements, with an explicit offset
//! relative to the stages before it. Scripts are plain data; [`Timeline`]
//! turns them into something that can be sampled.
//!
//! [`Timeline`]: super::Timeline

use std::fmt;

use super::Easing;

/// Elements an animation can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    /// The decorative hero shield
    Shield,
    /// "FIRST AVENGER EDITION" tag
    Tag,
    /// Headline word
    Headline,
    /// Headline numeral the shield lands next to
    Numeral,
    /// Quote and tagline block
    Subtext,
    /// Call-to-action buttons
    Buttons,
    /// Picker backdrop
    Backdrop,
    /// Picker panel
    Panel,
    /// Picker card by catalog position
    Card(usize),
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shield => write!(f, "shield"),
            Self::Tag => write!(f, "tag"),
            Self::Headline => write!(f, "headline"),
            Self::Numeral => write!(f, "numeral"),
            Self::Subtext => write!(f, "subtext"),
            Self::Buttons => write!(f, "buttons"),
            Self::Backdrop => write!(f, "backdrop"),
            Self::Panel => write!(f, "panel"),
            Self::Card(index) => write!(f, "card-{index}"),
        }
    }
}

/// Size of the area lengths resolve against, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ViewportSize {
    /// Creates a viewport size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A positional length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Absolute pixels
    Px(f32),
    /// Percent of viewport width
    Vw(f32),
    /// Percent of viewport height
    Vh(f32),
}

impl Length {
    /// Resolves to pixels.
    #[must_use]
    pub fn to_px(self, viewport: ViewportSize) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Vw(percent) => viewport.width * percent / 100.0,
            Self::Vh(percent) => viewport.height * percent / 100.0,
        }
    }
}

/// Animatable properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    /// Horizontal offset from the element's anchor
    X,
    /// Vertical offset from the element's anchor
    Y,
    /// Rotation in degrees
    Rotation,
    /// Uniform scale
    Scale,
    /// Opacity, 0.0-1.0
    Opacity,
}

impl Property {
    /// Value of the property when nothing has set it.
    #[must_use]
    pub const fn rest_value(self) -> PropValue {
        match self {
            Self::X | Self::Y => PropValue::Length(Length::Px(0.0)),
            Self::Rotation => PropValue::Number(0.0),
            Self::Scale | Self::Opacity => PropValue::Number(1.0),
        }
    }
}

/// A property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropValue {
    /// Positional value
    Length(Length),
    /// Unitless value (degrees, scale, opacity)
    Number(f32),
}

impl PropValue {
    /// Resolves to a plain number (pixels for lengths).
    #[must_use]
    pub fn resolve(self, viewport: ViewportSize) -> f32 {
        match self {
            Self::Length(length) => length.to_px(viewport),
            Self::Number(value) => value,
        }
    }
}

/// An ordered set of property targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(Vec<(Property, PropValue)>);

impl Props {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, property: Property, value: PropValue) -> Self {
        self.0.retain(|(existing, _)| *existing != property);
        self.0.push((property, value));
        self
    }

    /// Sets the horizontal offset.
    #[must_use]
    pub fn x(self, length: Length) -> Self {
        self.with(Property::X, PropValue::Length(length))
    }

    /// Sets the vertical offset.
    #[must_use]
    pub fn y(self, length: Length) -> Self {
        self.with(Property::Y, PropValue::Length(length))
    }

    /// Sets the rotation in degrees.
    #[must_use]
    pub fn rotation(self, degrees: f32) -> Self {
        self.with(Property::Rotation, PropValue::Number(degrees))
    }

    /// Sets the scale.
    #[must_use]
    pub fn scale(self, scale: f32) -> Self {
        self.with(Property::Scale, PropValue::Number(scale))
    }

    /// Sets the opacity.
    #[must_use]
    pub fn opacity(self, opacity: f32) -> Self {
        self.with(Property::Opacity, PropValue::Number(opacity))
    }

    /// Value for one property, if set.
    #[must_use]
    pub fn get(&self, property: Property) -> Option<PropValue> {
        self.0
            .iter()
            .find(|(existing, _)| *existing == property)
            .map(|(_, value)| *value)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, PropValue)> + '_ {
        self.0.iter().copied()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a stage starts, relative to what came before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    /// Relative to the end of the whole timeline so far (`+=`/`-=`; default with 0.0).
    Sequence(f32),
    /// Relative to the end of the previous stage (`>`).
    AfterPrevious(f32),
    /// Relative to the start of the previous stage (`<`).
    WithPrevious(f32),
    /// Absolute time in seconds.
    At(f32),
}

impl Default for Offset {
    fn default() -> Self {
        Self::Sequence(0.0)
    }
}

/// One timed step of a script.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Elements tweened by this stage, in stagger order
    pub targets: Vec<Element>,
    /// Explicit start values, applied as soon as the script is compiled
    pub from: Option<Props>,
    /// End values
    pub to: Props,
    /// Duration in seconds
    pub duration: f32,
    /// Easing curve
    pub easing: Easing,
    /// Start offset
    pub offset: Offset,
    /// Delay between consecutive targets, in seconds
    pub stagger: f32,
}

impl Stage {
    /// Tweens one element from its current values to `to`.
    #[must_use]
    pub fn to(target: Element, to: Props) -> Self {
        Self::to_many(vec![target], to)
    }

    /// Tweens several elements, staggered in order.
    #[must_use]
    pub fn to_many(targets: Vec<Element>, to: Props) -> Self {
        Self {
            targets,
            from: None,
            to,
            duration: 0.5,
            easing: Easing::default(),
            offset: Offset::default(),
            stagger: 0.0,
        }
    }

    /// Sets explicit start values.
    #[must_use]
    pub fn from(mut self, from: Props) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the duration in seconds.
    #[must_use]
    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    /// Sets the easing curve.
    #[must_use]
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the easing curve from an identifier such as `power2.inOut` or
    /// `elastic.out(1, 0.5)`. An unknown identifier keeps the current curve.
    #[must_use]
    pub fn ease_named(self, name: &str) -> Self {
        match name.parse::<Easing>() {
            Ok(easing) => self.ease(easing),
            Err(err) => {
                tracing::warn!(easing = name, error = %err, "unknown easing, keeping {}", self.easing);
                self
            }
        }
    }

    /// Sets the start offset.
    #[must_use]
    pub fn offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the per-target stagger in seconds.
    #[must_use]
    pub fn stagger(mut self, seconds: f32) -> Self {
        self.stagger = seconds.max(0.0);
        self
    }
}

/// Initial state plus ordered stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    /// Values applied before the first stage
    pub initial: Vec<(Element, Props)>,
    /// Stages in declaration order
    pub stages: Vec<Stage>,
}

impl Script {
    /// Empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds initial values for an element.
    #[must_use]
    pub fn set(mut self, element: Element, props: Props) -> Self {
        self.initial.push((element, props));
        self
    }

    /// Appends a stage.
    #[must_use]
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }
}
