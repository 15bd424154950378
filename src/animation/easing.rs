//! Easing curves, named the way timeline authors write them
//! (`power2.inOut`, `back.out(1.7)`, `elastic.out(1, 0.5)`).
//!
//! `back` and `elastic` overshoot outside 0.0-1.0; consumers must tolerate that.

// Allow float comparisons for exact curve endpoints
#![allow(clippy::float_cmp)]

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

/// Default overshoot of `back` curves.
const BACK_OVERSHOOT: f32 = 1.70158;
/// Default period of `elastic.in` and `elastic.out`.
const ELASTIC_PERIOD: f32 = 0.3;
/// Default period of `elastic.inOut`.
const ELASTIC_IN_OUT_PERIOD: f32 = 0.45;

/// Which end of the curve is eased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EaseDirection {
    /// Slow start
    In,
    /// Slow end
    #[default]
    Out,
    /// Slow start and end
    InOut,
}

impl EaseDirection {
    const fn elastic_period(self) -> f32 {
        match self {
            Self::InOut => ELASTIC_IN_OUT_PERIOD,
            Self::In | Self::Out => ELASTIC_PERIOD,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inOut",
        }
    }
}

/// An easing curve mapping linear progress (0.0-1.0) to eased progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Polynomial curve; `Power(1, ..)` is quadratic, `Power(2, ..)` cubic and so on.
    Power(u8, EaseDirection),
    /// Sinusoidal curve.
    Sine(EaseDirection),
    /// Overshoots by `overshoot` before settling.
    Back(EaseDirection, f32),
    /// Spring with the given amplitude and period.
    Elastic(EaseDirection, f32, f32),
}

impl Default for Easing {
    /// Curve used when a stage names none (`power1.out`).
    fn default() -> Self {
        Self::Power(1, EaseDirection::Out)
    }
}

impl Easing {
    /// `power2.inOut`, the relocation curve of the hero shield.
    pub const POWER2_IN_OUT: Self = Self::Power(2, EaseDirection::InOut);

    /// Applies the curve. Input is clamped to 0.0-1.0; output may overshoot.
    #[must_use]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }

        match *self {
            Self::Linear => t,
            Self::Power(power, direction) => {
                let exponent = i32::from(power) + 1;
                shape(direction, t, |p| p.powi(exponent))
            }
            Self::Sine(direction) => shape(direction, t, |p| 1.0 - (p * PI / 2.0).cos()),
            Self::Back(direction, overshoot) => {
                shape(direction, t, |p| p * p * ((overshoot + 1.0) * p - overshoot))
            }
            Self::Elastic(direction, amplitude, period) => shape(direction, t, |p| {
                1.0 - elastic_out(1.0 - p, amplitude, period)
            }),
        }
    }
}

/// Builds the requested direction from an ease-in curve.
fn shape(direction: EaseDirection, t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    match direction {
        EaseDirection::In => ease_in(t),
        EaseDirection::Out => 1.0 - ease_in(1.0 - t),
        EaseDirection::InOut => {
            if t < 0.5 {
                ease_in(t * 2.0) / 2.0
            } else {
                1.0 - ease_in((1.0 - t) * 2.0) / 2.0
            }
        }
    }
}

/// Elastic ease-out. Amplitudes below 1 are treated as 1 and shorten the period.
fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let amp = amplitude.max(1.0);
    let period = period / amplitude.min(1.0).max(f32::EPSILON);
    let phase = period / TAU * (1.0 / amp).asin();
    amp * 2f32.powf(-10.0 * t) * ((t - phase) * TAU / period).sin() + 1.0
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "none"),
            Self::Power(power, direction) => write!(f, "power{power}.{}", direction.label()),
            Self::Sine(direction) => write!(f, "sine.{}", direction.label()),
            Self::Back(direction, overshoot) => {
                write!(f, "back.{}({overshoot})", direction.label())
            }
            Self::Elastic(direction, amplitude, period) => {
                write!(f, "elastic.{}({amplitude}, {period})", direction.label())
            }
        }
    }
}

fn easing_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^(power[0-4]|sine|back|elastic)\.(in|out|inOut)(?:\(([^)]*)\))?$")
        })
        .as_ref()
        .map_err(|err| anyhow::anyhow!("Failed to compile easing pattern: {err}"))
}

impl FromStr for Easing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if matches!(name, "none" | "linear") {
            return Ok(Self::Linear);
        }

        let pattern = easing_pattern()?;
        let captures = pattern
            .captures(name)
            .with_context(|| format!("Unknown easing '{name}'"))?;

        let direction = match &captures[2] {
            "in" => EaseDirection::In,
            "out" => EaseDirection::Out,
            _ => EaseDirection::InOut,
        };

        let params: Vec<f32> = match captures.get(3) {
            Some(args) if !args.as_str().trim().is_empty() => args
                .as_str()
                .split(',')
                .map(|arg| {
                    arg.trim()
                        .parse::<f32>()
                        .with_context(|| format!("Invalid easing parameter '{arg}' in '{name}'"))
                })
                .collect::<Result<_>>()?,
            _ => Vec::new(),
        };

        let family = &captures[1];
        let easing = match family {
            "sine" => Self::Sine(direction),
            "back" => Self::Back(direction, params.first().copied().unwrap_or(BACK_OVERSHOOT)),
            "elastic" => Self::Elastic(
                direction,
                params.first().copied().unwrap_or(1.0),
                params.get(1).copied().unwrap_or(direction.elastic_period()),
            ),
            _ => {
                // "power0" is linear
                let power = family.trim_start_matches("power").parse::<u8>().unwrap_or(1);
                if power == 0 {
                    Self::Linear
                } else {
                    Self::Power(power, direction)
                }
            }
        };

        if matches!(family, "sine" | "power0" | "power1" | "power2" | "power3" | "power4")
            && !params.is_empty()
        {
            anyhow::bail!("Easing '{family}' takes no parameters");
        }

        Ok(easing)
    }
}
