//! Rectangle math and pixel/percentage size resolution.

use std::fmt;
use std::str::FromStr;

use egui::{Pos2, Rect, Vec2};

/// A length that is either absolute or relative to the container being measured.
///
/// Parses the same strings a layout author would write: `"200px"`, `"200"` and `"50%"`, and
/// serializes back to that form. A bare number deserializes as pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeValue {
    Pixels(f32),
    Percent(f32),
}

impl SizeValue {
    /// Resolve to pixels against the container length `total`.
    pub fn to_pixels(self, total: f32) -> f32 {
        match self {
            Self::Pixels(px) => px,
            Self::Percent(pct) => total * pct / 100.0,
        }
    }
}

impl From<f32> for SizeValue {
    fn from(px: f32) -> Self {
        Self::Pixels(px)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseSizeError(String);

impl fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid size value: {:?}", self.0)
    }
}

impl std::error::Error for ParseSizeError {}

impl FromStr for SizeValue {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parse = |num: &str| {
            num.trim()
                .parse::<f32>()
                .map_err(|_err| ParseSizeError(s.to_owned()))
        };
        if let Some(num) = trimmed.strip_suffix('%') {
            return parse(num).map(Self::Percent);
        }
        if let Some(num) = trimmed.strip_suffix("px") {
            return parse(num).map(Self::Pixels);
        }
        parse(trimmed).map(Self::Pixels)
    }
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl serde::Serialize for SizeValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for SizeValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f32),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Number(px) => Ok(Self::Pixels(px)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl TryFrom<&str> for SizeValue {
    type Error = ParseSizeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which side of a rectangle something is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn is_horizontal_axis(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Split `rect` at `split` pixels along the main axis, leaving a `bar` wide gap centered on the split line.
///
/// Returns `(first, bar, second)`.
pub(crate) fn split_rect(rect: Rect, horizontal: bool, split: f32, bar: f32) -> (Rect, Rect, Rect) {
    let half = bar * 0.5;
    if horizontal {
        let x = rect.left() + split;
        let first = Rect::from_min_max(rect.min, Pos2::new((x - half).max(rect.left()), rect.bottom()));
        let second = Rect::from_min_max(Pos2::new((x + half).min(rect.right()), rect.top()), rect.max);
        let bar = Rect::from_min_max(
            Pos2::new(first.right(), rect.top()),
            Pos2::new(second.left(), rect.bottom()),
        );
        (first, bar, second)
    } else {
        let y = rect.top() + split;
        let first = Rect::from_min_max(rect.min, Pos2::new(rect.right(), (y - half).max(rect.top())));
        let second = Rect::from_min_max(Pos2::new(rect.left(), (y + half).min(rect.bottom())), rect.max);
        let bar = Rect::from_min_max(
            Pos2::new(rect.left(), first.bottom()),
            Pos2::new(rect.right(), second.top()),
        );
        (first, bar, second)
    }
}

/// The band of `rect` along `side`, `fraction` of its extent deep.
pub(crate) fn edge_band(rect: Rect, side: Side, fraction: f32) -> Rect {
    let w = rect.width() * fraction;
    let h = rect.height() * fraction;
    match side {
        Side::Left => Rect::from_min_max(rect.min, Pos2::new(rect.left() + w, rect.bottom())),
        Side::Right => Rect::from_min_max(Pos2::new(rect.right() - w, rect.top()), rect.max),
        Side::Top => Rect::from_min_max(rect.min, Pos2::new(rect.right(), rect.top() + h)),
        Side::Bottom => Rect::from_min_max(Pos2::new(rect.left(), rect.bottom() - h), rect.max),
    }
}

/// A strip of fixed `thickness` along `side`, and what remains of `rect`.
pub(crate) fn take_strip(rect: Rect, side: Side, thickness: f32) -> (Rect, Rect) {
    let w = thickness.min(rect.width()).max(0.0);
    let h = thickness.min(rect.height()).max(0.0);
    match side {
        Side::Left => (
            Rect::from_min_max(rect.min, Pos2::new(rect.left() + w, rect.bottom())),
            Rect::from_min_max(Pos2::new(rect.left() + w, rect.top()), rect.max),
        ),
        Side::Right => (
            Rect::from_min_max(Pos2::new(rect.right() - w, rect.top()), rect.max),
            Rect::from_min_max(rect.min, Pos2::new(rect.right() - w, rect.bottom())),
        ),
        Side::Top => (
            Rect::from_min_max(rect.min, Pos2::new(rect.right(), rect.top() + h)),
            Rect::from_min_max(Pos2::new(rect.left(), rect.top() + h), rect.max),
        ),
        Side::Bottom => (
            Rect::from_min_max(Pos2::new(rect.left(), rect.bottom() - h), rect.max),
            Rect::from_min_max(rect.min, Pos2::new(rect.right(), rect.bottom() - h)),
        ),
    }
}

/// Shift `rect` so that it lies inside `bounds` where possible, keeping its size.
pub(crate) fn clamp_rect_into(rect: Rect, bounds: Rect) -> Rect {
    if !bounds.is_positive() {
        return rect;
    }
    let mut delta = Vec2::ZERO;
    if rect.width() <= bounds.width() {
        if rect.left() < bounds.left() {
            delta.x = bounds.left() - rect.left();
        } else if rect.right() > bounds.right() {
            delta.x = bounds.right() - rect.right();
        }
    } else {
        delta.x = bounds.left() - rect.left();
    }
    if rect.height() <= bounds.height() {
        if rect.top() < bounds.top() {
            delta.y = bounds.top() - rect.top();
        } else if rect.bottom() > bounds.bottom() {
            delta.y = bounds.bottom() - rect.bottom();
        }
    } else {
        delta.y = bounds.top() - rect.top();
    }
    rect.translate(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pixel_and_percent_sizes() {
        assert_eq!("200px".parse::<SizeValue>(), Ok(SizeValue::Pixels(200.0)));
        assert_eq!(" 50% ".parse::<SizeValue>(), Ok(SizeValue::Percent(50.0)));
        assert_eq!("120".parse::<SizeValue>(), Ok(SizeValue::Pixels(120.0)));
        assert!("wide".parse::<SizeValue>().is_err());
    }

    #[test]
    fn resolves_against_container() {
        assert_eq!(SizeValue::Percent(25.0).to_pixels(800.0), 200.0);
        assert_eq!(SizeValue::Pixels(200.0).to_pixels(800.0), 200.0);
    }

    #[test]
    fn serializes_as_css_like_strings() {
        let sizes = vec![SizeValue::Pixels(200.0), SizeValue::Percent(12.5)];
        let json = serde_json::to_string(&sizes).unwrap();
        assert_eq!(json, r#"["200px","12.5%"]"#);
        let back: Vec<SizeValue> = serde_json::from_str(r#"["200px","12.5%",40]"#).unwrap();
        assert_eq!(back, vec![SizeValue::Pixels(200.0), SizeValue::Percent(12.5), SizeValue::Pixels(40.0)]);
    }

    #[test]
    fn split_rect_keeps_bar_between_panes() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0));
        let (a, bar, b) = split_rect(rect, true, 40.0, 4.0);
        assert_eq!(a.right(), 38.0);
        assert_eq!(bar.width(), 4.0);
        assert_eq!(b.left(), 42.0);
        assert_eq!(b.right(), 100.0);
    }

    #[test]
    fn clamp_moves_rect_back_inside() {
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 100.0));
        let rect = Rect::from_min_size(Pos2::new(80.0, -10.0), Vec2::new(40.0, 40.0));
        let clamped = clamp_rect_into(rect, bounds);
        assert_eq!(clamped.min, Pos2::new(60.0, 0.0));
    }
}
