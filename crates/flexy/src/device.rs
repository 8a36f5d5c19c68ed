//! Device gate
//!
//! Conditional rendering by device class, orientation, language and pixel
//! windows, evaluated against the live viewport on every pass.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Viewport, Window};

/// Widest viewport considered a phone
pub const MOBILE_MAX_WIDTH: f64 = 768.0;
/// Widest viewport considered a tablet
pub const TABLET_MAX_WIDTH: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    /// Classify a viewport width; the narrowest matching class wins
    pub fn for_width(width: f64) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            Self::Mobile
        } else if width <= TABLET_MAX_WIDTH {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn of(viewport: Viewport) -> Self {
        if viewport.width > viewport.height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// A single value or a list of accepted values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: PartialEq> OneOrMany<T> {
    pub fn contains(&self, value: &T) -> bool {
        match self {
            Self::One(v) => v == value,
            Self::Many(vs) => vs.contains(value),
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        Self::One(value)
    }
}

/// Pixel bounds `[width?, height?]`. A bound of zero counts as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Bounds {
    pub fn width(width: f64) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub fn new(width: Option<f64>, height: Option<f64>) -> Self {
        Self { width, height }
    }

    fn width_bound(&self) -> Option<f64> {
        self.width.filter(|w| *w != 0.0)
    }

    fn height_bound(&self) -> Option<f64> {
        self.height.filter(|h| *h != 0.0)
    }
}

fn bounds_from_list<'de, D>(deserializer: D) -> Result<Option<Bounds>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<Vec<Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(list.map(|l| Bounds {
        width: l.first().copied().flatten(),
        height: l.get(1).copied().flatten(),
    }))
}

/// Pixel window: `{ "max": [w?, h?], "min": [w?, h?] }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Breakpoint {
    #[serde(default, deserialize_with = "bounds_from_list")]
    pub max: Option<Bounds>,
    #[serde(default, deserialize_with = "bounds_from_list")]
    pub min: Option<Bounds>,
}

impl Breakpoint {
    pub fn max(bounds: Bounds) -> Self {
        Self {
            max: Some(bounds),
            min: None,
        }
    }

    pub fn min(bounds: Bounds) -> Self {
        Self {
            max: None,
            min: Some(bounds),
        }
    }

    /// Every given bound holds
    pub fn matches(&self, viewport: Viewport) -> bool {
        if let Some(max) = &self.max {
            if max.width_bound().is_some_and(|w| viewport.width > w)
                || max.height_bound().is_some_and(|h| viewport.height > h)
            {
                return false;
            }
        }
        if let Some(min) = &self.min {
            if min.width_bound().is_some_and(|w| viewport.width < w)
                || min.height_bound().is_some_and(|h| viewport.height < h)
            {
                return false;
            }
        }
        true
    }
}

/// Render condition. Absent constraints hold.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceGate {
    pub device_types: Option<OneOrMany<DeviceType>>,
    pub device_orientations: Option<OneOrMany<Orientation>>,
    pub language: Option<OneOrMany<String>>,
    /// All entries must match
    pub breakpoints: Option<Vec<Breakpoint>>,
    /// Render when there is no display surface
    #[serde(default)]
    pub default: bool,
}

impl DeviceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device_types(mut self, types: impl Into<OneOrMany<DeviceType>>) -> Self {
        self.device_types = Some(types.into());
        self
    }

    pub fn orientations(mut self, orientations: impl Into<OneOrMany<Orientation>>) -> Self {
        self.device_orientations = Some(orientations.into());
        self
    }

    pub fn language(mut self, language: impl Into<OneOrMany<String>>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoints.get_or_insert_with(Vec::new).push(breakpoint);
        self
    }

    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Evaluate against the window
    pub fn matches(&self, window: &Window) -> bool {
        let Some(viewport) = window.viewport else {
            return self.default;
        };
        self.matches_orientation(viewport)
            && self.matches_device(viewport)
            && self.matches_language(&window.language)
            && self.matches_breakpoints(viewport)
    }

    fn matches_orientation(&self, viewport: Viewport) -> bool {
        self.device_orientations
            .as_ref()
            .is_none_or(|o| o.contains(&Orientation::of(viewport)))
    }

    fn matches_device(&self, viewport: Viewport) -> bool {
        self.device_types
            .as_ref()
            .is_none_or(|t| t.contains(&DeviceType::for_width(viewport.width)))
    }

    fn matches_language(&self, language: &str) -> bool {
        self.language
            .as_ref()
            .is_none_or(|l| l.contains(&language.to_string()))
    }

    fn matches_breakpoints(&self, viewport: Viewport) -> bool {
        self.breakpoints
            .as_ref()
            .is_none_or(|bps| bps.iter().all(|bp| bp.matches(viewport)))
    }
}
