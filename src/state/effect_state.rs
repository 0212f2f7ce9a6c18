//! Declarative effect state
//!
//! Each feature the engine exposes is one [`EffectChange`] variant carrying
//! its typed value. An "off" value (false, zero, empty) means the feature is
//! disabled; there is no separate enabled flag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Framing of the auxiliary view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    #[default]
    Center,
    LeftBottom,
    RightBottom,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Center => "center",
            LayoutMode::LeftBottom => "left-bottom",
            LayoutMode::RightBottom => "right-bottom",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature names, without values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Running,
    Blur,
    Color,
    Replace,
    ColorCorrection,
    LowLight,
    Mirroring,
    Freeze,
    SmartZoom,
    Beautification,
    Sharpness,
    Layout,
}

impl Feature {
    /// Every feature, in canonical order
    pub const ALL: [Feature; 12] = [
        Feature::Running,
        Feature::Blur,
        Feature::Color,
        Feature::Replace,
        Feature::ColorCorrection,
        Feature::LowLight,
        Feature::Mirroring,
        Feature::Freeze,
        Feature::SmartZoom,
        Feature::Beautification,
        Feature::Sharpness,
        Feature::Layout,
    ];

    /// Canonical document key
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Running => "running",
            Feature::Blur => "blur",
            Feature::Color => "color",
            Feature::Replace => "replace",
            Feature::ColorCorrection => "colorCorrection",
            Feature::LowLight => "lowLight",
            Feature::Mirroring => "mirroring",
            Feature::Freeze => "freeze",
            Feature::SmartZoom => "smartZoom",
            Feature::Beautification => "beautification",
            Feature::Sharpness => "sharpness",
            Feature::Layout => "layout",
        }
    }

    /// Parse a document key. Accepts the short lowercase spellings too.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "running" => Some(Feature::Running),
            "blur" => Some(Feature::Blur),
            "color" => Some(Feature::Color),
            "replace" => Some(Feature::Replace),
            "colorCorrection" | "ccorrection" => Some(Feature::ColorCorrection),
            "lowLight" | "lowlight" => Some(Feature::LowLight),
            "mirroring" => Some(Feature::Mirroring),
            "freeze" => Some(Feature::Freeze),
            "smartZoom" | "smartzoom" => Some(Feature::SmartZoom),
            "beautification" => Some(Feature::Beautification),
            "sharpness" => Some(Feature::Sharpness),
            "layout" => Some(Feature::Layout),
            _ => None,
        }
    }

    /// Keys accepted by [`Feature::from_key`]
    pub const KEYS: &'static [&'static str] = &[
        "running",
        "blur",
        "color",
        "replace",
        "colorCorrection",
        "ccorrection",
        "lowLight",
        "lowlight",
        "mirroring",
        "freeze",
        "smartZoom",
        "smartzoom",
        "beautification",
        "sharpness",
        "layout",
    ];
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A new value for one feature
#[derive(Debug, Clone, PartialEq)]
pub enum EffectChange {
    Running(bool),
    /// Background blur strength
    Blur(f64),
    /// Solid background color, packed `0xRRGGBB`
    Color(u32),
    /// Background replacement image reference
    Replace(String),
    ColorCorrection(f64),
    LowLight(f64),
    Mirroring(bool),
    Freeze(bool),
    /// Target face area for auto-zoom
    SmartZoom(f64),
    /// Skin-smoothing boundary level
    Beautification(f64),
    Sharpness(f64),
    Layout(LayoutMode),
}

impl EffectChange {
    pub fn feature(&self) -> Feature {
        match self {
            EffectChange::Running(_) => Feature::Running,
            EffectChange::Blur(_) => Feature::Blur,
            EffectChange::Color(_) => Feature::Color,
            EffectChange::Replace(_) => Feature::Replace,
            EffectChange::ColorCorrection(_) => Feature::ColorCorrection,
            EffectChange::LowLight(_) => Feature::LowLight,
            EffectChange::Mirroring(_) => Feature::Mirroring,
            EffectChange::Freeze(_) => Feature::Freeze,
            EffectChange::SmartZoom(_) => Feature::SmartZoom,
            EffectChange::Beautification(_) => Feature::Beautification,
            EffectChange::Sharpness(_) => Feature::Sharpness,
            EffectChange::Layout(_) => Feature::Layout,
        }
    }

    /// The "off" value for a feature
    pub fn off(feature: Feature) -> Self {
        match feature {
            Feature::Running => EffectChange::Running(false),
            Feature::Blur => EffectChange::Blur(0.0),
            Feature::Color => EffectChange::Color(0),
            Feature::Replace => EffectChange::Replace(String::new()),
            Feature::ColorCorrection => EffectChange::ColorCorrection(0.0),
            Feature::LowLight => EffectChange::LowLight(0.0),
            Feature::Mirroring => EffectChange::Mirroring(false),
            Feature::Freeze => EffectChange::Freeze(false),
            Feature::SmartZoom => EffectChange::SmartZoom(0.0),
            Feature::Beautification => EffectChange::Beautification(0.0),
            Feature::Sharpness => EffectChange::Sharpness(0.0),
            Feature::Layout => EffectChange::Layout(LayoutMode::Center),
        }
    }

    /// Whether the value switches its feature on
    ///
    /// Numbers count as on only when strictly positive, so NaN and negative
    /// values are off. Layout has no off state.
    pub fn is_on(&self) -> bool {
        match self {
            EffectChange::Running(on) | EffectChange::Mirroring(on) | EffectChange::Freeze(on) => {
                *on
            }
            EffectChange::Blur(v)
            | EffectChange::ColorCorrection(v)
            | EffectChange::LowLight(v)
            | EffectChange::SmartZoom(v)
            | EffectChange::Beautification(v)
            | EffectChange::Sharpness(v) => *v > 0.0,
            EffectChange::Color(color) => *color != 0,
            EffectChange::Replace(image) => !image.is_empty(),
            EffectChange::Layout(_) => true,
        }
    }
}

/// Full effect configuration with every feature populated
///
/// `Default` is the canonical all-off state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectStateSet {
    pub running: bool,
    pub blur: f64,
    pub color: u32,
    pub replace: String,
    #[serde(alias = "ccorrection")]
    pub color_correction: f64,
    #[serde(alias = "lowlight")]
    pub low_light: f64,
    pub mirroring: bool,
    pub freeze: bool,
    #[serde(alias = "smartzoom")]
    pub smart_zoom: f64,
    pub beautification: f64,
    pub sharpness: f64,
    pub layout: LayoutMode,
}

impl EffectStateSet {
    /// Overwrite one field with a change's value
    pub fn merge(&mut self, change: &EffectChange) {
        match change {
            EffectChange::Running(v) => self.running = *v,
            EffectChange::Blur(v) => self.blur = *v,
            EffectChange::Color(v) => self.color = *v,
            EffectChange::Replace(v) => self.replace = v.clone(),
            EffectChange::ColorCorrection(v) => self.color_correction = *v,
            EffectChange::LowLight(v) => self.low_light = *v,
            EffectChange::Mirroring(v) => self.mirroring = *v,
            EffectChange::Freeze(v) => self.freeze = *v,
            EffectChange::SmartZoom(v) => self.smart_zoom = *v,
            EffectChange::Beautification(v) => self.beautification = *v,
            EffectChange::Sharpness(v) => self.sharpness = *v,
            EffectChange::Layout(v) => self.layout = *v,
        }
    }

    /// Current value of one feature
    pub fn get(&self, feature: Feature) -> EffectChange {
        match feature {
            Feature::Running => EffectChange::Running(self.running),
            Feature::Blur => EffectChange::Blur(self.blur),
            Feature::Color => EffectChange::Color(self.color),
            Feature::Replace => EffectChange::Replace(self.replace.clone()),
            Feature::ColorCorrection => EffectChange::ColorCorrection(self.color_correction),
            Feature::LowLight => EffectChange::LowLight(self.low_light),
            Feature::Mirroring => EffectChange::Mirroring(self.mirroring),
            Feature::Freeze => EffectChange::Freeze(self.freeze),
            Feature::SmartZoom => EffectChange::SmartZoom(self.smart_zoom),
            Feature::Beautification => EffectChange::Beautification(self.beautification),
            Feature::Sharpness => EffectChange::Sharpness(self.sharpness),
            Feature::Layout => EffectChange::Layout(self.layout),
        }
    }

    /// Every field as a change, in canonical order
    pub fn changes(&self) -> impl Iterator<Item = EffectChange> + '_ {
        Feature::ALL.into_iter().map(move |feature| self.get(feature))
    }

    /// Features whose value differs from the default
    pub fn non_default_features(&self) -> Vec<Feature> {
        let defaults = EffectStateSet::default();
        Feature::ALL
            .iter()
            .copied()
            .filter(|feature| self.get(*feature) != defaults.get(*feature))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(EffectChange::Running(true), true ; "running on")]
    #[test_case(EffectChange::Running(false), false ; "running off")]
    #[test_case(EffectChange::Blur(0.5), true ; "blur positive")]
    #[test_case(EffectChange::Blur(0.0), false ; "blur zero")]
    #[test_case(EffectChange::Blur(-1.0), false ; "blur negative")]
    #[test_case(EffectChange::Blur(f64::NAN), false ; "blur nan")]
    #[test_case(EffectChange::Color(0x112233), true ; "color set")]
    #[test_case(EffectChange::Color(0), false ; "color zero")]
    #[test_case(EffectChange::Replace("a.png".into()), true ; "replace set")]
    #[test_case(EffectChange::Replace(String::new()), false ; "replace empty")]
    #[test_case(EffectChange::Layout(LayoutMode::Center), true ; "layout always on")]
    fn test_is_on(change: EffectChange, expected: bool) {
        assert_eq!(change.is_on(), expected);
    }

    #[test]
    fn test_off_values_are_off() {
        for feature in Feature::ALL {
            let off = EffectChange::off(feature);
            assert_eq!(off.feature(), feature);
            if feature != Feature::Layout {
                assert!(!off.is_on(), "{} off value reads as on", feature);
            }
        }
    }

    #[test]
    fn test_defaults_match_off_values() {
        let defaults = EffectStateSet::default();
        for feature in Feature::ALL {
            assert_eq!(defaults.get(feature), EffectChange::off(feature));
        }
        assert!(defaults.non_default_features().is_empty());
    }

    #[test]
    fn test_merge_single_field() {
        let mut state = EffectStateSet::default();
        state.merge(&EffectChange::SmartZoom(0.3));
        state.merge(&EffectChange::Layout(LayoutMode::RightBottom));

        assert_eq!(state.smart_zoom, 0.3);
        assert_eq!(state.layout, LayoutMode::RightBottom);
        assert_eq!(
            state.non_default_features(),
            vec![Feature::SmartZoom, Feature::Layout]
        );
    }

    #[test]
    fn test_feature_keys_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_key(feature.as_str()), Some(feature));
            assert!(Feature::KEYS.contains(&feature.as_str()));
        }
        assert_eq!(Feature::from_key("ccorrection"), Some(Feature::ColorCorrection));
        assert_eq!(Feature::from_key("bokeh"), None);
    }

    #[test]
    fn test_state_set_json_keys() {
        let json = serde_json::to_value(EffectStateSet::default()).unwrap();
        assert_eq!(json["colorCorrection"], 0.0);
        assert_eq!(json["layout"], "center");

        let state: EffectStateSet =
            serde_json::from_str(r#"{"lowlight": 0.7, "layout": "left-bottom"}"#).unwrap();
        assert_eq!(state.low_light, 0.7);
        assert_eq!(state.layout, LayoutMode::LeftBottom);
        assert!(!state.running);
    }
}
