//! Partial state updates
//!
//! A delta names only the features to change. Order is preserved: calls are
//! issued in the order features were added (for JSON, the document key
//! order), which decides which of `color`/`replace` selects the background
//! when both are sent together.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::effect_state::{EffectChange, EffectStateSet, Feature, LayoutMode};
use crate::error::Result;

/// Ordered set of feature changes, at most one per feature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectDelta {
    changes: Vec<EffectChange>,
}

impl EffectDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite a change
    ///
    /// Overwriting keeps the feature's original position.
    pub fn set(&mut self, change: EffectChange) {
        let feature = change.feature();
        match self.changes.iter_mut().find(|c| c.feature() == feature) {
            Some(existing) => *existing = change,
            None => self.changes.push(change),
        }
    }

    /// Builder form of [`EffectDelta::set`]
    pub fn with(mut self, change: EffectChange) -> Self {
        self.set(change);
        self
    }

    pub fn running(self, on: bool) -> Self {
        self.with(EffectChange::Running(on))
    }

    pub fn blur(self, strength: f64) -> Self {
        self.with(EffectChange::Blur(strength))
    }

    pub fn color(self, rgb: u32) -> Self {
        self.with(EffectChange::Color(rgb))
    }

    pub fn replace(self, image: impl Into<String>) -> Self {
        self.with(EffectChange::Replace(image.into()))
    }

    pub fn color_correction(self, power: f64) -> Self {
        self.with(EffectChange::ColorCorrection(power))
    }

    pub fn low_light(self, power: f64) -> Self {
        self.with(EffectChange::LowLight(power))
    }

    pub fn mirroring(self, on: bool) -> Self {
        self.with(EffectChange::Mirroring(on))
    }

    pub fn freeze(self, on: bool) -> Self {
        self.with(EffectChange::Freeze(on))
    }

    pub fn smart_zoom(self, face_area: f64) -> Self {
        self.with(EffectChange::SmartZoom(face_area))
    }

    pub fn beautification(self, level: f64) -> Self {
        self.with(EffectChange::Beautification(level))
    }

    pub fn sharpness(self, power: f64) -> Self {
        self.with(EffectChange::Sharpness(power))
    }

    pub fn layout(self, layout: LayoutMode) -> Self {
        self.with(EffectChange::Layout(layout))
    }

    pub fn get(&self, feature: Feature) -> Option<&EffectChange> {
        self.changes.iter().find(|c| c.feature() == feature)
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.get(feature).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectChange> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Parse a JSON object such as `{"blur": 5, "layout": "left-bottom"}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&EffectStateSet> for EffectDelta {
    fn from(state: &EffectStateSet) -> Self {
        Self {
            changes: state.changes().collect(),
        }
    }
}

impl From<EffectChange> for EffectDelta {
    fn from(change: EffectChange) -> Self {
        Self {
            changes: vec![change],
        }
    }
}

impl FromIterator<EffectChange> for EffectDelta {
    fn from_iter<I: IntoIterator<Item = EffectChange>>(iter: I) -> Self {
        let mut delta = EffectDelta::new();
        for change in iter {
            delta.set(change);
        }
        delta
    }
}

impl<'a> IntoIterator for &'a EffectDelta {
    type Item = &'a EffectChange;
    type IntoIter = std::slice::Iter<'a, EffectChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl Serialize for EffectDelta {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.changes.len()))?;
        for change in &self.changes {
            let key = change.feature().as_str();
            match change {
                EffectChange::Running(v) | EffectChange::Mirroring(v) | EffectChange::Freeze(v) => {
                    map.serialize_entry(key, v)?
                }
                EffectChange::Blur(v)
                | EffectChange::ColorCorrection(v)
                | EffectChange::LowLight(v)
                | EffectChange::SmartZoom(v)
                | EffectChange::Beautification(v)
                | EffectChange::Sharpness(v) => map.serialize_entry(key, v)?,
                EffectChange::Color(v) => map.serialize_entry(key, v)?,
                EffectChange::Replace(v) => map.serialize_entry(key, v)?,
                EffectChange::Layout(v) => map.serialize_entry(key, v)?,
            }
        }
        map.end()
    }
}

struct DeltaVisitor;

impl<'de> Visitor<'de> for DeltaVisitor {
    type Value = EffectDelta;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of effect features to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<EffectDelta, A::Error> {
        let mut delta = EffectDelta::new();
        while let Some(key) = map.next_key::<String>()? {
            let feature = Feature::from_key(&key)
                .ok_or_else(|| <A::Error as de::Error>::unknown_field(&key, Feature::KEYS))?;
            // null means "off" for every feature
            let change = match feature {
                Feature::Running => EffectChange::Running(next_or_off(&mut map)?),
                Feature::Blur => EffectChange::Blur(next_or_off(&mut map)?),
                Feature::Color => EffectChange::Color(next_or_off(&mut map)?),
                Feature::Replace => EffectChange::Replace(next_or_off(&mut map)?),
                Feature::ColorCorrection => EffectChange::ColorCorrection(next_or_off(&mut map)?),
                Feature::LowLight => EffectChange::LowLight(next_or_off(&mut map)?),
                Feature::Mirroring => EffectChange::Mirroring(next_or_off(&mut map)?),
                Feature::Freeze => EffectChange::Freeze(next_or_off(&mut map)?),
                Feature::SmartZoom => EffectChange::SmartZoom(next_or_off(&mut map)?),
                Feature::Beautification => EffectChange::Beautification(next_or_off(&mut map)?),
                Feature::Sharpness => EffectChange::Sharpness(next_or_off(&mut map)?),
                Feature::Layout => EffectChange::Layout(next_or_off(&mut map)?),
            };
            delta.set(change);
        }
        Ok(delta)
    }
}

fn next_or_off<'de, A, T>(map: &mut A) -> std::result::Result<T, A::Error>
where
    A: MapAccess<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(map.next_value::<Option<T>>()?.unwrap_or_default())
}

impl<'de> Deserialize<'de> for EffectDelta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DeltaVisitor)
    }
}
