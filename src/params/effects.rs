use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{RetroError, RetroResult};

/// Named effect magnitudes flowing into one pipeline run.
///
/// Saturation and contrast are centred at `1.0` (identity, useful range `[0, 2]`); every other
/// numeric field is `[0, 1]` with `0.0` meaning "no effect". [`Default`] is the identity set.
/// Values are never clamped here; each pipeline stage decides what an out-of-range value means.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectParameters {
    /// Film grain noise strength.
    pub grain: f32,
    /// Colour saturation multiplier.
    pub saturation: f32,
    /// Contrast multiplier, pivoting at 128.
    pub contrast: f32,
    /// Blurred screen-blend glow strength.
    pub halation: f32,
    /// Edge darkening strength.
    pub vignette: f32,
    /// Red/blue offset copy strength.
    pub dispersion: f32,
    /// Shadow blue tint strength, also the sparkle intensity.
    pub keer: f32,
    /// Glow slider value; carried through but not consumed by any stage.
    pub glow: f32,
    /// Warm diagonal light leak toggle.
    pub light_leak: bool,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            grain: 0.0,
            saturation: 1.0,
            contrast: 1.0,
            halation: 0.0,
            vignette: 0.0,
            dispersion: 0.0,
            keer: 0.0,
            glow: 0.0,
            light_leak: false,
        }
    }
}

/// One editable field of [`EffectParameters`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKey {
    Grain,
    Saturation,
    Contrast,
    Halation,
    Vignette,
    Dispersion,
    Keer,
    Glow,
    LightLeak,
}

impl EffectKey {
    /// Every key, in declaration order.
    pub const ALL: [EffectKey; 9] = [
        Self::Grain,
        Self::Saturation,
        Self::Contrast,
        Self::Halation,
        Self::Vignette,
        Self::Dispersion,
        Self::Keer,
        Self::Glow,
        Self::LightLeak,
    ];

    /// Field name as it appears in preset JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grain => "grain",
            Self::Saturation => "saturation",
            Self::Contrast => "contrast",
            Self::Halation => "halation",
            Self::Vignette => "vignette",
            Self::Dispersion => "dispersion",
            Self::Keer => "keer",
            Self::Glow => "glow",
            Self::LightLeak => "lightLeak",
        }
    }

    /// `true` for the boolean toggle(s).
    pub fn is_toggle(self) -> bool {
        matches!(self, Self::LightLeak)
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKey {
    type Err = RetroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| {
                k.as_str().eq_ignore_ascii_case(needle)
                    || (*k == Self::LightLeak
                        && matches!(needle, "light_leak" | "light-leak"))
            })
            .ok_or_else(|| RetroError::validation(format!("unknown effect key '{needle}'")))
    }
}

/// Value written by [`apply_edit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectValue {
    Number(f32),
    Toggle(bool),
}

impl EffectValue {
    /// Parse a CLI-style value: `true`/`false`/`on`/`off` or a number.
    pub fn parse_for(key: EffectKey, raw: &str) -> RetroResult<Self> {
        let raw = raw.trim();
        if key.is_toggle() {
            return match raw.to_ascii_lowercase().as_str() {
                "true" | "on" | "1" | "yes" => Ok(Self::Toggle(true)),
                "false" | "off" | "0" | "no" => Ok(Self::Toggle(false)),
                _ => Err(RetroError::validation(format!(
                    "effect '{key}' expects a boolean, got '{raw}'"
                ))),
            };
        }
        raw.parse::<f32>().map(Self::Number).map_err(|_| {
            RetroError::validation(format!("effect '{key}' expects a number, got '{raw}'"))
        })
    }
}

/// Return a copy of `current` with exactly one field replaced.
///
/// Fails only when the value kind does not match the key (a toggle for a slider or vice versa).
pub fn apply_edit(
    current: &EffectParameters,
    key: EffectKey,
    value: EffectValue,
) -> RetroResult<EffectParameters> {
    let mut next = *current;
    match value {
        EffectValue::Toggle(v) if key.is_toggle() => next.light_leak = v,
        EffectValue::Toggle(_) => {
            return Err(RetroError::validation(format!(
                "effect '{key}' expects a numeric value"
            )));
        }
        EffectValue::Number(v) => match numeric_field_mut(&mut next, key) {
            Some(field) => *field = v,
            None => {
                return Err(RetroError::validation(format!(
                    "effect '{key}' expects a boolean value"
                )));
            }
        },
    }
    Ok(next)
}

fn numeric_field_mut(p: &mut EffectParameters, key: EffectKey) -> Option<&mut f32> {
    let field = match key {
        EffectKey::Grain => &mut p.grain,
        EffectKey::Saturation => &mut p.saturation,
        EffectKey::Contrast => &mut p.contrast,
        EffectKey::Halation => &mut p.halation,
        EffectKey::Vignette => &mut p.vignette,
        EffectKey::Dispersion => &mut p.dispersion,
        EffectKey::Keer => &mut p.keer,
        EffectKey::Glow => &mut p.glow,
        EffectKey::LightLeak => return None,
    };
    Some(field)
}

#[cfg(test)]
#[path = "../../tests/unit/params/effects.rs"]
mod tests;
