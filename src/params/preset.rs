use crate::params::effects::EffectParameters;

/// Named, immutable bundle of effect parameters emulating a camera or film look.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FilterPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub brand: &'static str,
    pub year: &'static str,
    pub effects: EffectParameters,
}

const IDENTITY: EffectParameters = EffectParameters {
    grain: 0.0,
    saturation: 1.0,
    contrast: 1.0,
    halation: 0.0,
    vignette: 0.0,
    dispersion: 0.0,
    keer: 0.0,
    glow: 0.0,
    light_leak: false,
};

static PRESETS: [FilterPreset; 10] = [
    FilterPreset {
        id: "kodak-portra-400",
        name: "Portra 400",
        brand: "Kodak",
        year: "1998",
        effects: EffectParameters {
            grain: 0.2,
            saturation: 0.9,
            contrast: 1.05,
            halation: 0.2,
            vignette: 0.2,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "kodak-gold-200",
        name: "Gold 200",
        brand: "Kodak",
        year: "1988",
        effects: EffectParameters {
            grain: 0.3,
            saturation: 1.2,
            contrast: 1.1,
            halation: 0.3,
            vignette: 0.3,
            light_leak: true,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "fuji-superia-400",
        name: "Superia 400",
        brand: "Fujifilm",
        year: "1998",
        effects: EffectParameters {
            grain: 0.35,
            saturation: 1.1,
            contrast: 1.15,
            halation: 0.15,
            vignette: 0.25,
            dispersion: 0.1,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "fuji-velvia-50",
        name: "Velvia 50",
        brand: "Fujifilm",
        year: "1990",
        effects: EffectParameters {
            grain: 0.1,
            saturation: 1.5,
            contrast: 1.3,
            vignette: 0.2,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "ilford-hp5",
        name: "HP5 Plus",
        brand: "Ilford",
        year: "1989",
        effects: EffectParameters {
            grain: 0.5,
            saturation: 0.0,
            contrast: 1.3,
            vignette: 0.35,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "agfa-vista-200",
        name: "Vista 200",
        brand: "Agfa",
        year: "2003",
        effects: EffectParameters {
            grain: 0.3,
            saturation: 1.25,
            contrast: 1.05,
            halation: 0.25,
            vignette: 0.2,
            keer: 0.2,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "polaroid-600",
        name: "600 Film",
        brand: "Polaroid",
        year: "1981",
        effects: EffectParameters {
            grain: 0.25,
            saturation: 0.8,
            contrast: 0.85,
            halation: 0.4,
            vignette: 0.45,
            keer: 0.3,
            glow: 0.3,
            light_leak: true,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "fx-newsprint",
        name: "Newsprint",
        brand: "Special FX",
        year: "1920",
        effects: EffectParameters {
            grain: 0.8,
            saturation: 0.0,
            contrast: 1.6,
            vignette: 0.3,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "fx-crt-screen",
        name: "CRT Screen",
        brand: "Special FX",
        year: "1985",
        effects: EffectParameters {
            grain: 0.4,
            saturation: 1.3,
            contrast: 1.2,
            halation: 0.35,
            vignette: 0.5,
            dispersion: 0.6,
            ..IDENTITY
        },
    },
    FilterPreset {
        id: "fx-dreamy-soft",
        name: "Dreamy Soft",
        brand: "Special FX",
        year: "2000",
        effects: EffectParameters {
            grain: 0.1,
            saturation: 0.9,
            contrast: 0.8,
            halation: 0.7,
            vignette: 0.15,
            keer: 0.6,
            glow: 0.6,
            light_leak: true,
            ..IDENTITY
        },
    },
];

/// The static, ordered preset catalog. The first entry is the default selection.
pub fn presets() -> &'static [FilterPreset] {
    &PRESETS
}

/// Look a preset up by id (case-insensitive).
pub fn find_preset(id: &str) -> Option<&'static FilterPreset> {
    let id = id.trim();
    PRESETS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// The preset selected before the user picks one.
pub fn default_preset() -> &'static FilterPreset {
    &PRESETS[0]
}

#[cfg(test)]
#[path = "../../tests/unit/params/preset.rs"]
mod tests;
