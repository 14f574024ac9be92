use super::*;
use std::collections::HashSet;

#[test]
fn catalog_ids_are_unique() {
    let ids: HashSet<_> = presets().iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), presets().len());
}

#[test]
fn find_preset_is_case_insensitive() {
    assert_eq!(find_preset("ILFORD-HP5").unwrap().brand, "Ilford");
    assert!(find_preset("nope").is_none());
}

#[test]
fn default_is_first_entry() {
    assert_eq!(default_preset().id, presets()[0].id);
}

#[test]
fn numeric_fields_stay_in_slider_ranges() {
    for p in presets() {
        let e = &p.effects;
        for v in [e.saturation, e.contrast] {
            assert!((0.0..=2.0).contains(&v), "{}: {v}", p.id);
        }
        for v in [
            e.grain,
            e.halation,
            e.vignette,
            e.dispersion,
            e.keer,
            e.glow,
        ] {
            assert!((0.0..=1.0).contains(&v), "{}: {v}", p.id);
        }
    }
}
