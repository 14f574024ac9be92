use super::*;

#[test]
fn defaults_are_identity() {
    let p = EffectParameters::default();
    assert_eq!(p.saturation, 1.0);
    assert_eq!(p.contrast, 1.0);
    assert_eq!(p.grain, 0.0);
    assert!(!p.light_leak);
}

#[test]
fn apply_edit_replaces_exactly_one_field() {
    let base = EffectParameters::default();
    let next = apply_edit(&base, EffectKey::Contrast, EffectValue::Number(1.7)).unwrap();
    assert_eq!(next.contrast, 1.7);
    assert_eq!(
        EffectParameters {
            contrast: base.contrast,
            ..next
        },
        base
    );
    // Input untouched.
    assert_eq!(base.contrast, 1.0);
}

#[test]
fn apply_edit_does_not_clamp() {
    let base = EffectParameters::default();
    let next = apply_edit(&base, EffectKey::Grain, EffectValue::Number(5.0)).unwrap();
    assert_eq!(next.grain, 5.0);
}

#[test]
fn apply_edit_toggle() {
    let base = EffectParameters::default();
    let next = apply_edit(&base, EffectKey::LightLeak, EffectValue::Toggle(true)).unwrap();
    assert!(next.light_leak);
}

#[test]
fn apply_edit_rejects_kind_mismatch() {
    let base = EffectParameters::default();
    assert!(apply_edit(&base, EffectKey::LightLeak, EffectValue::Number(1.0)).is_err());
    assert!(apply_edit(&base, EffectKey::Keer, EffectValue::Toggle(true)).is_err());
}

#[test]
fn keys_parse_from_field_names() {
    for key in EffectKey::ALL {
        assert_eq!(key.as_str().parse::<EffectKey>().unwrap(), key);
    }
    assert_eq!(
        "light_leak".parse::<EffectKey>().unwrap(),
        EffectKey::LightLeak
    );
    assert!("sharpness".parse::<EffectKey>().is_err());
}

#[test]
fn value_parsing_follows_key_kind() {
    assert_eq!(
        EffectValue::parse_for(EffectKey::LightLeak, "on").unwrap(),
        EffectValue::Toggle(true)
    );
    assert_eq!(
        EffectValue::parse_for(EffectKey::Vignette, "0.25").unwrap(),
        EffectValue::Number(0.25)
    );
    assert!(EffectValue::parse_for(EffectKey::Vignette, "lots").is_err());
}

#[test]
fn json_uses_original_field_names() {
    let p: EffectParameters =
        serde_json::from_str(r#"{ "contrast": 1.2, "lightLeak": true }"#).unwrap();
    assert_eq!(p.contrast, 1.2);
    assert!(p.light_leak);
    assert_eq!(p.saturation, 1.0);

    let v = serde_json::to_value(p).unwrap();
    assert_eq!(v["lightLeak"], serde_json::json!(true));
}
