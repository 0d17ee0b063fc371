//! Property tests for the parameter mapping layer: clamping, banding and the
//! deterministic derivation of sampling knobs.

use proptest::prelude::*;

use poetica::engine::params::{
    creativity_directive, language_directive, style_config, GenerationRequest, EmotionalTone,
    PoemLength, PoemStyle, StyleParameters,
};

fn any_style() -> impl Strategy<Value = PoemStyle> {
    prop_oneof![
        Just(PoemStyle::Sonnet),
        Just(PoemStyle::Haiku),
        Just(PoemStyle::FreeVerse),
        Just(PoemStyle::Villanelle),
    ]
}

fn any_tone() -> impl Strategy<Value = EmotionalTone> {
    prop_oneof![
        Just(EmotionalTone::Contemplative),
        Just(EmotionalTone::Joyful),
        Just(EmotionalTone::Melancholic),
        Just(EmotionalTone::Romantic),
    ]
}

fn any_length() -> impl Strategy<Value = PoemLength> {
    prop_oneof![
        Just(PoemLength::Short),
        Just(PoemLength::Medium),
        Just(PoemLength::Long),
    ]
}

fn any_params() -> impl Strategy<Value = StyleParameters> {
    (
        any_style(),
        any_tone(),
        -500.0f32..500.0,
        -5.0f32..5.0,
        any_length(),
        -5.0f32..5.0,
    )
        .prop_map(
            |(style, emotional_tone, creative_style, language_variety, length, word_repetition)| {
                StyleParameters {
                    style,
                    emotional_tone,
                    creative_style,
                    language_variety,
                    length,
                    word_repetition,
                }
            },
        )
}

proptest! {
    #[test]
    fn normalized_always_in_domain(params in any_params()) {
        let n = params.normalized();
        prop_assert!((0.0..=100.0).contains(&n.creative_style));
        prop_assert!((0.0..=1.0).contains(&n.language_variety));
        prop_assert!((1.0..=2.0).contains(&n.word_repetition));
    }

    #[test]
    fn normalized_is_idempotent(params in any_params()) {
        let once = params.normalized();
        let twice = once.normalized();
        prop_assert_eq!(once.creative_style, twice.creative_style);
        prop_assert_eq!(once.language_variety, twice.language_variety);
        prop_assert_eq!(once.word_repetition, twice.word_repetition);
    }

    #[test]
    fn normalized_never_touches_enums(params in any_params()) {
        let n = params.normalized();
        prop_assert_eq!(n.style, params.style);
        prop_assert_eq!(n.emotional_tone, params.emotional_tone);
        prop_assert_eq!(n.length, params.length);
    }

    #[test]
    fn creativity_directive_total_and_deterministic(value in -500.0f32..500.0) {
        let a = creativity_directive(value);
        let b = creativity_directive(value);
        prop_assert!(!a.is_empty());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn creativity_directive_matches_clamped_value(value in -500.0f32..500.0) {
        prop_assert_eq!(
            creativity_directive(value),
            creativity_directive(value.clamp(0.0, 100.0))
        );
    }

    #[test]
    fn language_directive_matches_clamped_value(value in -5.0f32..5.0) {
        prop_assert_eq!(
            language_directive(value),
            language_directive(value.clamp(0.0, 1.0))
        );
    }

    #[test]
    fn generation_request_knobs_always_in_range(params in any_params(), theme in ".{0,80}") {
        let req = GenerationRequest::from_params(&params, &theme);

        let config = style_config(params.style);
        prop_assert_eq!(req.temperature, config.temperature);
        prop_assert_eq!(req.top_p, config.top_p);
        prop_assert_eq!(req.top_k, 30);
        prop_assert_eq!(req.max_length, params.length.budget());
        prop_assert!((1.0..=2.0).contains(&req.repetition_penalty));
        prop_assert!(req.prompt.contains(params.style.as_str()));
    }

    #[test]
    fn generation_request_is_deterministic(params in any_params(), theme in ".{0,80}") {
        let a = GenerationRequest::from_params(&params, &theme);
        let b = GenerationRequest::from_params(&params, &theme);
        prop_assert_eq!(a.prompt, b.prompt);
        prop_assert_eq!(a.temperature, b.temperature);
        prop_assert_eq!(a.top_p, b.top_p);
        prop_assert_eq!(a.repetition_penalty, b.repetition_penalty);
    }
}
