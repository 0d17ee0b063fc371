use serde::{Deserialize, Serialize};

// =============================================================================
// Closed enumerations
// =============================================================================

/// Poetic form requested by the user. Closed set: anything else fails at
/// deserialization, before a request reaches the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoemStyle {
    Sonnet,
    Haiku,
    FreeVerse,
    Villanelle,
}

impl PoemStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoemStyle::Sonnet => "sonnet",
            PoemStyle::Haiku => "haiku",
            PoemStyle::FreeVerse => "free-verse",
            PoemStyle::Villanelle => "villanelle",
        }
    }
}

/// Requested affective coloring of the poem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalTone {
    Contemplative,
    Joyful,
    Melancholic,
    Romantic,
}

impl EmotionalTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalTone::Contemplative => "contemplative",
            EmotionalTone::Joyful => "joyful",
            EmotionalTone::Melancholic => "melancholic",
            EmotionalTone::Romantic => "romantic",
        }
    }
}

/// Length category, mapped to a token/word budget for the draft backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoemLength {
    Short,
    Medium,
    Long,
}

impl PoemLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoemLength::Short => "short",
            PoemLength::Medium => "medium",
            PoemLength::Long => "long",
        }
    }

    /// Word/token budget for the draft backend: short=100, medium=200, long=300.
    pub fn budget(&self) -> u32 {
        match self {
            PoemLength::Short => 100,
            PoemLength::Medium => 200,
            PoemLength::Long => 300,
        }
    }
}

// =============================================================================
// StyleParameters
// =============================================================================

/// User-facing stylistic parameters, exactly as the client submits them.
/// Wire names are camelCase. Numeric sliders are clamped to their declared
/// range by `normalized()` before any mapping happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleParameters {
    pub style: PoemStyle,
    pub emotional_tone: EmotionalTone,
    /// Creativity slider, 0..=100.
    pub creative_style: f32,
    /// Vocabulary richness slider, 0..=1.
    pub language_variety: f32,
    pub length: PoemLength,
    /// Repetition penalty factor, 1..=2.
    pub word_repetition: f32,
}

impl StyleParameters {
    /// Copy with all sliders clamped into their declared domains.
    pub fn normalized(&self) -> Self {
        Self {
            creative_style: self.creative_style.clamp(0.0, 100.0),
            language_variety: self.language_variety.clamp(0.0, 1.0),
            word_repetition: self.word_repetition.clamp(1.0, 2.0),
            ..self.clone()
        }
    }
}

// =============================================================================
// Style / tone lookup tables
// =============================================================================

/// Engine-level knobs and structural guidance for one poetic form.
#[derive(Debug, Clone, Copy)]
pub struct StyleConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub structure: &'static str,
    pub examples: &'static [&'static str],
}

/// Total mapping over the closed style enumeration.
pub fn style_config(style: PoemStyle) -> StyleConfig {
    match style {
        PoemStyle::Sonnet => StyleConfig {
            temperature: 0.7,
            top_p: 0.85,
            structure: "Create a sonnet with 14 lines of iambic pentameter (10 syllables per line), following the rhyme scheme ABAB CDCD EFEF GG. Each quatrain should develop a distinct aspect of the theme, with the final couplet providing a powerful conclusion or twist.",
            examples: &[
                "Shall I compare thee to a summer's day? (Shakespeare)",
                "If ever two were one, then surely we. (Anne Bradstreet)",
            ],
        },
        PoemStyle::Haiku => StyleConfig {
            temperature: 0.6,
            top_p: 0.8,
            structure: "Craft a haiku with three lines following the 5-7-5 syllable pattern. Focus on creating a vivid seasonal reference (kigo) and a moment of insight or emotion (kireji). Use precise imagery that engages the senses.",
            examples: &[
                "An old silent pond / A frog jumps into the pond / Splash! Silence again. (Basho)",
                "The first cold rainfall / Fellow travelers in straw / Rain gear passing by. (Yosa Buson)",
            ],
        },
        PoemStyle::FreeVerse => StyleConfig {
            temperature: 0.9,
            top_p: 0.95,
            structure: "Create a free verse poem that uses natural rhythm and flow, unrestricted by formal patterns. Focus on strong imagery, meaningful line breaks, and intentional structure that serves the poem's emotional impact. Use literary devices like assonance, alliteration, and metaphor to create internal music.",
            examples: &[
                "The Red Wheelbarrow (William Carlos Williams)",
                "Still I Rise (Maya Angelou)",
            ],
        },
        PoemStyle::Villanelle => StyleConfig {
            temperature: 0.8,
            top_p: 0.9,
            structure: "Compose a villanelle with 19 lines across 6 stanzas (5 tercets and 1 quatrain), using two refrains and following the ABA rhyme scheme. The first and third lines of the first tercet alternate as refrains throughout the poem, both appearing in the final quatrain.",
            examples: &[
                "Do not go gentle into that good night (Dylan Thomas)",
                "The art of losing isn't hard to master (Elizabeth Bishop)",
            ],
        },
    }
}

/// Total mapping over the closed tone enumeration.
pub fn tone_directive(tone: EmotionalTone) -> &'static str {
    match tone {
        EmotionalTone::Contemplative => "Create a deeply reflective atmosphere that explores universal truths, philosophical questions, or personal insights. Use imagery that suggests meditation, introspection, and the search for meaning.",
        EmotionalTone::Joyful => "Infuse the poem with vibrant energy, celebration, and optimistic imagery. Use uplifting metaphors, bright sensory details, and rhythmic patterns that suggest movement and lightness.",
        EmotionalTone::Melancholic => "Craft a poem with gentle sadness, longing, and bittersweet remembrance. Use imagery of autumn, twilight, or rain; explore themes of loss, memory, and the passage of time with delicate emotion.",
        EmotionalTone::Romantic => "Express deep romantic love through passionate imagery and sincere emotion. Balance intense feelings with elegant expression, using natural imagery and cosmic metaphors to convey the depth of love.",
    }
}

// =============================================================================
// Slider banding
// =============================================================================

/// Creativity directive, banded into quartiles. Band edges belong to the
/// upper band (strict `<` comparison): 25 maps to the second band.
pub fn creativity_directive(value: f32) -> &'static str {
    let value = value.clamp(0.0, 100.0);
    if value < 25.0 {
        "Draw from classical poetic traditions, using time-tested imagery and established poetic devices. Focus on universal themes and elegant, traditional expressions."
    } else if value < 50.0 {
        "Balance traditional and contemporary elements, using classic forms with modern sensibilities. Blend timeless themes with fresh perspectives."
    } else if value < 75.0 {
        "Emphasize contemporary approaches while maintaining connection to poetic tradition. Experiment with form and language while preserving emotional authenticity."
    } else {
        "Push creative boundaries with innovative imagery and experimental techniques. Challenge conventional forms while maintaining artistic coherence and emotional impact."
    }
}

/// Language-richness directive, banded at 0.3 / 0.6 / 0.8 (edges upper-band).
pub fn language_directive(value: f32) -> &'static str {
    let value = value.clamp(0.0, 1.0);
    if value < 0.3 {
        "Use clear, accessible language that resonates with readers while maintaining poetic beauty. Focus on precise word choice and natural rhythm."
    } else if value < 0.6 {
        "Employ moderately sophisticated vocabulary and varied syntax. Balance accessibility with literary depth through carefully chosen language."
    } else if value < 0.8 {
        "Use rich, varied language that demonstrates poetic craft. Incorporate compelling metaphors and advanced literary devices while maintaining clarity."
    } else {
        "Craft complex, ornate verses with sophisticated vocabulary and intricate literary devices. Layer meaning through careful word choice and subtle allusions."
    }
}

// =============================================================================
// GenerationRequest
// =============================================================================

/// Engine-level request for the draft backend. Immutable once constructed;
/// all knobs are derived deterministically from `StyleParameters`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_length: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl GenerationRequest {
    /// Map user parameters (plus the free-text theme) onto sampling knobs and
    /// a draft prompt. Sliders are clamped before mapping.
    pub fn from_params(params: &StyleParameters, theme: &str) -> Self {
        let params = params.normalized();
        let config = style_config(params.style);
        let dedication = crate::engine::prompt::dedication_name(theme)
            .map(|name| format!("about {name} "))
            .unwrap_or_default();

        Self {
            prompt: format!(
                "Create a {} poem {}with the theme: {}",
                params.style.as_str(),
                dedication,
                theme
            ),
            max_length: params.length.budget(),
            temperature: config.temperature,
            top_k: 30,
            top_p: config.top_p,
            repetition_penalty: params.word_repetition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StyleParameters {
        StyleParameters {
            style: PoemStyle::Haiku,
            emotional_tone: EmotionalTone::Joyful,
            creative_style: 60.0,
            language_variety: 0.5,
            length: PoemLength::Short,
            word_repetition: 1.5,
        }
    }

    #[test]
    fn test_length_budget_total() {
        assert_eq!(PoemLength::Short.budget(), 100);
        assert_eq!(PoemLength::Medium.budget(), 200);
        assert_eq!(PoemLength::Long.budget(), 300);
    }

    #[test]
    fn test_style_config_total_and_non_empty() {
        for style in [
            PoemStyle::Sonnet,
            PoemStyle::Haiku,
            PoemStyle::FreeVerse,
            PoemStyle::Villanelle,
        ] {
            let config = style_config(style);
            assert!(!config.structure.is_empty());
            assert!(!config.examples.is_empty());
            assert!(config.temperature > 0.0 && config.temperature <= 1.0);
            assert!(config.top_p > 0.0 && config.top_p <= 1.0);
        }
    }

    #[test]
    fn test_tone_directive_total_and_non_empty() {
        for tone in [
            EmotionalTone::Contemplative,
            EmotionalTone::Joyful,
            EmotionalTone::Melancholic,
            EmotionalTone::Romantic,
        ] {
            assert!(!tone_directive(tone).is_empty());
        }
    }

    #[test]
    fn test_creativity_band_edges() {
        // Edges belong to the upper band (strict < comparison).
        assert_eq!(creativity_directive(24.9), creativity_directive(0.0));
        assert_ne!(creativity_directive(25.0), creativity_directive(24.9));
        assert_eq!(creativity_directive(25.0), creativity_directive(49.9));
        assert_ne!(creativity_directive(50.0), creativity_directive(49.9));
        assert_eq!(creativity_directive(50.0), creativity_directive(74.9));
        assert_ne!(creativity_directive(75.0), creativity_directive(74.9));
        assert_eq!(creativity_directive(75.0), creativity_directive(100.0));
    }

    #[test]
    fn test_language_band_edges() {
        assert_ne!(language_directive(0.3), language_directive(0.29));
        assert_ne!(language_directive(0.6), language_directive(0.59));
        assert_ne!(language_directive(0.8), language_directive(0.79));
        assert_eq!(language_directive(0.8), language_directive(1.0));
    }

    #[test]
    fn test_banding_clamps_out_of_range() {
        assert_eq!(creativity_directive(-10.0), creativity_directive(0.0));
        assert_eq!(creativity_directive(500.0), creativity_directive(100.0));
        assert_eq!(language_directive(-1.0), language_directive(0.0));
        assert_eq!(language_directive(2.0), language_directive(1.0));
    }

    #[test]
    fn test_normalized_clamps_sliders() {
        let mut p = params();
        p.creative_style = 150.0;
        p.language_variety = -0.5;
        p.word_repetition = 3.0;
        let n = p.normalized();
        assert_eq!(n.creative_style, 100.0);
        assert_eq!(n.language_variety, 0.0);
        assert_eq!(n.word_repetition, 2.0);
    }

    #[test]
    fn test_generation_request_mapping() {
        let req = GenerationRequest::from_params(&params(), "spring morning");
        assert_eq!(req.max_length, 100);
        assert_eq!(req.top_k, 30);
        assert_eq!(req.temperature, 0.6);
        assert_eq!(req.top_p, 0.8);
        assert_eq!(req.repetition_penalty, 1.5);
        assert!(req.prompt.contains("haiku"));
        assert!(req.prompt.contains("spring morning"));
    }

    #[test]
    fn test_generation_request_dedication() {
        let req = GenerationRequest::from_params(&params(), "a poem about Elena");
        assert!(req.prompt.contains("about Elena"));
    }

    #[test]
    fn test_enum_wire_names() {
        let json = r#"{
            "style": "free-verse",
            "emotionalTone": "melancholic",
            "creativeStyle": 40,
            "languageVariety": 0.7,
            "length": "long",
            "wordRepetition": 1.1
        }"#;
        let p: StyleParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.style, PoemStyle::FreeVerse);
        assert_eq!(p.emotional_tone, EmotionalTone::Melancholic);
        assert_eq!(p.length, PoemLength::Long);
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let json = r#"{
            "style": "limerick",
            "emotionalTone": "joyful",
            "creativeStyle": 40,
            "languageVariety": 0.7,
            "length": "long",
            "wordRepetition": 1.1
        }"#;
        assert!(serde_json::from_str::<StyleParameters>(json).is_err());
    }
}
