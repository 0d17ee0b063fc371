//! Prompt assembly for the three generative calls: fast single-shot
//! generation, draft refinement, and candidate validation.

use std::sync::OnceLock;

use regex::Regex;

use super::params::{
    creativity_directive, language_directive, style_config, tone_directive, StyleParameters,
};

/// Best-effort scan of the user theme for a dedication target
/// ("about NAME"). Returns None when no match is found; never errors.
pub fn dedication_name(theme: &str) -> Option<&str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)about\s+(?:my love lady,?\s+)?(\w+)").expect("dedication regex is valid")
    });
    re.captures(theme).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Strip markdown code-fence wrappers (```json ... ``` or plain ```)
/// from a model reply so the JSON inside can be parsed.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Single-shot prompt for the fast path. Instructs the model to return poem
/// text only, no commentary.
pub fn fast_prompt(params: &StyleParameters, theme: Option<&str>) -> String {
    let params = params.normalized();
    let base = match theme {
        Some(theme) if !theme.trim().is_empty() => format!(
            "Create a masterful {} poem that captures the essence of this prompt: {}. It may be anything and decode the context according to this emotional tone: {}",
            params.length.as_str(),
            theme,
            params.emotional_tone.as_str()
        ),
        _ => format!(
            "Create a masterful {} poem that captures {} emotions and reflections",
            params.length.as_str(),
            params.emotional_tone.as_str()
        ),
    };

    let mut prompt = base;
    prompt.push_str("\n\nTechnical Parameters:\n");
    prompt.push_str(&format!("- Form: {}\n", params.style.as_str()));
    prompt.push_str(&format!(
        "- Emotional resonance: {}\n",
        params.emotional_tone.as_str()
    ));
    prompt.push_str(&format!(
        "- Creativity level (0-100): {}\n",
        params.creative_style
    ));
    prompt.push_str(&format!(
        "- Language complexity (0-1): {}\n",
        params.language_variety
    ));
    prompt.push_str(&format!(
        "- Word repetition factor: {}\n",
        params.word_repetition
    ));

    prompt.push_str("\nCreative Guidelines:\n");
    prompt.push_str("- Use vivid imagery and metaphors\n");
    prompt.push_str("- Maintain consistent rhythm and flow\n");
    prompt.push_str("- Incorporate subtle literary devices\n");
    prompt.push_str("- Ensure emotional depth through careful word choice\n");
    prompt.push_str("- Create memorable and impactful lines\n");
    prompt.push_str("- Balance complexity with accessibility\n");
    if theme.is_some() {
        prompt.push_str("- Naturally incorporate themes and elements from the given prompt\n");
    }

    prompt.push_str(
        "\nReturn only the poem without additional text or explanations. Avoid content that could trigger safety filters.",
    );
    prompt
}

/// Refinement prompt: combines structure, tone, creativity and language
/// directives with the original theme and keywords extracted from the draft.
/// The model must answer with a JSON object of exactly `{title, poem}`;
/// downstream parsing depends on that shape (after fence stripping).
pub fn refinement_prompt(params: &StyleParameters, keywords: &str, theme: &str) -> String {
    let params = params.normalized();
    let config = style_config(params.style);

    let mut prompt = String::new();
    prompt.push_str(
        "As a master poet well-versed in various poetic traditions, create an original, emotionally resonant poem:\n\n",
    );

    prompt.push_str("FORM AND STRUCTURE:\n");
    prompt.push_str(config.structure);
    prompt.push_str("\n\n");

    prompt.push_str("EMOTIONAL GUIDANCE:\n");
    prompt.push_str(tone_directive(params.emotional_tone));
    prompt.push_str("\n\n");

    prompt.push_str("CREATIVE DIRECTION:\n");
    prompt.push_str(creativity_directive(params.creative_style));
    prompt.push('\n');
    prompt.push_str(language_directive(params.language_variety));
    prompt.push_str("\n\n");

    prompt.push_str("THEME AND INSPIRATION:\n");
    prompt.push_str(&format!("Primary Theme: {theme}\n"));
    if !keywords.is_empty() {
        prompt.push_str(&format!("Key Elements to Incorporate: {keywords}\n"));
    }
    if let Some(name) = dedication_name(theme) {
        prompt.push_str(&format!("Dedication: this poem is about {name}\n"));
    }
    prompt.push('\n');

    prompt.push_str("TECHNICAL REQUIREMENTS:\n");
    prompt.push_str("- Ensure precise syllable counts and rhyme schemes where required\n");
    prompt.push_str("- Create vivid, specific imagery that engages multiple senses\n");
    prompt.push_str("- Use literary devices purposefully and subtly\n");
    prompt.push_str("- Maintain thematic coherence throughout\n");
    prompt.push_str("- Craft a meaningful title that enhances the poem's impact\n\n");

    prompt.push_str("EXAMPLES OF THIS FORM:\n");
    for example in config.examples {
        prompt.push_str(example);
        prompt.push('\n');
    }
    prompt.push('\n');

    prompt.push_str("Please provide the poem in JSON format:\n");
    prompt.push_str("{\n  \"title\": \"The poem's title\",\n  \"poem\": \"The complete poem with proper line breaks\"\n}");
    prompt
}

/// Critique prompt for the validation pass: asks the model to judge the
/// candidate against the originally requested parameters and answer with
/// structured JSON feedback (optionally including a corrected poem).
pub fn validation_prompt(poem: &str, params: &StyleParameters) -> String {
    let params = params.normalized();
    let config = style_config(params.style);

    let mut prompt = String::new();
    prompt.push_str(
        "As a poetry expert and critic, analyze this poem for technical accuracy and artistic merit:\n\n",
    );

    prompt.push_str("ORIGINAL REQUIREMENTS:\n");
    prompt.push_str(&format!("1. Form: {}\n", config.structure));
    prompt.push_str(&format!(
        "2. Emotional Tone: {}\n",
        tone_directive(params.emotional_tone)
    ));
    prompt.push_str(&format!("3. Creative Level: {}/100\n", params.creative_style));
    prompt.push_str(&format!("4. Language Level: {}\n", params.language_variety));
    prompt.push_str(&format!("5. Length: {}\n\n", params.length.as_str()));

    prompt.push_str("POEM TO ANALYZE:\n");
    prompt.push_str(poem);
    prompt.push_str("\n\n");

    prompt.push_str("Provide a detailed technical analysis in JSON format:\n");
    prompt.push_str(concat!(
        "{\n",
        "  \"isValid\": boolean,\n",
        "  \"feedback\": {\n",
        "    \"styleMatch\": boolean,\n",
        "    \"toneMatch\": boolean,\n",
        "    \"lengthMatch\": boolean,\n",
        "    \"technicalAccuracy\": string,\n",
        "    \"artisticMerit\": string,\n",
        "    \"suggestions\": string\n",
        "  },\n",
        "  \"reformattedPoem\": string // Only if the original needs significant improvement\n",
        "}",
    ));
    prompt
}
