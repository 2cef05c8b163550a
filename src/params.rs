//! Parameter translation between CLI inputs and provider-specific formats.

/// Smallest accepted width or height in pixels.
pub const MIN_DIMENSION: u32 = 64;
/// Largest accepted width or height in pixels.
pub const MAX_DIMENSION: u32 = 2048;

/// Output sizes DALL-E 3 accepts, in preference order for ties.
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
pub const OPENAI_SIZES: [(u32, u32, &str); 3] =
    [(1024, 1024, "1024x1024"), (1792, 1024, "1792x1024"), (1024, 1792, "1024x1792")];

/// Pick the supported `OpenAI` size closest to the requested dimensions.
///
/// Distance is `|Δwidth| + |Δheight|`; the first entry of [`OPENAI_SIZES`]
/// wins a tie.
#[must_use]
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
pub fn nearest_openai_size(width: u32, height: u32) -> &'static str {
    let mut best = OPENAI_SIZES[0];
    let mut best_diff = u32::MAX;
    for entry in OPENAI_SIZES {
        let diff = entry.0.abs_diff(width) + entry.1.abs_diff(height);
        if diff < best_diff {
            best_diff = diff;
            best = entry;
        }
    }
    best.2
}

/// Validate one image dimension.
///
/// # Errors
///
/// Returns an error if the value is outside `64..=2048`.
pub fn validate_dimension(name: &str, value: u32) -> Result<(), String> {
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "Unsupported {name} {value}. Valid: {MIN_DIMENSION}..={MAX_DIMENSION} pixels"
        ))
    }
}

/// Resolve a named size preset to `(width, height)`.
///
/// # Errors
///
/// Returns an error if the preset is not recognized.
pub fn preset_dimensions(preset: &str) -> Result<(u32, u32), String> {
    match preset {
        "square" => Ok((512, 512)),
        "portrait" => Ok((384, 512)),
        "landscape" => Ok((512, 384)),
        "wide" => Ok((512, 288)),
        _ => Err(format!(
            "Unsupported preset '{preset}'. Valid: square, portrait, landscape, wide"
        )),
    }
}

/// Art styles that can be appended to a prompt.
const STYLES: &[(&str, &str)] = &[
    ("photorealistic", "photorealistic"),
    ("digital-art", "digital art"),
    ("oil-painting", "oil painting"),
    ("watercolor", "watercolor"),
    ("sketch", "sketch"),
    ("anime", "anime"),
];

/// Validate the style parameter.
///
/// # Errors
///
/// Returns an error if the style is not recognized.
pub fn validate_style(style: &str) -> Result<(), String> {
    if STYLES.iter().any(|(name, _)| *name == style) {
        Ok(())
    } else {
        let names: Vec<&str> = STYLES.iter().map(|(name, _)| *name).collect();
        Err(format!("Unsupported style '{style}'. Valid: {}", names.join(", ")))
    }
}

/// Append the style suffix to a prompt. Photorealistic leaves it untouched.
#[must_use]
pub fn apply_style(prompt: &str, style: &str) -> String {
    match STYLES.iter().find(|(name, _)| *name == style) {
        Some(("photorealistic", _)) | None => prompt.to_string(),
        Some((_, phrase)) => format!("{prompt}, {phrase} style"),
    }
}
