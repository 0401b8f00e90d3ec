//! Shade-glyph redaction.
//!
//! Every character of the input is replaced with one of three block glyphs,
//! drawn independently with weights 0.5 / 0.3 / 0.2. Only the character count
//! of the input survives.

use rand::Rng;

/// U+2591 LIGHT SHADE.
pub const LIGHT_SHADE: char = '\u{2591}';
/// U+2592 MEDIUM SHADE.
pub const MEDIUM_SHADE: char = '\u{2592}';
/// U+2593 DARK SHADE.
pub const DARK_SHADE: char = '\u{2593}';

/// Replace every character of `input` with a randomly drawn shade glyph.
pub fn redact<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    input.chars().map(|_| draw_glyph(rng)).collect()
}

/// `true` if `s` is non-empty and made up only of shade glyphs, i.e. it looks
/// like the output of a previous [`redact`].
pub fn is_redacted(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_shade)
}

fn is_shade(c: char) -> bool {
    matches!(c, LIGHT_SHADE | MEDIUM_SHADE | DARK_SHADE)
}

fn draw_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    let r: f64 = rng.gen();
    if r < 0.5 {
        LIGHT_SHADE
    } else if r < 0.8 {
        MEDIUM_SHADE
    } else {
        DARK_SHADE
    }
}
