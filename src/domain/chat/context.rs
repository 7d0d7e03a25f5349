//! Conversation context classifier.
//!
//! Scans a raw message against three cue vocabularies (correction, addition,
//! cumulative-total) and reports which fired. Pure and deterministic: no I/O,
//! no allocation beyond the matched cue list. Resolving collisions between
//! flags is the extractor's job, not the classifier's.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cues indicating the author is fixing previously stated data.
static CORRECTION_CUES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(en realidad|realmente|la verdad|en verdad|solo tengo|unicamente|nada mas)\b",
        r"\b(me equivoque|error|incorrecto|mal|corregir|rectificar)\b",
        r"\b(no tengo|no he|cero|0)\b",
        r"\b(cuando en realidad|pero en realidad|pero solo|pero realmente)\b",
    ])
});

/// Cues indicating fresh in-game events being added.
static ADDITION_CUES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(hice|anote|marque|di|consegui|logre|hoy|ayer|recien)\b",
        r"\b(acabo de|acabe de|termine de|en el partido|en el juego)\b",
        r"\b(sume|agregue|mas|adicional|nuevo|otra)\b",
    ])
});

/// Cues indicating a cumulative-total statement.
static TOTAL_CUES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(llevo|tengo|total|en total|acumulado|hasta ahora)\b",
        r"\b(mi total es|mis estadisticas son|en resumen)\b",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static cue pattern must compile"))
        .collect()
}

/// Result of classifying one message.
///
/// All three flags may be simultaneously true or false; the extractor
/// resolves collisions by priority (correction > total > addition).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContext {
    pub is_correction: bool,
    pub is_addition: bool,
    pub is_total_update: bool,
    /// Every cue that fired, in scan order, for audit/reasoning strings.
    pub matched_cues: Vec<String>,
}

/// Lowercases and strips Spanish diacritics so cue matching tolerates both
/// "anoté" and "anote".
pub(crate) fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Classifies a message against the three cue vocabularies.
pub fn classify(message: &str) -> MessageContext {
    let folded = fold(message);
    let mut context = MessageContext::default();

    for cue in CORRECTION_CUES.iter() {
        for m in cue.find_iter(&folded) {
            context.is_correction = true;
            context.matched_cues.push(m.as_str().to_string());
        }
    }
    for cue in ADDITION_CUES.iter() {
        for m in cue.find_iter(&folded) {
            context.is_addition = true;
            context.matched_cues.push(m.as_str().to_string());
        }
    }
    for cue in TOTAL_CUES.iter() {
        for m in cue.find_iter(&folded) {
            context.is_total_update = true;
            context.matched_cues.push(m.as_str().to_string());
        }
    }

    context
}
