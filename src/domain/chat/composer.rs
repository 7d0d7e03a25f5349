//! Templated Spanish acknowledgments for the chat transcript.

use once_cell::sync::Lazy;
use regex::Regex;

use super::context::fold;
use super::update::{ContextTag, ExtractedUpdate};

/// Sport nouns that suggest a message was trying to state statistics.
static STAT_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"gol|asist|pase|ataj|parada|save|partido|juego|match")
        .expect("static hint pattern must compile")
});

static DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d").expect("static digit pattern must compile"));

/// Builds the system reply posted back into the chat after processing
/// a message.
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    pub fn new() -> Self {
        Self
    }

    /// Composes the transcript reply for a processed message.
    ///
    /// With updates present, each one gets a line whose verb matches its
    /// conversational intent. With none, a message that looked like a stat
    /// claim (digits next to sport nouns) gets a clarifying question instead
    /// of a silent ack.
    pub fn acknowledge(&self, original_message: &str, updates: &[ExtractedUpdate]) -> String {
        if updates.is_empty() {
            return self.no_update_reply(original_message);
        }

        let mut lines = Vec::with_capacity(updates.len());
        for update in updates {
            let fields = update.described_fields().join(", ");
            match update.reasoning.as_deref() {
                Some(reasoning) => lines.push(format!(
                    "📊 {}: {} {} ({})",
                    update.player_name,
                    verb_for(update.context_tag),
                    fields,
                    reasoning
                )),
                None => lines.push(format!(
                    "📊 {}: {} {}",
                    update.player_name,
                    verb_for(update.context_tag),
                    fields
                )),
            }
        }
        lines.join("\n")
    }

    fn no_update_reply(&self, original_message: &str) -> String {
        let folded = fold(original_message);
        if DIGIT.is_match(&folded) && STAT_HINT.is_match(&folded) {
            "Vi números y términos de juego en tu mensaje pero no pude identificar una \
             estadística clara. ¿Puedes decirlo como \"llevo 5 goles\" o \"hice 2 atajadas hoy\"?"
                .to_string()
        } else {
            "¡Gracias por tu mensaje! Si quieres registrar estadísticas, escribe algo como \
             \"hice 2 goles hoy\" o \"llevo 10 goles en 15 partidos\"."
                .to_string()
        }
    }
}

/// The verb phrase for one update line, keyed by conversational intent.
fn verb_for(tag: ContextTag) -> &'static str {
    match tag {
        ContextTag::Correction => "corrigiendo a",
        ContextTag::Addition => "sumando",
        ContextTag::TotalUpdate => "actualizando total a",
        ContextTag::Normal => "actualizando a",
    }
}
