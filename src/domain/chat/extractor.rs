//! Statistic extraction from chat messages.
//!
//! Two paths produce `ExtractedUpdate`s. The deterministic path runs regex
//! field patterns over the folded message and never fails. The fallback path
//! parses the completion model's JSON output, tolerating markdown fences and
//! surrounding prose, and drops anything below the confidence floor.

use once_cell::sync::Lazy;
use regex::Regex;

use super::context::{fold, MessageContext};
use super::update::{ContextTag, ExtractedUpdate, UpdateSemantics};

/// Fallback-path updates below this confidence are discarded.
pub const MIN_FALLBACK_CONFIDENCE: f64 = 0.8;

/// Confidence assigned to deterministic pattern matches.
const DETERMINISTIC_CONFIDENCE: f64 = 0.9;

/// How a field pattern yields a value.
enum PatternKind {
    /// Capture group 1 holds the count.
    Count,
    /// A match asserts the count is zero (negations, "cero", "ningún").
    Zero,
}

struct FieldPattern {
    regex: Regex,
    kind: PatternKind,
}

fn field_patterns(specs: &[(&str, PatternKind)]) -> Vec<FieldPattern> {
    specs
        .iter()
        .map(|(pattern, kind)| FieldPattern {
            regex: Regex::new(pattern).expect("static field pattern must compile"),
            kind: match kind {
                PatternKind::Count => PatternKind::Count,
                PatternKind::Zero => PatternKind::Zero,
            },
        })
        .collect()
}

static GOAL_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    field_patterns(&[
        (r"(\d+)\s*gol(?:es)?\b", PatternKind::Count),
        (r"\b(?:cero|ningun)\s+gol(?:es)?\b", PatternKind::Zero),
        (r"\bno\b[^.!?]*\bgol(?:es)?\b", PatternKind::Zero),
        (r"\bsin\s+gol(?:es)?\b", PatternKind::Zero),
    ])
});

static ASSIST_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    field_patterns(&[
        (r"(\d+)\s*(?:asist\w*|pases?)\b", PatternKind::Count),
        (r"\b(?:cero|ninguna)\s+(?:asist\w*|pases?)\b", PatternKind::Zero),
        (r"\bno\b[^.!?]*\basist\w*", PatternKind::Zero),
        (r"\bsin\s+asist\w*", PatternKind::Zero),
    ])
});

static SAVE_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    field_patterns(&[
        (r"(\d+)\s*(?:atajadas?|paradas?|saves?)\b", PatternKind::Count),
        (r"\b(?:cero|ninguna)\s+(?:atajadas?|paradas?)\b", PatternKind::Zero),
        (r"\bno\b[^.!?]*\bataj\w*", PatternKind::Zero),
        (r"\bsin\s+ataj\w*", PatternKind::Zero),
    ])
});

static MATCH_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    field_patterns(&[
        (r"(\d+)\s*(?:partidos?|juegos?|matches?)\b", PatternKind::Count),
        (r"\ben\s+(\d+)\s+partidos?\b", PatternKind::Count),
    ])
});

/// Extracts statistic updates from chat messages.
#[derive(Debug, Clone)]
pub struct StatExtractor {
    min_fallback_confidence: f64,
}

impl Default for StatExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StatExtractor {
    /// Creates an extractor with the default confidence floor.
    pub fn new() -> Self {
        Self {
            min_fallback_confidence: MIN_FALLBACK_CONFIDENCE,
        }
    }

    /// Overrides the fallback confidence floor.
    pub fn with_min_fallback_confidence(mut self, min: f64) -> Self {
        self.min_fallback_confidence = min;
        self
    }

    /// Runs the deterministic field patterns over a message.
    ///
    /// Returns zero or one update, always for `author` (messages only ever
    /// describe the speaker's own stats on this path). Per field the patterns
    /// are tried in order and the first match wins; fields with no match are
    /// left out so replace-semantics updates never clobber them.
    pub fn extract(
        &self,
        message: &str,
        author: &str,
        context: &MessageContext,
    ) -> Vec<ExtractedUpdate> {
        let folded = fold(message);

        let goals = match_field(&GOAL_PATTERNS, &folded);
        let assists = match_field(&ASSIST_PATTERNS, &folded);
        let saves = match_field(&SAVE_PATTERNS, &folded);
        let matches_played = match_field(&MATCH_PATTERNS, &folded);

        if goals.is_none() && assists.is_none() && saves.is_none() && matches_played.is_none() {
            return Vec::new();
        }

        let (update_semantics, context_tag) = resolve_semantics(context);
        let reasoning = if context.matched_cues.is_empty() {
            format!("patrones directos ({})", tag_label(context_tag))
        } else {
            format!(
                "patrones directos ({}, señales: {})",
                tag_label(context_tag),
                context.matched_cues.join(", ")
            )
        };

        vec![ExtractedUpdate {
            player_name: author.to_string(),
            goals,
            assists,
            saves,
            matches_played,
            confidence: DETERMINISTIC_CONFIDENCE,
            update_semantics,
            context_tag,
            reasoning: Some(reasoning),
        }]
    }

    /// Builds the prompt sent to the completion model when the deterministic
    /// path found nothing.
    pub fn fallback_prompt(&self, message: &str, author: &str) -> String {
        format!(
            r#"Eres un asistente que detecta actualizaciones de estadísticas de fútbol en mensajes de chat.

Mensaje de {author}: "{message}"

Analiza si el mensaje declara goles, asistencias, atajadas o partidos jugados del propio autor. Responde SOLO con un arreglo JSON (sin texto adicional). Si no hay ninguna actualización, responde [].

Cada elemento debe tener esta forma:
{{
  "player_name": "{author}",
  "goals": 2,
  "assists": 1,
  "saves": 0,
  "matches_played": 5,
  "confidence": 0.9,
  "update_semantics": "replace" | "increment" | "correct",
  "context_tag": "correction" | "addition" | "total_update" | "normal",
  "reasoning": "explicación breve"
}}

Reglas:
- Omite por completo los campos que el mensaje no menciona. Un 0 explícito significa que el autor afirma tener cero.
- "llevo X", "tengo X", "en total" son totales acumulados: usa "replace" y "total_update".
- "hice X", "anoté X", "hoy", "ayer" son eventos nuevos: usa "increment" y "addition".
- "en realidad", "me equivoqué", "solo tengo" corrigen un dato anterior: usa "correct" y "correction".
- confidence entre 0 y 1 según qué tan claro es el mensaje."#,
        )
    }

    /// Parses the completion model's raw output into updates.
    ///
    /// Tolerates markdown code fences and prose around the JSON, and accepts
    /// either an array or a single object. Anything unparseable, without
    /// counters, without a subject, or below the confidence floor is dropped.
    /// Never errors: a malformed response is treated as "nothing detected".
    pub fn parse_fallback(&self, raw: &str) -> Vec<ExtractedUpdate> {
        let json = match locate_json(raw) {
            Some(json) => json,
            None => {
                tracing::debug!("fallback output contained no JSON payload");
                return Vec::new();
            }
        };

        let parsed: Vec<ExtractedUpdate> =
            match serde_json::from_str::<Vec<ExtractedUpdate>>(&json) {
                Ok(updates) => updates,
                Err(_) => match serde_json::from_str::<ExtractedUpdate>(&json) {
                    Ok(update) => vec![update],
                    Err(error) => {
                        tracing::warn!(%error, "discarding malformed fallback output");
                        return Vec::new();
                    }
                },
            };

        parsed
            .into_iter()
            .filter(|update| {
                update.is_actionable()
                    && !update.player_name.trim().is_empty()
                    && update.confidence.is_finite()
                    && (0.0..=1.0).contains(&update.confidence)
                    && update.confidence >= self.min_fallback_confidence
            })
            .collect()
    }
}

fn match_field(patterns: &[FieldPattern], folded: &str) -> Option<u32> {
    for pattern in patterns {
        match pattern.kind {
            PatternKind::Count => {
                if let Some(captures) = pattern.regex.captures(folded) {
                    if let Some(value) = captures.get(1).and_then(|m| m.as_str().parse().ok()) {
                        return Some(value);
                    }
                }
            }
            PatternKind::Zero => {
                if pattern.regex.is_match(folded) {
                    return Some(0);
                }
            }
        }
    }
    None
}

/// Maps classifier flags to merge semantics. Correction outranks total,
/// total outranks addition; an unqualified number increments.
fn resolve_semantics(context: &MessageContext) -> (UpdateSemantics, ContextTag) {
    if context.is_correction {
        (UpdateSemantics::Correct, ContextTag::Correction)
    } else if context.is_total_update {
        (UpdateSemantics::Replace, ContextTag::TotalUpdate)
    } else if context.is_addition {
        (UpdateSemantics::Increment, ContextTag::Addition)
    } else {
        (UpdateSemantics::Increment, ContextTag::Normal)
    }
}

fn tag_label(tag: ContextTag) -> &'static str {
    match tag {
        ContextTag::Correction => "corrección",
        ContextTag::Addition => "suma",
        ContextTag::TotalUpdate => "total acumulado",
        ContextTag::Normal => "mensaje directo",
    }
}

/// Finds the JSON payload inside a model response that may wrap it in a
/// markdown code fence or surrounding prose.
fn locate_json(response: &str) -> Option<String> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(json) = extract_from_code_block(trimmed) {
        return Some(json);
    }

    let obj_start = trimmed.find('{');
    let arr_start = trimmed.find('[');

    let (start, open, close) = match (obj_start, arr_start) {
        (Some(o), Some(a)) if a < o => (a, '[', ']'),
        (Some(o), _) => (o, '{', '}'),
        (None, Some(a)) => (a, '[', ']'),
        (None, None) => return None,
    };

    extract_balanced_json(trimmed, start, open, close)
}

fn extract_from_code_block(s: &str) -> Option<String> {
    let patterns = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let json_start = start + pattern.len();
            if let Some(end) = s[json_start..].find("```") {
                return Some(s[json_start..json_start + end].trim().to_string());
            }
        }
    }
    None
}

fn extract_balanced_json(s: &str, start: usize, open: char, close: char) -> Option<String> {
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(s[start..start + i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::context::classify;

    fn extract(message: &str, author: &str) -> Vec<ExtractedUpdate> {
        let context = classify(message);
        StatExtractor::new().extract(message, author, &context)
    }

    mod deterministic {
        use super::*;

        #[test]
        fn total_statement_replaces_mentioned_fields() {
            let updates = extract("Llevo 10 goles en 15 partidos", "Ana");
            assert_eq!(updates.len(), 1);
            let update = &updates[0];
            assert_eq!(update.player_name, "Ana");
            assert_eq!(update.goals, Some(10));
            assert_eq!(update.matches_played, Some(15));
            assert_eq!(update.assists, None);
            assert_eq!(update.saves, None);
            assert_eq!(update.update_semantics, UpdateSemantics::Replace);
            assert_eq!(update.context_tag, ContextTag::TotalUpdate);
            assert!((update.confidence - 0.9).abs() < f64::EPSILON);
        }

        #[test]
        fn fresh_event_increments() {
            let updates = extract("Hice 2 goles hoy", "Ana");
            assert_eq!(updates.len(), 1);
            let update = &updates[0];
            assert_eq!(update.goals, Some(2));
            assert_eq!(update.update_semantics, UpdateSemantics::Increment);
            assert_eq!(update.context_tag, ContextTag::Addition);
        }

        #[test]
        fn correction_language_corrects_only_mentioned_fields() {
            let updates = extract("En realidad solo tengo 1 asistencia", "Ana");
            assert_eq!(updates.len(), 1);
            let update = &updates[0];
            assert_eq!(update.assists, Some(1));
            assert_eq!(update.goals, None);
            assert_eq!(update.update_semantics, UpdateSemantics::Correct);
            assert_eq!(update.context_tag, ContextTag::Correction);
        }

        #[test]
        fn correction_outranks_total_when_both_fire() {
            // "solo tengo" fires correction and "tengo" fires total.
            let updates = extract("solo tengo 3 goles", "Ana");
            assert_eq!(updates[0].update_semantics, UpdateSemantics::Correct);
        }

        #[test]
        fn negation_yields_explicit_zero() {
            let updates = extract("No tengo goles", "Ana");
            assert_eq!(updates.len(), 1);
            assert_eq!(updates[0].goals, Some(0));
            assert_eq!(updates[0].update_semantics, UpdateSemantics::Correct);
        }

        #[test]
        fn digit_zero_yields_explicit_zero_with_correction() {
            let updates = extract("tengo 0 goles", "Ana");
            assert_eq!(updates[0].goals, Some(0));
            assert_eq!(updates[0].update_semantics, UpdateSemantics::Correct);
        }

        #[test]
        fn goalkeeper_vocabulary_is_recognized() {
            let updates = extract("Hoy hice 7 atajadas en 2 partidos", "Luis");
            assert_eq!(updates[0].saves, Some(7));
            assert_eq!(updates[0].matches_played, Some(2));
        }

        #[test]
        fn pases_counts_as_assists() {
            let updates = extract("di 3 pases de gol hoy", "Ana");
            assert_eq!(updates[0].assists, Some(3));
        }

        #[test]
        fn plain_chatter_yields_nothing() {
            assert!(extract("¿Quién juega el sábado?", "Ana").is_empty());
        }

        #[test]
        fn numbers_without_stat_nouns_yield_nothing() {
            assert!(extract("llegamos a las 5", "Ana").is_empty());
        }

        #[test]
        fn unqualified_number_defaults_to_increment() {
            let updates = extract("2 goles", "Ana");
            assert_eq!(updates[0].update_semantics, UpdateSemantics::Increment);
            assert_eq!(updates[0].context_tag, ContextTag::Normal);
        }

        #[test]
        fn diacritics_do_not_block_matching() {
            let updates = extract("Anoté 1 gol y 2 asistencias", "José");
            assert_eq!(updates[0].goals, Some(1));
            assert_eq!(updates[0].assists, Some(2));
            assert_eq!(updates[0].player_name, "José");
        }

        #[test]
        fn reasoning_names_the_matched_cues() {
            let updates = extract("Llevo 4 goles", "Ana");
            let reasoning = updates[0].reasoning.as_deref().unwrap();
            assert!(reasoning.contains("llevo"));
        }
    }

    mod fallback {
        use super::*;

        #[test]
        fn parses_array_in_code_fence() {
            let raw = r#"Claro, aquí está el análisis:

```json
[{"player_name": "Ana", "goals": 2, "confidence": 0.85, "update_semantics": "increment", "context_tag": "addition"}]
```"#;
            let updates = StatExtractor::new().parse_fallback(raw);
            assert_eq!(updates.len(), 1);
            assert_eq!(updates[0].goals, Some(2));
            assert_eq!(updates[0].update_semantics, UpdateSemantics::Increment);
        }

        #[test]
        fn wraps_bare_object_into_single_update() {
            let raw = r#"{"player_name": "Ana", "assists": 1, "confidence": 0.9}"#;
            let updates = StatExtractor::new().parse_fallback(raw);
            assert_eq!(updates.len(), 1);
            assert_eq!(updates[0].assists, Some(1));
        }

        #[test]
        fn tolerates_surrounding_prose() {
            let raw = r#"El mensaje menciona estadísticas:
[{"player_name": "Ana", "goals": 1, "confidence": 0.8}]
¿Algo más?"#;
            assert_eq!(StatExtractor::new().parse_fallback(raw).len(), 1);
        }

        #[test]
        fn drops_low_confidence_updates() {
            let raw = r#"[{"player_name": "Ana", "goals": 2, "confidence": 0.5}]"#;
            assert!(StatExtractor::new().parse_fallback(raw).is_empty());
        }

        #[test]
        fn drops_updates_without_counters() {
            let raw = r#"[{"player_name": "Ana", "confidence": 0.95}]"#;
            assert!(StatExtractor::new().parse_fallback(raw).is_empty());
        }

        #[test]
        fn drops_updates_without_subject() {
            let raw = r#"[{"player_name": "  ", "goals": 2, "confidence": 0.95}]"#;
            assert!(StatExtractor::new().parse_fallback(raw).is_empty());
        }

        #[test]
        fn drops_out_of_range_confidence() {
            let raw = r#"[{"player_name": "Ana", "goals": 2, "confidence": 1.5}]"#;
            assert!(StatExtractor::new().parse_fallback(raw).is_empty());
        }

        #[test]
        fn empty_array_yields_nothing() {
            assert!(StatExtractor::new().parse_fallback("[]").is_empty());
        }

        #[test]
        fn garbage_yields_nothing() {
            assert!(StatExtractor::new().parse_fallback("no hay nada aquí").is_empty());
            assert!(StatExtractor::new().parse_fallback("").is_empty());
            assert!(StatExtractor::new()
                .parse_fallback(r#"[{"player_name": "Ana", "goals": }"#)
                .is_empty());
        }

        #[test]
        fn custom_floor_is_honored() {
            let raw = r#"[{"player_name": "Ana", "goals": 2, "confidence": 0.6}]"#;
            let extractor = StatExtractor::new().with_min_fallback_confidence(0.5);
            assert_eq!(extractor.parse_fallback(raw).len(), 1);
        }
    }

    mod prompt {
        use super::*;

        #[test]
        fn prompt_embeds_message_and_author() {
            let prompt = StatExtractor::new().fallback_prompt("metí un golazo", "Ana");
            assert!(prompt.contains("metí un golazo"));
            assert!(prompt.contains("Ana"));
            assert!(prompt.contains("update_semantics"));
        }
    }
}
