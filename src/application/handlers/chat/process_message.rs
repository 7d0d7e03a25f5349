//! ProcessMessage - The full chat pipeline for one incoming message.
//!
//! Steps: persist the message, classify it, run deterministic extraction,
//! fall back to the completion model when nothing matched, apply the
//! resulting updates, and post a system reply. A dead or misbehaving
//! completion model never fails the pipeline; the message simply lands in
//! the transcript with a plain acknowledgment.

use std::sync::Arc;

use crate::config::AiConfig;
use crate::domain::chat::{
    classify, ChatMessage, ResponseComposer, SessionContext, StatExtractor,
};
use crate::domain::chat::AutoUpdateResult;
use crate::domain::foundation::{ChatMessageId, DomainError};
use crate::ports::{AIProvider, ChatStore, CompletionRequest};

use super::resolve_updates::{ResolveUpdatesCommand, ResolveUpdatesHandler};

/// Default sampling temperature for fallback extraction.
const FALLBACK_TEMPERATURE: f32 = 0.2;

/// Default token cap for fallback extraction.
const FALLBACK_MAX_TOKENS: u32 = 500;

/// Command to process one incoming chat message.
#[derive(Debug, Clone)]
pub struct ProcessMessageCommand {
    pub body: String,
    pub session: SessionContext,
}

/// Result of processing one message.
#[derive(Debug, Clone)]
pub struct ProcessMessageResult {
    /// ID of the stored user message.
    pub message_id: ChatMessageId,
    /// The system reply appended to the transcript.
    pub reply: ChatMessage,
    /// Outcome of applying any extracted updates.
    pub update_result: AutoUpdateResult,
}

/// Handler for the chat message pipeline.
pub struct ProcessMessageHandler {
    chat: Arc<dyn ChatStore>,
    ai: Arc<dyn AIProvider>,
    resolver: ResolveUpdatesHandler,
    extractor: StatExtractor,
    composer: ResponseComposer,
    fallback_temperature: f32,
    fallback_max_tokens: u32,
}

impl ProcessMessageHandler {
    pub fn new(
        chat: Arc<dyn ChatStore>,
        ai: Arc<dyn AIProvider>,
        resolver: ResolveUpdatesHandler,
    ) -> Self {
        Self {
            chat,
            ai,
            resolver,
            extractor: StatExtractor::new(),
            composer: ResponseComposer::new(),
            fallback_temperature: FALLBACK_TEMPERATURE,
            fallback_max_tokens: FALLBACK_MAX_TOKENS,
        }
    }

    /// Applies fallback tuning from application settings: the sampling
    /// parameters sent with each completion request and the confidence floor
    /// for fallback-extracted updates.
    pub fn with_ai_config(mut self, config: &AiConfig) -> Self {
        self.fallback_temperature = config.temperature;
        self.fallback_max_tokens = config.max_tokens;
        self.extractor = self
            .extractor
            .with_min_fallback_confidence(config.min_confidence);
        self
    }

    /// Overrides the extractor (e.g. to change the confidence floor).
    pub fn with_extractor(mut self, extractor: StatExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub async fn handle(
        &self,
        cmd: ProcessMessageCommand,
    ) -> Result<ProcessMessageResult, DomainError> {
        let message = ChatMessage::user(&cmd.session.author_name, &cmd.body)?;
        self.chat.append(&message).await?;

        let context = classify(&cmd.body);
        let mut updates = self
            .extractor
            .extract(&cmd.body, &cmd.session.author_name, &context);

        if updates.is_empty() {
            updates = self.fallback_extract(&cmd).await;
        }

        let had_candidates = !updates.is_empty();
        let update_result = self
            .resolver
            .handle(ResolveUpdatesCommand {
                updates,
                session: cmd.session.clone(),
            })
            .await?;

        let reply_body = if update_result.success {
            format!(
                "{}\n{}",
                self.composer.acknowledge(&cmd.body, &update_result.updates),
                update_result.message
            )
        } else if had_candidates {
            // Updates were extracted but none were allowed or applied; the
            // resolver's message explains why.
            update_result.message.clone()
        } else {
            self.composer.acknowledge(&cmd.body, &[])
        };

        let reply = ChatMessage::system(reply_body)?;
        self.chat.append(&reply).await?;
        self.chat.mark_processed(message.id()).await?;

        Ok(ProcessMessageResult {
            message_id: message.id(),
            reply,
            update_result,
        })
    }

    /// Asks the completion model to extract updates. Fails open: any
    /// provider error is logged and treated as "nothing detected".
    async fn fallback_extract(
        &self,
        cmd: &ProcessMessageCommand,
    ) -> Vec<crate::domain::chat::ExtractedUpdate> {
        let prompt = self
            .extractor
            .fallback_prompt(&cmd.body, &cmd.session.author_name);
        let request = CompletionRequest::new(prompt)
            .with_temperature(self.fallback_temperature)
            .with_max_tokens(self.fallback_max_tokens);

        match self.ai.complete(request).await {
            Ok(response) => {
                let updates = self.extractor.parse_fallback(&response.content);
                tracing::debug!(
                    model = %response.model,
                    count = updates.len(),
                    "fallback extraction finished"
                );
                updates
            }
            Err(error) => {
                tracing::warn!(%error, "fallback extraction failed, continuing without updates");
                Vec::new()
            }
        }
    }
}
