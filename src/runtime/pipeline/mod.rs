use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::traits::{ChunkExchange, TranslationLogger};
use crate::core::types::{AuditEntry, ChunkOutcome, RawResponse, TranslationRequest, TranslationResult};
use crate::language::{language_name, verify_language_pair};
use crate::parser::parse_translation_response;

/// Chunks are sent one after another. An unusable reply maps the chunk's keys
/// to their source text; once the quota is exceeded the remaining keys are
/// left out.
pub async fn translate_array(
    exchange: &dyn ChunkExchange,
    logger: &dyn TranslationLogger,
    strings: &TranslationRequest,
    source_language_code: &str,
    target_language_code: &str,
    chunk_size: usize,
) -> TranslationResult {
    let mut translated = TranslationResult::new();
    let provider = exchange.provider();

    if strings.is_empty() {
        return translated;
    }
    if !verify_language_pair(source_language_code, target_language_code, |iso| {
        exchange.supports_language(iso)
    }) {
        warn!(
            %provider,
            source = source_language_code,
            target = target_language_code,
            "unsupported language pair"
        );
        return translated;
    }

    let source_language = language_name(source_language_code);
    let target_language = language_name(target_language_code);

    let entries: Vec<(&String, &String)> = strings.iter().collect();
    let chunk_count = entries.len().div_ceil(chunk_size.max(1));
    debug!(%provider, strings = entries.len(), chunk_count, "starting translation batch");

    for (chunk_index, chunk) in entries.chunks(chunk_size.max(1)).enumerate() {
        let sources: Vec<String> = chunk.iter().map(|(_, text)| (*text).clone()).collect();

        let response = exchange
            .send_request(&source_language, &target_language, &sources)
            .await;
        let (outcome, translations) = evaluate_reply(exchange, &response, sources.len());

        logger.log(&AuditEntry {
            provider,
            model: exchange.model().to_string(),
            lang_source: source_language.clone(),
            lang_target: target_language.clone(),
            strings: chunk
                .iter()
                .map(|(key, text)| ((*key).clone(), (*text).clone()))
                .collect::<IndexMap<_, _>>(),
            response: response.to_log_string(),
            outcome: outcome.clone(),
        });

        if outcome.is_accepted() {
            for ((key, _), translation) in chunk.iter().zip(translations) {
                translated.insert((*key).clone(), translation);
            }
            logger.count_towards_quota(chunk.len());
        } else {
            warn!(%provider, chunk_index, outcome = ?outcome, "chunk fell back to source text");
            for (key, text) in chunk {
                translated.insert((*key).clone(), (*text).clone());
            }
        }

        if logger.quota_exceeded() {
            info!(%provider, chunk_index, chunk_count, "translation quota exceeded; stopping batch");
            break;
        }
    }

    translated
}

fn evaluate_reply(
    exchange: &dyn ChunkExchange,
    response: &RawResponse,
    expected: usize,
) -> (ChunkOutcome, Vec<String>) {
    let body = match response {
        RawResponse::Transport { message } => {
            return (
                ChunkOutcome::Transport {
                    message: message.clone(),
                },
                Vec::new(),
            );
        }
        RawResponse::Http { body, .. } if response.is_ok() => body,
        RawResponse::Http { status_code, .. } => {
            return (
                ChunkOutcome::HttpStatus {
                    status_code: *status_code,
                },
                Vec::new(),
            );
        }
    };

    let envelope = match serde_json::from_str::<Value>(body) {
        Ok(envelope) => envelope,
        Err(error) => {
            return (
                ChunkOutcome::MissingText {
                    message: format!("response body is not json: {error}"),
                },
                Vec::new(),
            );
        }
    };

    let text = match exchange.reply_text(&envelope) {
        Ok(text) => text,
        Err(error) => {
            return (
                ChunkOutcome::MissingText {
                    message: error.to_string(),
                },
                Vec::new(),
            );
        }
    };

    let translations = parse_translation_response(&text);
    if translations.is_empty() {
        return (ChunkOutcome::Unparseable, Vec::new());
    }
    if translations.len() != expected {
        return (
            ChunkOutcome::CountMismatch {
                expected,
                received: translations.len(),
            },
            Vec::new(),
        );
    }

    (ChunkOutcome::Accepted, translations)
}
