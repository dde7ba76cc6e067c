//! Word extraction for word clouds.

use chatlens_core::{AnalyticsError, Chat, Counter, MessageType, PartOfSpeech, Result, Tagger};

/// Words of one part of speech from the text of every regular message,
/// joined with single spaces. System messages are skipped. Each text
/// fragment of a message is tagged on its own.
pub fn word_blob<T: Tagger + ?Sized>(chat: &Chat, tagger: &T, pos: PartOfSpeech) -> Result<String> {
    let mut words: Vec<String> = Vec::new();

    for msg in chat
        .messages
        .iter()
        .filter(|m| m.message_type == MessageType::Default)
    {
        let text = msg
            .counter(Counter::Text)
            .ok_or(AnalyticsError::MissingCounter {
                counter: Counter::Text,
                at: msg.created_at,
            })?;

        for fragment in text.as_slice() {
            words.extend(
                tagger
                    .tag(fragment)
                    .into_iter()
                    .filter(|t| t.pos == pos)
                    .map(|t| t.text),
            );
        }
    }

    tracing::debug!("Extracted {} {:?} words", words.len(), pos);
    Ok(words.join(" "))
}

pub fn nouns<T: Tagger + ?Sized>(chat: &Chat, tagger: &T) -> Result<String> {
    word_blob(chat, tagger, PartOfSpeech::Noun)
}

pub fn verbs<T: Tagger + ?Sized>(chat: &Chat, tagger: &T) -> Result<String> {
    word_blob(chat, tagger, PartOfSpeech::Verb)
}
