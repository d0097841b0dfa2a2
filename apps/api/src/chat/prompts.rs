//! Conversational prompt shapes.

use crate::chat::session::Transcript;
use crate::chat::ChatVariant;
use crate::models::chat::ChatTurn;

/// What goes to the completion service for one chat turn.
#[derive(Debug, PartialEq)]
pub enum ChatPrompt<'a> {
    /// Only the latest message, as a single prompt.
    Single(&'a str),
    /// The full transcript. On the first exchange the seed instruction and
    /// the user's message are adjacent user turns and travel as one content.
    History(&'a [ChatTurn]),
}

/// Builds the outbound prompt once the user's turn has been appended.
pub fn build_chat_prompt<'a>(
    variant: ChatVariant,
    transcript: &'a Transcript,
    latest: &'a str,
) -> ChatPrompt<'a> {
    match variant {
        ChatVariant::Agent => ChatPrompt::History(transcript.turns()),
        ChatVariant::Simple => ChatPrompt::Single(latest),
    }
}
