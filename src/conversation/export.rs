//! CSV export of a conversation.

use std::io;

use super::model::Message;
use crate::error::ExportError;

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "conversation_history.csv";

/// Serialize `messages` as CSV with an `id,sender,content` header.
///
/// Fields are quoted only when they contain a delimiter, quote or line break,
/// and embedded quotes are doubled, so the output parses back to the same
/// values.
pub fn to_csv(messages: &[Message]) -> Result<String, ExportError> {
    let bytes = write_csv(messages, Vec::new())?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

fn write_csv<W: io::Write>(messages: &[Message], out: W) -> Result<W, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    if messages.is_empty() {
        writer.write_record(["id", "sender", "content"])?;
    }
    for message in messages {
        writer.serialize(message)?;
    }

    // A failed final flush is an I/O error, reported like any other CSV write.
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))
}

/// Parse CSV produced by [`to_csv`] back into messages.
pub fn from_csv(text: &str) -> Result<Vec<Message>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let messages = reader.deserialize().collect::<Result<Vec<Message>, _>>()?;
    Ok(messages)
}
