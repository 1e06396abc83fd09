//! Line codec for the MCP stdio transport.
//!
//! One JSON-RPC message per line, UTF-8, `\n` terminated. Blank lines are
//! skipped.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on one inbound line, newline excluded.
pub const MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

/// One inbound line, decoded or not.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Message(Value),
    /// Line that is not UTF-8 JSON, or too large. Carries the reason.
    Malformed(String),
}

/// Read the next non-blank line. Returns `None` on EOF.
///
/// Never buffers more than `MAX_LINE_BYTES + 1` bytes of a line; the rest of
/// an oversized line is skipped.
pub async fn read_frame<R: AsyncBufRead + Unpin>(
    reader: &mut R,
) -> std::io::Result<Option<Frame>> {
    let mut line = Vec::new();
    loop {
        line.clear();
        let limit = MAX_LINE_BYTES as u64 + 1;
        if (&mut *reader).take(limit).read_until(b'\n', &mut line).await? == 0 {
            return Ok(None);
        }

        let terminated = line.last() == Some(&b'\n');
        if terminated {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        if line.len() > MAX_LINE_BYTES {
            skip_line(reader).await?;
            return Ok(Some(Frame::Malformed(format!(
                "Message too large: more than {} bytes",
                MAX_LINE_BYTES
            ))));
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        return Ok(Some(match serde_json::from_slice(&line) {
            Ok(value) => Frame::Message(value),
            Err(e) => Frame::Malformed(e.to_string()),
        }));
    }
}

/// Discard input up to and including the next newline.
async fn skip_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let (consumed, done) = {
            let buf = reader.fill_buf().await?;
            if buf.is_empty() {
                return Ok(());
            }
            match buf.iter().position(|b| *b == b'\n') {
                Some(i) => (i + 1, true),
                None => (buf.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(());
        }
    }
}

/// Write one message as a single line and flush.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &Value,
) -> std::io::Result<()> {
    let mut bytes = serde_json::to_vec(message)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_reads_messages_and_skips_blank_lines() {
        let input = b"{\"id\":1}\n\n   \n{\"id\":2}\n";
        let mut reader = BufReader::new(&input[..]);
        assert_eq!(read_frame(&mut reader).await.unwrap(), Some(Frame::Message(json!({"id": 1}))));
        assert_eq!(read_frame(&mut reader).await.unwrap(), Some(Frame::Message(json!({"id": 2}))));
        assert_eq!(read_frame(&mut reader).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_line_does_not_end_stream() {
        let input = b"{not json\n{\"id\":3}\n";
        let mut reader = BufReader::new(&input[..]);
        assert!(matches!(read_frame(&mut reader).await.unwrap(), Some(Frame::Malformed(_))));
        assert_eq!(read_frame(&mut reader).await.unwrap(), Some(Frame::Message(json!({"id": 3}))));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_malformed() {
        let input = b"\xff\xfe\n{\"id\":5}\n";
        let mut reader = BufReader::new(&input[..]);
        assert!(matches!(read_frame(&mut reader).await.unwrap(), Some(Frame::Malformed(_))));
        assert_eq!(read_frame(&mut reader).await.unwrap(), Some(Frame::Message(json!({"id": 5}))));
    }

    #[tokio::test]
    async fn test_oversized_line_is_skipped() {
        let mut input = vec![b'a'; MAX_LINE_BYTES + 10];
        input.extend_from_slice(b"\n{\"id\":6}\r\n");
        let mut reader = BufReader::new(input.as_slice());
        match read_frame(&mut reader).await.unwrap() {
            Some(Frame::Malformed(reason)) => assert!(reason.starts_with("Message too large")),
            other => panic!("expected malformed frame, got {:?}", other),
        }
        assert_eq!(read_frame(&mut reader).await.unwrap(), Some(Frame::Message(json!({"id": 6}))));
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let input = b"{\"id\":4}";
        let mut reader = BufReader::new(&input[..]);
        assert_eq!(read_frame(&mut reader).await.unwrap(), Some(Frame::Message(json!({"id": 4}))));
    }

    #[tokio::test]
    async fn test_write_is_one_line() {
        let mut out = Vec::new();
        write_frame(&mut out, &json!({"a": "x\ny"})).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.ends_with('\n'));
    }
}
