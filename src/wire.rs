//! Framing of the Scribe `Log` call over the `thrift` binary protocol.
//!
//! The `thrift` crate reads and writes the strict binary message; this
//! module only adds the framed-transport length prefix:
//!
//! ```text
//! [4 bytes: frame length (big-endian)][strict binary message]
//! ```

use bytes::{BufMut, BytesMut};
use thrift::protocol::{
    TBinaryInputProtocol, TBinaryOutputProtocol, TFieldIdentifier, TInputProtocol,
    TListIdentifier, TMessageIdentifier, TMessageType, TOutputProtocol, TStructIdentifier, TType,
};

use crate::error::{LoglensError, Result};

pub const METHOD_LOG: &str = "Log";

/// Upper bound for frames in either direction.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

// message header, method name, argument list header and stops
const CALL_OVERHEAD: usize = 32;
// two field headers, two length prefixes and a struct stop
const ENTRY_OVERHEAD: usize = 15;

/// Scribe `LogEntry { 1: string category, 2: string message }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry<'a> {
    pub category: &'a str,
    pub message: &'a str,
}

/// Decoded answer to a `Log` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Raw `ResultCode` value returned by the collector.
    Success(i32),
    /// `TApplicationException` raised by the collector.
    Exception { kind: i32, message: String },
}

fn thrift_error(e: thrift::Error) -> LoglensError {
    LoglensError::protocol(e.to_string())
}

/// Encode a framed `Log(messages: list<LogEntry>)` call.
///
/// Fails with [`LoglensError::PayloadTooLarge`] before writing anything if
/// the frame would exceed [`MAX_FRAME_SIZE`].
pub fn encode_log_call(seq_id: i32, entries: &[LogEntry<'_>]) -> Result<BytesMut> {
    let size = entries.iter().fold(CALL_OVERHEAD, |acc, e| {
        acc.saturating_add(e.category.len())
            .saturating_add(e.message.len())
            .saturating_add(ENTRY_OVERHEAD)
    });
    if size > MAX_FRAME_SIZE {
        return Err(LoglensError::PayloadTooLarge {
            len: size,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut body = Vec::with_capacity(size);
    write_log_call(&mut body, seq_id, entries).map_err(thrift_error)?;

    let len = u32::try_from(body.len()).map_err(|_| LoglensError::PayloadTooLarge {
        len: body.len(),
        max: MAX_FRAME_SIZE,
    })?;
    let mut frame = BytesMut::with_capacity(4 + body.len());
    frame.put_u32(len);
    frame.extend_from_slice(&body);
    Ok(frame)
}

fn write_log_call(
    out: &mut Vec<u8>,
    seq_id: i32,
    entries: &[LogEntry<'_>],
) -> thrift::Result<()> {
    let mut o = TBinaryOutputProtocol::new(out, true);

    o.write_message_begin(&TMessageIdentifier::new(METHOD_LOG, TMessageType::Call, seq_id))?;
    o.write_struct_begin(&TStructIdentifier::new("Log_args"))?;
    o.write_field_begin(&TFieldIdentifier::new("messages", TType::List, 1))?;
    // bounded by MAX_FRAME_SIZE / ENTRY_OVERHEAD
    o.write_list_begin(&TListIdentifier::new(TType::Struct, entries.len() as i32))?;
    for entry in entries {
        o.write_struct_begin(&TStructIdentifier::new("LogEntry"))?;
        o.write_field_begin(&TFieldIdentifier::new("category", TType::String, 1))?;
        o.write_string(entry.category)?;
        o.write_field_end()?;
        o.write_field_begin(&TFieldIdentifier::new("message", TType::String, 2))?;
        o.write_string(entry.message)?;
        o.write_field_end()?;
        o.write_field_stop()?;
        o.write_struct_end()?;
    }
    o.write_list_end()?;
    o.write_field_end()?;
    o.write_field_stop()?;
    o.write_struct_end()?;
    o.write_message_end()?;
    o.flush()
}

/// Decode the body of a reply frame (length prefix already stripped).
pub fn decode_log_reply(frame: &[u8], expected_seq: i32) -> Result<Reply> {
    let mut i = TBinaryInputProtocol::new(frame, true);

    let header = i.read_message_begin().map_err(thrift_error)?;
    if header.name != METHOD_LOG {
        return Err(LoglensError::protocol(format!(
            "reply for unexpected method `{}`",
            header.name
        )));
    }
    if header.sequence_number != expected_seq {
        return Err(LoglensError::protocol(format!(
            "sequence id mismatch: expected {expected_seq}, got {}",
            header.sequence_number
        )));
    }

    let reply = match header.message_type {
        TMessageType::Reply => read_result(&mut i).map_err(thrift_error)?,
        TMessageType::Exception => {
            let e = thrift::Error::read_application_error_from_in_protocol(&mut i).map_err(thrift_error)?;
            Some(Reply::Exception {
                kind: e.kind as i32,
                message: e.message,
            })
        }
        other => {
            return Err(LoglensError::protocol(format!(
                "unexpected message type {other:?}"
            )))
        }
    };
    i.read_message_end().map_err(thrift_error)?;

    reply.ok_or_else(|| LoglensError::protocol("reply carries no result code"))
}

fn read_result(i: &mut dyn TInputProtocol) -> thrift::Result<Option<Reply>> {
    let mut success = None;
    i.read_struct_begin()?;
    loop {
        let field = i.read_field_begin()?;
        if field.field_type == TType::Stop {
            break;
        }
        match (field.id, field.field_type) {
            (Some(0), TType::I32) => success = Some(i.read_i32()?),
            (_, field_type) => i.skip(field_type)?,
        }
        i.read_field_end()?;
    }
    i.read_struct_end()?;
    Ok(success.map(Reply::Success))
}
