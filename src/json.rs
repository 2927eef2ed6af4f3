//! Canonical JSON encoding for signed request bodies.
//!
//! KuCoin verifies the signature over the exact bytes it receives, so the body
//! has to be produced once and reused verbatim for both signing and sending.
//! The encoding uses `", "` between members, `": "` between a key and its
//! value, and escapes every character outside printable ASCII as `\uXXXX`
//! UTF-16 code units (control characters keep their short escapes).
//! Key order follows field declaration order of the serialized type.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::Result;
use crate::error::{Error, Kind};

/// [`Formatter`] producing the spaced, ASCII-only layout described above.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let bytes = fragment.as_bytes();
        let mut units = [0_u16; 2];
        let mut start = 0;

        for (idx, ch) in fragment.char_indices() {
            if matches!(ch, ' '..='~') {
                continue;
            }
            writer.write_all(&bytes[start..idx])?;
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + ch.len_utf8();
        }

        writer.write_all(&bytes[start..])
    }
}

/// Serializes `value` with [`CanonicalFormatter`].
pub fn to_canonical_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::with_source(Kind::Internal, e))?;

    String::from_utf8(buf).map_err(|e| Error::with_source(Kind::Internal, e))
}
