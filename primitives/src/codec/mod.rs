///////////////////////////////////////////////////////////////////////////////
//
//  Copyright 2018-2026 Robonomics Network <research@robonomics.network>
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
//
///////////////////////////////////////////////////////////////////////////////
//! Metadata-driven SCALE codec.
//!
//! Runtime call arguments and storage keys are only described by metadata, so
//! their encoding cannot go through a `#[derive(Encode)]` type. This module
//! encodes a [`Value`] tree against a [`TypeHint`] and decodes bytes back into
//! values, reporting how many bytes were consumed.
//!
//! Wire rules:
//!
//! ```text
//! fixed-width integers   little-endian
//! compact integers       0b00 single byte, 0b01 two bytes, 0b10 four bytes,
//!                        0b11 big-integer mode: (len - 4) << 2 | 0b11 ++ bytes
//! bool                   0x00 | 0x01
//! bytes, str, sequence   compact(len) ++ elements
//! fixed bytes, array     elements only
//! variant                index byte ++ fields
//! composite              fields in declaration order
//! ```
//!
//! Statically typed values (anything implementing `parity_scale_codec::Decode`)
//! go through [`decode_exact`], [`decode_prefix`] and [`decode_tagged`] which map
//! failures onto the same [`CodecError`] taxonomy.

mod error;
mod types;

pub use error::{CodecError, Result};
pub use types::{FieldHint, TypeHint, Value, VariantHint};

use parity_scale_codec::{Compact, Decode, Encode, Input};

/// Encode `value` as `hint`.
pub fn encode(value: &Value, hint: &TypeHint) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_to(value, hint, &mut out)?;
    Ok(out)
}

/// Encode `value` as `hint`, appending to `out`.
///
/// On error `out` may hold a partial encoding.
pub fn encode_to(value: &Value, hint: &TypeHint, out: &mut Vec<u8>) -> Result<()> {
    match (hint, value) {
        (TypeHint::Bool, Value::Bool(b)) => b.encode_to(out),
        (TypeHint::U8, Value::Uint(v)) => narrow::<u8>(*v, hint)?.encode_to(out),
        (TypeHint::U16, Value::Uint(v)) => narrow::<u16>(*v, hint)?.encode_to(out),
        (TypeHint::U32, Value::Uint(v)) => narrow::<u32>(*v, hint)?.encode_to(out),
        (TypeHint::U64, Value::Uint(v)) => narrow::<u64>(*v, hint)?.encode_to(out),
        (TypeHint::U128, Value::Uint(v)) => v.encode_to(out),
        (TypeHint::I8, Value::Int(v)) => narrow_signed::<i8>(*v, hint)?.encode_to(out),
        (TypeHint::I16, Value::Int(v)) => narrow_signed::<i16>(*v, hint)?.encode_to(out),
        (TypeHint::I32, Value::Int(v)) => narrow_signed::<i32>(*v, hint)?.encode_to(out),
        (TypeHint::I64, Value::Int(v)) => narrow_signed::<i64>(*v, hint)?.encode_to(out),
        (TypeHint::I128, Value::Int(v)) => v.encode_to(out),
        (TypeHint::Compact, Value::Uint(v)) => Compact(*v).encode_to(out),
        (TypeHint::Bytes, Value::Bytes(bytes)) => bytes.encode_to(out),
        (TypeHint::Str, Value::Str(text)) => text.encode_to(out),
        (TypeHint::FixedBytes(len), Value::Bytes(bytes)) => {
            expect_len(*len, bytes.len())?;
            out.extend_from_slice(bytes);
        }
        (TypeHint::Sequence(inner), Value::Bytes(bytes)) if **inner == TypeHint::U8 => {
            bytes.encode_to(out)
        }
        // Byte-wide sequences and arrays only take `Value::Bytes`, the shape
        // they decode to.
        (TypeHint::Sequence(inner), Value::Sequence(items)) if **inner != TypeHint::U8 => {
            compact_len(items.len())?.encode_to(out);
            for item in items {
                encode_to(item, inner, out)?;
            }
        }
        (TypeHint::Array(len, inner), Value::Sequence(items)) if **inner != TypeHint::U8 => {
            expect_len(*len, items.len())?;
            for item in items {
                encode_to(item, inner, out)?;
            }
        }
        (TypeHint::Array(len, inner), Value::Bytes(bytes)) if **inner == TypeHint::U8 => {
            expect_len(*len, bytes.len())?;
            out.extend_from_slice(bytes);
        }
        (TypeHint::Variant(variants), Value::Variant { index, fields }) => {
            let variant = variants.iter().find(|v| v.index == *index).ok_or_else(|| {
                CodecError::InvalidDiscriminant {
                    type_name: variant_names(variants),
                    value: *index,
                }
            })?;
            expect_len(variant.fields.len(), fields.len())?;
            out.push(*index);
            for (field, value) in variant.fields.iter().zip(fields) {
                encode_to(value, &field.ty, out)?;
            }
        }
        (TypeHint::Composite(hints), Value::Composite(values)) => {
            expect_len(hints.len(), values.len())?;
            for (field, value) in hints.iter().zip(values) {
                encode_to(value, &field.ty, out)?;
            }
        }
        (hint, value) => {
            return Err(CodecError::TypeMismatch {
                expected: hint.type_name(),
                found: value.kind(),
            })
        }
    }
    Ok(())
}

/// Decode one `hint` value from the front of `bytes`.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode(bytes: &[u8], hint: &TypeHint) -> Result<(Value, usize)> {
    let mut reader = Reader::new(bytes);
    let value = reader.value(hint)?;
    Ok((value, reader.offset))
}

/// Decode a `hint` value that must span all of `bytes`.
pub fn decode_all(bytes: &[u8], hint: &TypeHint) -> Result<Value> {
    let (value, consumed) = decode(bytes, hint)?;
    match bytes.len() - consumed {
        0 => Ok(value),
        rest => Err(CodecError::TrailingBytes(rest)),
    }
}

/// Number of bytes a compact integer occupies, judged from its first byte.
pub fn compact_encoded_len(first: u8) -> usize {
    match first & 0b11 {
        0b00 => 1,
        0b01 => 2,
        0b10 => 4,
        _ => (first >> 2) as usize + 5,
    }
}

/// Decode a statically typed value that must span all of `bytes`.
pub fn decode_exact<T: Decode>(bytes: &[u8]) -> Result<T> {
    let (value, consumed) = decode_prefix::<T>(bytes)?;
    match bytes.len() - consumed {
        0 => Ok(value),
        rest => Err(CodecError::TrailingBytes(rest)),
    }
}

/// Decode a statically typed value from the front of `bytes`.
pub fn decode_prefix<T: Decode>(bytes: &[u8]) -> Result<(T, usize)> {
    let mut input = TrackingInput::new(bytes);
    match T::decode(&mut input) {
        Ok(value) => Ok((value, bytes.len() - input.rest.len())),
        Err(_) => Err(match input.exhausted {
            Some((needed, available)) => CodecError::Truncated { needed, available },
            None => CodecError::Malformed {
                type_name: std::any::type_name::<T>().to_string(),
            },
        }),
    }
}

/// Types whose encoding starts with a variant tag.
pub trait Tagged {
    /// Type name used in error reports.
    const NAME: &'static str;

    /// Whether `tag` selects a variant of this type.
    fn is_known_tag(tag: u8) -> bool;
}

/// [`decode_exact`] that reports unknown tags as [`CodecError::InvalidDiscriminant`].
pub fn decode_tagged<T: Decode + Tagged>(bytes: &[u8]) -> Result<T> {
    let (value, consumed) = decode_tagged_prefix::<T>(bytes)?;
    match bytes.len() - consumed {
        0 => Ok(value),
        rest => Err(CodecError::TrailingBytes(rest)),
    }
}

/// [`decode_prefix`] that reports unknown tags as [`CodecError::InvalidDiscriminant`].
pub fn decode_tagged_prefix<T: Decode + Tagged>(bytes: &[u8]) -> Result<(T, usize)> {
    let tag = *bytes.first().ok_or(CodecError::Truncated {
        needed: 1,
        available: 0,
    })?;
    if !T::is_known_tag(tag) {
        return Err(CodecError::InvalidDiscriminant {
            type_name: T::NAME.to_string(),
            value: tag,
        });
    }
    decode_prefix(bytes)
}

/// Parse `0x`-prefixed or bare hex.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    Ok(hex::decode(digits)?)
}

/// Render bytes as `0x`-prefixed hex.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn narrow<T: TryFrom<u128>>(value: u128, hint: &TypeHint) -> Result<T> {
    T::try_from(value).map_err(|_| CodecError::OutOfRange {
        type_name: hint.type_name(),
    })
}

fn narrow_signed<T: TryFrom<i128>>(value: i128, hint: &TypeHint) -> Result<T> {
    T::try_from(value).map_err(|_| CodecError::OutOfRange {
        type_name: hint.type_name(),
    })
}

fn expect_len(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(CodecError::LengthMismatch { expected, found })
    }
}

fn compact_len(len: usize) -> Result<Compact<u32>> {
    u32::try_from(len)
        .map(Compact)
        .map_err(|_| CodecError::OutOfRange {
            type_name: "sequence length",
        })
}

fn variant_names(variants: &[VariantHint]) -> String {
    let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
    names.join(" | ")
}

/// Cursor over the input of a dynamic decode.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if needed > available {
            return Err(CodecError::Truncated { needed, available });
        }
        let chunk = &self.bytes[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(chunk)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn fixed<T: Decode>(&mut self, size: usize) -> Result<T> {
        let mut chunk = self.take(size)?;
        T::decode(&mut chunk).map_err(|_| CodecError::Malformed {
            type_name: std::any::type_name::<T>().to_string(),
        })
    }

    fn compact(&mut self) -> Result<u128> {
        let first = *self
            .bytes
            .get(self.offset)
            .ok_or(CodecError::Truncated {
                needed: 1,
                available: 0,
            })?;
        let size = compact_encoded_len(first);
        // 1 prefix byte + 16 bytes is the widest u128 encoding
        if size > 17 {
            return Err(CodecError::OutOfRange {
                type_name: "compact",
            });
        }
        let mut chunk = self.take(size)?;
        Compact::<u128>::decode(&mut chunk)
            .map(|c| c.0)
            .map_err(|_| CodecError::NonCanonical)
    }

    fn length(&mut self) -> Result<usize> {
        let len = self.compact()?;
        usize::try_from(len).map_err(|_| CodecError::OutOfRange {
            type_name: "sequence length",
        })
    }

    fn value(&mut self, hint: &TypeHint) -> Result<Value> {
        let value = match hint {
            TypeHint::Bool => match self.byte()? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                value => {
                    return Err(CodecError::InvalidDiscriminant {
                        type_name: "bool".to_string(),
                        value,
                    })
                }
            },
            TypeHint::U8 => Value::Uint(self.byte()?.into()),
            TypeHint::U16 => Value::Uint(self.fixed::<u16>(2)?.into()),
            TypeHint::U32 => Value::Uint(self.fixed::<u32>(4)?.into()),
            TypeHint::U64 => Value::Uint(self.fixed::<u64>(8)?.into()),
            TypeHint::U128 => Value::Uint(self.fixed::<u128>(16)?),
            TypeHint::I8 => Value::Int(self.fixed::<i8>(1)?.into()),
            TypeHint::I16 => Value::Int(self.fixed::<i16>(2)?.into()),
            TypeHint::I32 => Value::Int(self.fixed::<i32>(4)?.into()),
            TypeHint::I64 => Value::Int(self.fixed::<i64>(8)?.into()),
            TypeHint::I128 => Value::Int(self.fixed::<i128>(16)?),
            TypeHint::Compact => Value::Uint(self.compact()?),
            TypeHint::Bytes => {
                let len = self.length()?;
                Value::Bytes(self.take(len)?.to_vec())
            }
            TypeHint::Str => {
                let len = self.length()?;
                let raw = self.take(len)?.to_vec();
                Value::Str(String::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8)?)
            }
            TypeHint::FixedBytes(len) => Value::Bytes(self.take(*len)?.to_vec()),
            TypeHint::Sequence(inner) if **inner == TypeHint::U8 => {
                let len = self.length()?;
                Value::Bytes(self.take(len)?.to_vec())
            }
            TypeHint::Sequence(inner) => {
                let len = self.length()?;
                self.elements(len, inner)?
            }
            TypeHint::Array(len, inner) if **inner == TypeHint::U8 => {
                Value::Bytes(self.take(*len)?.to_vec())
            }
            TypeHint::Array(len, inner) => self.elements(*len, inner)?,
            TypeHint::Variant(variants) => {
                let index = self.byte()?;
                let variant = variants.iter().find(|v| v.index == index).ok_or_else(|| {
                    CodecError::InvalidDiscriminant {
                        type_name: variant_names(variants),
                        value: index,
                    }
                })?;
                let fields = variant
                    .fields
                    .iter()
                    .map(|field| self.value(&field.ty))
                    .collect::<Result<Vec<_>>>()?;
                Value::Variant { index, fields }
            }
            TypeHint::Composite(hints) => Value::Composite(
                hints
                    .iter()
                    .map(|field| self.value(&field.ty))
                    .collect::<Result<Vec<_>>>()?,
            ),
        };
        Ok(value)
    }

    fn elements(&mut self, len: usize, inner: &TypeHint) -> Result<Value> {
        // Never trust the declared length for preallocation.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(self.value(inner)?);
        }
        Ok(Value::Sequence(items))
    }
}

/// `Input` that remembers whether a read ran past the end.
struct TrackingInput<'a> {
    rest: &'a [u8],
    exhausted: Option<(usize, usize)>,
}

impl<'a> TrackingInput<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            rest: bytes,
            exhausted: None,
        }
    }
}

impl Input for TrackingInput<'_> {
    fn remaining_len(&mut self) -> std::result::Result<Option<usize>, parity_scale_codec::Error> {
        // Unknown length makes vector decoding read element by element, so
        // truncation always surfaces through `read`.
        Ok(None)
    }

    fn read(&mut self, into: &mut [u8]) -> std::result::Result<(), parity_scale_codec::Error> {
        if into.len() > self.rest.len() {
            self.exhausted = Some((into.len(), self.rest.len()));
            return Err("Not enough data to fill buffer".into());
        }
        let (head, tail) = self.rest.split_at(into.len());
        into.copy_from_slice(head);
        self.rest = tail;
        Ok(())
    }
}
