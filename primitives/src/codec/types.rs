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
//! Type hints and dynamic values.

use serde::{Deserialize, Serialize};

/// Declared shape of a value, as published in runtime metadata.
///
/// Hints deserialize from the descriptor format used by
/// `libtxkit::metadata`, e.g. `"u32"`, `{"fixed_bytes": 32}` or
/// `{"sequence": "compact"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeHint {
    /// One byte, `0` or `1`.
    Bool,
    /// Little-endian `u8`.
    U8,
    /// Little-endian `u16`.
    U16,
    /// Little-endian `u32`.
    U32,
    /// Little-endian `u64`.
    U64,
    /// Little-endian `u128`.
    U128,
    /// Little-endian `i8`.
    I8,
    /// Little-endian `i16`.
    I16,
    /// Little-endian `i32`.
    I32,
    /// Little-endian `i64`.
    I64,
    /// Little-endian `i128`.
    I128,
    /// Compact unsigned integer.
    Compact,
    /// Compact-length-prefixed bytes.
    Bytes,
    /// Compact-length-prefixed UTF-8 text.
    Str,
    /// Fixed-length byte array without a length prefix.
    FixedBytes(usize),
    /// Compact-length-prefixed sequence.
    Sequence(Box<TypeHint>),
    /// Fixed-length sequence without a length prefix.
    Array(usize, Box<TypeHint>),
    /// Tagged union with a one byte discriminant.
    Variant(Vec<VariantHint>),
    /// Struct or tuple, fields concatenated in order.
    Composite(Vec<FieldHint>),
}

/// One arm of a [`TypeHint::Variant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantHint {
    /// Variant name.
    pub name: String,
    /// Discriminant byte.
    pub index: u8,
    /// Payload fields.
    #[serde(default)]
    pub fields: Vec<FieldHint>,
}

/// One field of a [`TypeHint::Composite`] or variant payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHint {
    /// Field name, absent for tuple-like types.
    #[serde(default)]
    pub name: Option<String>,
    /// Field type.
    pub ty: TypeHint,
}

impl FieldHint {
    /// Unnamed field.
    pub fn unnamed(ty: TypeHint) -> Self {
        Self { name: None, ty }
    }

    /// Named field.
    pub fn named(name: &str, ty: TypeHint) -> Self {
        Self {
            name: Some(name.to_string()),
            ty,
        }
    }
}

impl VariantHint {
    /// Variant carrying unnamed fields.
    pub fn new(name: &str, index: u8, fields: Vec<TypeHint>) -> Self {
        Self {
            name: name.to_string(),
            index,
            fields: fields.into_iter().map(FieldHint::unnamed).collect(),
        }
    }
}

impl TypeHint {
    /// 32 byte account identifier.
    pub fn account_id() -> Self {
        TypeHint::FixedBytes(32)
    }

    /// Layout of [`crate::MultiAddress`].
    pub fn multi_address() -> Self {
        TypeHint::Variant(vec![
            VariantHint::new("Id", 0, vec![TypeHint::account_id()]),
            VariantHint::new("Index", 1, vec![TypeHint::Compact]),
            VariantHint::new("Raw", 2, vec![TypeHint::Bytes]),
            VariantHint::new("Address32", 3, vec![TypeHint::FixedBytes(32)]),
            VariantHint::new("Address20", 4, vec![TypeHint::FixedBytes(20)]),
        ])
    }

    /// `Option<T>`: `None` is tag 0, `Some` is tag 1.
    pub fn option(inner: TypeHint) -> Self {
        TypeHint::Variant(vec![
            VariantHint::new("None", 0, vec![]),
            VariantHint::new("Some", 1, vec![inner]),
        ])
    }

    /// Sequence of `inner`.
    pub fn sequence(inner: TypeHint) -> Self {
        TypeHint::Sequence(Box::new(inner))
    }

    /// Short name used in error reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeHint::Bool => "bool",
            TypeHint::U8 => "u8",
            TypeHint::U16 => "u16",
            TypeHint::U32 => "u32",
            TypeHint::U64 => "u64",
            TypeHint::U128 => "u128",
            TypeHint::I8 => "i8",
            TypeHint::I16 => "i16",
            TypeHint::I32 => "i32",
            TypeHint::I64 => "i64",
            TypeHint::I128 => "i128",
            TypeHint::Compact => "compact",
            TypeHint::Bytes => "bytes",
            TypeHint::Str => "str",
            TypeHint::FixedBytes(_) => "fixed bytes",
            TypeHint::Sequence(_) => "sequence",
            TypeHint::Array(_, _) => "array",
            TypeHint::Variant(_) => "variant",
            TypeHint::Composite(_) => "composite",
        }
    }
}

/// A value whose layout is described by a [`TypeHint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Any unsigned integer, fixed width or compact.
    Uint(u128),
    /// Any signed integer.
    Int(i128),
    /// Raw bytes, prefixed or fixed length. Also the only shape of
    /// `u8` sequences and arrays.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Str(String),
    /// Elements of a sequence or array.
    Sequence(Vec<Value>),
    /// Tagged union arm.
    Variant {
        /// Discriminant byte.
        index: u8,
        /// Payload fields in declaration order.
        fields: Vec<Value>,
    },
    /// Struct or tuple fields in declaration order.
    Composite(Vec<Value>),
}

impl Value {
    /// Short name used in error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Uint(_) => "unsigned integer",
            Value::Int(_) => "signed integer",
            Value::Bytes(_) => "bytes",
            Value::Str(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Variant { .. } => "variant",
            Value::Composite(_) => "composite",
        }
    }

    /// `None` arm of an option.
    pub fn none() -> Self {
        Value::Variant {
            index: 0,
            fields: Vec::new(),
        }
    }

    /// `Some` arm of an option.
    pub fn some(inner: Value) -> Self {
        Value::Variant {
            index: 1,
            fields: vec![inner],
        }
    }

    /// Unsigned integer payload, if any.
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Byte payload, if any.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

macro_rules! impl_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v.into())
            }
        })*
    };
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v.into())
            }
        })*
    };
}

impl_from_uint!(u8, u16, u32, u64, u128);
impl_from_int!(i8, i16, i32, i64, i128);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(v: [u8; N]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
