//! The XID value type.
//!
//! Layout (big-endian):
//!
//! ```text
//! | timestamp (4) | machine (3) | pid (2) | counter (3) |
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::codec;

/// Length of the binary form.
pub const RAW_LEN: usize = 12;

/// Errors that can occur when reading an XID back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XidError {
    #[error("malformed xid: {0}")]
    MalformedInput(String),
}

/// A 12-byte, time-sortable identifier.
///
/// Ordering and equality follow the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Xid([u8; RAW_LEN]);

impl Xid {
    /// The all-zero XID.
    pub const NIL: Xid = Xid([0; RAW_LEN]);

    /// Assemble an XID from its four fields. Only the low 24 bits of
    /// `counter` are kept.
    pub fn from_parts(timestamp: u32, machine: [u8; 3], pid: u16, counter: u32) -> Self {
        let mut raw = [0u8; RAW_LEN];
        raw[0..4].copy_from_slice(&timestamp.to_be_bytes());
        raw[4..7].copy_from_slice(&machine);
        raw[7..9].copy_from_slice(&pid.to_be_bytes());
        raw[9..12].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(raw)
    }

    pub const fn from_raw(raw: [u8; RAW_LEN]) -> Self {
        Self(raw)
    }

    /// Read a binary XID; anything other than exactly 12 bytes is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XidError> {
        let raw: [u8; RAW_LEN] = bytes
            .try_into()
            .map_err(|_| XidError::MalformedInput(hex::encode(bytes)))?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; RAW_LEN] {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Unix seconds at generation time.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Generation time as a UTC date-time.
    pub fn time(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(i64::from(self.timestamp()), 0)
            .single()
            .unwrap_or_default()
    }

    pub fn machine(&self) -> [u8; 3] {
        [self.0[4], self.0[5], self.0[6]]
    }

    pub fn pid(&self) -> u16 {
        u16::from_be_bytes([self.0[7], self.0[8]])
    }

    pub fn counter(&self) -> u32 {
        u32::from_be_bytes([0, self.0[9], self.0[10], self.0[11]])
    }

    /// The 20-character text form.
    pub fn encode(&self) -> String {
        let text = codec::encode_text(&self.0);
        // The codec only emits ASCII from its alphabet.
        text.iter().map(|&b| char::from(b)).collect()
    }

    /// Parse the 20-character text form.
    pub fn decode(text: &str) -> Result<Self, XidError> {
        codec::decode_text(text).map(Self)
    }
}

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Xid {
    type Err = XidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl From<Xid> for [u8; RAW_LEN] {
    fn from(id: Xid) -> Self {
        id.0
    }
}

impl Serialize for Xid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Xid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::decode(&text).map_err(serde::de::Error::custom)
    }
}
