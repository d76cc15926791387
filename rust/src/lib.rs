//! xid: compact, globally unique, time-sortable identifiers.
//!
//! An XID is 12 bytes: a 4-byte Unix-second timestamp, a 3-byte machine
//! discriminator, a 2-byte process discriminator and a 3-byte counter, all
//! big-endian. Its text form is 20 lowercase base32hex symbols that sort in
//! the same order as the raw bytes.
//!
//! # Format
//!
//! ```text
//! XID  ::= TIMESTAMP(4) MACHINE(3) PID(2) COUNTER(3)
//! TEXT ::= [0-9a-v]{19} [0g]
//! ```
//!
//! # Example
//!
//! ```
//! use xid::{Xid, new_xid};
//!
//! let id = new_xid();
//! let text = id.to_string(); // e.g. "d0jkc5s6n88c72a20lpg"
//! assert_eq!(text.len(), 20);
//! assert_eq!(text.parse::<Xid>().unwrap(), id);
//! ```

mod codec;
mod counter;
mod generator;
mod render;
mod seed;
mod xid;

pub use codec::{ENCODING, TEXT_LEN, decode_text, encode_text, validate};
pub use counter::{COUNTER_MASK, Counter};
pub use generator::{SystemClock, TimeSource, XidGen, new_xid};
pub use render::{OutputFormat, XidFields, write_fields, write_generated, write_verbose};
pub use seed::IdentitySeed;
pub use xid::{RAW_LEN, Xid, XidError};
