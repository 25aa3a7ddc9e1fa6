// Fossil delta format.
//
// ```text
// <target-length> "\n"
// { <len> ":" <literal bytes> | <len> "@" <offset> "," }*
// <checksum> ";"
// ```
//
// Every integer is a base-64 varint. Literal payloads are raw and may hold
// any byte value.
//
// # Modules
//
// - `varint`   : base-64 digit encoding of unsigned integers
// - `checksum` : 32-bit trailer checksum
// - `command`  : instruction/command types and the command iterator
// - `encoder`  : delta serialisation
// - `decoder`  : command interpretation and target reconstruction

pub mod checksum;
pub mod command;
pub mod decoder;
pub mod encoder;
pub mod varint;

mod reader;

pub use checksum::checksum;
pub use command::{Command, Commands, DeltaStats, Instruction};
pub use decoder::{DecodeError, ErrorKind, decode_memory, parse_header, target_size};
pub use encoder::{DeltaWriter, write_instructions};
