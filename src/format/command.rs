// Delta commands.
//
// `Instruction` is what the match engine produces before serialisation: it
// refers to target bytes by length only. `Command` is what a parsed delta
// contains: literal payloads borrow directly from the delta buffer.

use std::fmt;

use super::decoder::DecodeError;
use super::reader::{Reader, read_header};

/// An encoder instruction, consumed in order against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Emit the next `len` target bytes literally.
    Insert { len: usize },
    /// Reuse `len` source bytes starting at `offset`.
    Copy { len: usize, offset: usize },
}

impl Instruction {
    /// Number of target bytes this instruction produces.
    #[inline]
    pub fn len(&self) -> usize {
        match *self {
            Self::Insert { len } | Self::Copy { len, .. } => len,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A parsed delta command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Insert(&'a [u8]),
    Copy { len: u64, offset: u64 },
    Checksum(u64),
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(data) => write!(f, "INSERT {}", data.len()),
            Self::Copy { len, offset } => write!(f, "COPY   {len} @ {offset}"),
            Self::Checksum(value) => write!(f, "CKSUM  {value:#010x}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Command iterator
// ---------------------------------------------------------------------------

/// Iterates the commands of a delta without applying them.
///
/// Structural errors are yielded once as `Err` and end the iteration. Size,
/// source bounds and checksum are not checked here; that is the decoder's job.
#[derive(Debug, Clone)]
pub struct Commands<'a> {
    reader: Reader<'a>,
    target_len: u64,
    done: bool,
}

impl<'a> Commands<'a> {
    /// Parse the header of `delta` and position the iterator on its first command.
    pub fn new(delta: &'a [u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(delta);
        let target_len = read_header(&mut reader)?;
        Ok(Self {
            reader,
            target_len,
            done: false,
        })
    }

    /// Target length declared in the header.
    pub fn target_len(&self) -> u64 {
        self.target_len
    }

    /// Offset of the next unread byte in the delta.
    pub fn position(&self) -> usize {
        self.reader.pos()
    }

    fn parse_next(&mut self) -> Result<Command<'a>, DecodeError> {
        if !self.reader.has_bytes() {
            return Err(DecodeError::Unterminated);
        }
        let cnt = self.reader.read_int()?;
        let op_pos = self.reader.pos();
        match self.reader.read_byte() {
            Some(b'@') => {
                let offset = self.reader.read_int()?;
                if self.reader.has_bytes() && self.reader.read_byte() != Some(b',') {
                    return Err(DecodeError::CopyNotTerminated);
                }
                Ok(Command::Copy { len: cnt, offset })
            }
            Some(b':') => {
                let remaining = self.reader.remaining();
                self.reader
                    .take(cnt)
                    .map(Command::Insert)
                    .ok_or(DecodeError::InsertOutOfBounds {
                        len: cnt,
                        remaining,
                    })
            }
            Some(b';') => Ok(Command::Checksum(cnt)),
            Some(op) => Err(DecodeError::UnknownOperator { op, pos: op_pos }),
            None => Err(DecodeError::Unterminated),
        }
    }
}

impl<'a> Iterator for Commands<'a> {
    type Item = Result<Command<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.parse_next();
        if matches!(item, Ok(Command::Checksum(_)) | Err(_)) {
            self.done = true;
        }
        Some(item)
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Aggregate view of a delta's command stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaStats {
    pub target_len: u64,
    pub delta_len: usize,
    pub inserts: u64,
    pub copies: u64,
    pub literal_bytes: u64,
    pub copied_bytes: u64,
    pub checksum: u64,
}

impl DeltaStats {
    /// Walk every command of `delta`.
    pub fn from_delta(delta: &[u8]) -> Result<Self, DecodeError> {
        let mut commands = Commands::new(delta)?;
        let mut stats = Self {
            target_len: commands.target_len(),
            delta_len: delta.len(),
            ..Default::default()
        };
        for cmd in &mut commands {
            match cmd? {
                Command::Insert(data) => {
                    stats.inserts += 1;
                    stats.literal_bytes += data.len() as u64;
                }
                Command::Copy { len, .. } => {
                    stats.copies += 1;
                    stats.copied_bytes = stats.copied_bytes.saturating_add(len);
                }
                Command::Checksum(value) => stats.checksum = value,
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterate_known_delta() {
        let delta = b"11\nW@W,1:bW@W,1t5XOG;";
        let commands = Commands::new(delta).unwrap();
        assert_eq!(commands.target_len(), 65);
        let cmds: Vec<_> = commands.collect::<Result<_, _>>().unwrap();
        assert_eq!(
            cmds,
            vec![
                Command::Copy {
                    len: 32,
                    offset: 32
                },
                Command::Insert(b"b"),
                Command::Copy {
                    len: 32,
                    offset: 32
                },
                Command::Checksum(crate::format::checksum::checksum(
                    &[&[b'a'; 32][..], &b"b"[..], &[b'a'; 32][..]].concat()
                ) as u64),
            ]
        );
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut it = Commands::new(b"3\n3#abc").unwrap();
        assert!(matches!(
            it.next(),
            Some(Err(DecodeError::UnknownOperator { op: b'#', .. }))
        ));
        assert!(it.next().is_none());
    }

    #[test]
    fn missing_trailer_is_reported() {
        let results: Vec<_> = Commands::new(b"3\n3:abc").unwrap().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1], Err(DecodeError::Unterminated));
    }

    #[test]
    fn stats_summarise_commands() {
        let stats = DeltaStats::from_delta(b"11\nW@W,1:bW@W,1t5XOG;").unwrap();
        assert_eq!(stats.target_len, 65);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.copies, 2);
        assert_eq!(stats.literal_bytes, 1);
        assert_eq!(stats.copied_bytes, 64);
        assert_eq!(stats.delta_len, 21);
    }

    #[test]
    fn display() {
        assert_eq!(Command::Insert(b"xyz").to_string(), "INSERT 3");
        assert_eq!(
            Command::Copy { len: 5, offset: 7 }.to_string(),
            "COPY   5 @ 7"
        );
        assert_eq!(Command::Checksum(255).to_string(), "CKSUM  0x000000ff");
    }
}
