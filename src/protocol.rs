// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The messages exchanged between the controller and its workers.
//!
//! Inside a rank, a message is a `Message`.  Between ranks it travels
//! as a `Frame`: a one-byte tag and a flat buffer of integers, the
//! way a message-passing library would carry it.  Frames are decoded
//! exactly once, at the receiving end, and anything that doesn't
//! decode cleanly is refused rather than guessed at.
//!
//! | kind   | tag | data                                  |
//! |--------|-----|---------------------------------------|
//! | Assign | 0   | `[row]`                               |
//! | Finish | 1   | ignored                               |
//! | Result | 2   | `[x0, y0, c0, x1, y1, c1, ...]`       |

use failure::Fail;

/// Tag of a frame carrying a work unit.
pub const ASSIGN_TAG: u8 = 0;
/// Tag of a frame telling a worker to exit.
pub const FINISH_TAG: u8 = 1;
/// Tag of a frame carrying a computed band.
pub const RESULT_TAG: u8 = 2;

/// A message as it travels between ranks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// What kind of message this is.
    pub tag: u8,
    /// The flat payload.
    pub data: Vec<u32>,
}

/// One computed pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Triple {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// The kernel's iteration count for this pixel.
    pub color: u32,
}

/// The closed set of things the controller and a worker can say to
/// each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Controller to worker: compute the band starting at this row.
    Assign(usize),
    /// Worker to controller: the band you asked for, in the order
    /// it was computed.
    Result(Vec<Triple>),
    /// Controller to worker: there is no more work; exit.
    Finish,
}

/// Why a frame could not be decoded.
#[derive(Debug, Fail, PartialEq)]
pub enum DecodeError {
    /// The tag isn't one of ours.
    #[fail(display = "unknown message tag {}", _0)]
    UnknownTag(u8),
    /// An assignment must carry exactly one row index.
    #[fail(display = "assignment carries {} values instead of 1", _0)]
    MalformedAssign(usize),
    /// A result carried the wrong number of values.
    #[fail(
        display = "result carries {} values, expected {}",
        actual, expected
    )]
    MalformedResult {
        /// Three values per pixel of one work unit.
        expected: usize,
        /// What arrived.
        actual: usize,
    },
}

impl Message {
    /// A short name for log lines and error messages.
    pub fn kind(&self) -> &'static str {
        match *self {
            Message::Assign(_) => "assign",
            Message::Result(_) => "result",
            Message::Finish => "finish",
        }
    }

    /// Flattens the message into a frame.
    pub fn encode(&self) -> Frame {
        match *self {
            Message::Assign(row) => Frame {
                tag: ASSIGN_TAG,
                data: vec![row as u32],
            },
            Message::Finish => Frame {
                tag: FINISH_TAG,
                data: vec![],
            },
            Message::Result(ref triples) => {
                let mut data = Vec::with_capacity(triples.len() * 3);
                for t in triples {
                    data.push(t.x as u32);
                    data.push(t.y as u32);
                    data.push(t.color);
                }
                Frame {
                    tag: RESULT_TAG,
                    data,
                }
            }
        }
    }

    /// Rebuilds a message from a frame.  `unit_len` is the number of
    /// triples a result must contain; anything longer or shorter is
    /// refused.
    pub fn decode(frame: Frame, unit_len: usize) -> Result<Message, DecodeError> {
        match frame.tag {
            ASSIGN_TAG => {
                if frame.data.len() != 1 {
                    return Err(DecodeError::MalformedAssign(frame.data.len()));
                }
                Ok(Message::Assign(frame.data[0] as usize))
            }
            // Whatever rides along with a finish is stale.
            FINISH_TAG => Ok(Message::Finish),
            RESULT_TAG => {
                let expected = unit_len * 3;
                if frame.data.len() != expected {
                    return Err(DecodeError::MalformedResult {
                        expected,
                        actual: frame.data.len(),
                    });
                }
                let triples = frame
                    .data
                    .chunks(3)
                    .map(|c| Triple {
                        x: c[0] as usize,
                        y: c[1] as usize,
                        color: c[2],
                    })
                    .collect();
                Ok(Message::Result(triples))
            }
            tag => Err(DecodeError::UnknownTag(tag)),
        }
    }
}
