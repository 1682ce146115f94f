/*!
# Comm module
Point-to-point message passing between the ranks of a fixed group.
Ranks never share memory; everything a rank learns about another rank's progress arrives as a tagged message.

The `Communicator` trait is the seam the wavefront code is written against.
`LocalComm` implements it for a group of ranks that live on threads of one OS process.
With the `mpi` feature enabled, `MpiComm` implements it for separate OS processes started by `mpirun`.

## Example usage
```rust
use lcs_wavefront::comm::{Communicator, Tag};
use lcs_wavefront::comm::local::local_group;

let mut group = local_group(2);
let mut rank1 = group.pop().unwrap();
let rank0 = group.pop().unwrap();

// messages with different tags never get confused, even when they arrive out of order
rank0.send_scores(1, Tag::Vertical, vec![1, 2, 3]).unwrap();
rank0.send_scores(1, Tag::Horizontal, vec![4, 5, 6, 7]).unwrap();
assert_eq!(rank1.recv_scores(0, Tag::Horizontal, 4).unwrap(), vec![4, 5, 6, 7]);
assert_eq!(rank1.recv_scores(0, Tag::Vertical, 3).unwrap(), vec![1, 2, 3]);
```
*/
/// In-process rank group backed by channels
pub mod local;
/// One rank per OS process, backed by MPI
#[cfg(feature = "mpi")]
pub mod mpi;

use crate::data_types::score_grid::ScoreType;

/// The rank that loads inputs, gathers the final score, and reconstructs the matrix
pub const ROOT_RANK: usize = 0;

/// Message tags; each channel of the protocol has its own so messages are never confused.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Tag {
    /// Bottom row of a block, sent to the block below
    Horizontal,
    /// Right column of a block, sent to the block to the right
    Vertical,
    /// Startup broadcast of the two sequence lengths
    Lengths,
    /// Startup broadcast of sequence contents
    Symbols,
    /// The final score, forwarded to the root by the owner of the last block
    FinalScore,
    /// Per-rank work counters, gathered on the root after the sweep
    RankSummary,
    /// One row of the score matrix for debug reconstruction, tagged by its row index
    Reconstruction(usize)
}

impl Tag {
    /// Numeric tag value, used for logging and as the MPI tag
    pub fn raw(&self) -> usize {
        match self {
            Tag::Horizontal => 0,
            Tag::Vertical => 1,
            Tag::Lengths => 100,
            Tag::Symbols => 101,
            Tag::FinalScore => 102,
            Tag::RankSummary => 103,
            Tag::Reconstruction(row) => 200 + row
        }
    }

    /// The kind of payload every message with this tag carries
    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            Tag::Horizontal | Tag::Vertical | Tag::FinalScore | Tag::Reconstruction(_) => PayloadKind::Scores,
            Tag::Lengths | Tag::RankSummary => PayloadKind::Counts,
            Tag::Symbols => PayloadKind::Symbols
        }
    }
}

/// Element type of a payload, for transports that must know it before receiving
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    Scores,
    Counts,
    Symbols
}

impl PayloadKind {
    pub fn name(&self) -> &'static str {
        match self {
            PayloadKind::Scores => "scores",
            PayloadKind::Counts => "counts",
            PayloadKind::Symbols => "symbols"
        }
    }
}

/// Contents of a message; the sender's buffer is moved into the message and handed to the receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Fixed-width score elements
    Scores(Vec<ScoreType>),
    /// Counts, such as sequence lengths
    Counts(Vec<u64>),
    /// Raw sequence symbols
    Symbols(Vec<u8>)
}

impl Payload {
    /// Short name for error messages
    pub fn kind(&self) -> &'static str {
        self.payload_kind().name()
    }

    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            Payload::Scores(_) => PayloadKind::Scores,
            Payload::Counts(_) => PayloadKind::Counts,
            Payload::Symbols(_) => PayloadKind::Symbols
        }
    }

    /// Number of elements carried
    pub fn len(&self) -> usize {
        match self {
            Payload::Scores(v) => v.len(),
            Payload::Counts(v) => v.len(),
            Payload::Symbols(v) => v.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CommError {
    #[error("rank {rank} is outside of the group of size {size}")]
    InvalidRank { rank: usize, size: usize },
    #[error("rank {peer} is no longer reachable")]
    Disconnected { peer: usize },
    #[error("the process group was aborted")]
    Aborted,
    #[error("expected {expected} payload for tag {tag:?} from rank {src}, received {found}")]
    UnexpectedPayload { src: usize, tag: Tag, expected: &'static str, found: &'static str },
    #[error("expected {expected} elements for tag {tag:?} from rank {src}, received {found}")]
    LengthMismatch { src: usize, tag: Tag, expected: usize, found: usize },
    #[error("tag {tag:?} does not fit in a transport tag")]
    TagOutOfRange { tag: Tag },
    #[error("the message passing runtime could not be initialized")]
    InitFailed,
}

/// Explicit communication context for one rank: its identity, the group size, and the messaging primitives.
pub trait Communicator {
    /// This rank's index in the group
    fn rank(&self) -> usize;

    /// Number of ranks in the group
    fn size(&self) -> usize;

    /// Sends a message; never blocks on the receiver.
    /// Sending to yourself is legal and is delivered locally.
    /// # Errors
    /// * if `dest` is outside the group, the group was aborted, or the peer is gone
    fn send(&self, dest: usize, tag: Tag, payload: Payload) -> Result<(), CommError>;

    /// Blocks until a message with `tag` from `src` arrives.
    /// Messages from one sender with one tag arrive in the order they were sent.
    /// # Errors
    /// * if `src` is outside the group or the group gets aborted while waiting
    fn recv(&mut self, src: usize, tag: Tag) -> Result<Payload, CommError>;

    /// Tears down the whole group; every blocked or future receive fails with `CommError::Aborted`.
    fn abort(&self);

    /// Returns true if this rank is the root
    fn is_root(&self) -> bool {
        self.rank() == ROOT_RANK
    }

    /// Sends score elements
    fn send_scores(&self, dest: usize, tag: Tag, scores: Vec<ScoreType>) -> Result<(), CommError> {
        self.send(dest, tag, Payload::Scores(scores))
    }

    /// Receives exactly `expected_len` score elements
    /// # Errors
    /// * if the payload is not scores, or has the wrong length
    fn recv_scores(&mut self, src: usize, tag: Tag, expected_len: usize) -> Result<Vec<ScoreType>, CommError> {
        match self.recv(src, tag)? {
            Payload::Scores(scores) => {
                if scores.len() != expected_len {
                    return Err(CommError::LengthMismatch { src, tag, expected: expected_len, found: scores.len() });
                }
                Ok(scores)
            },
            other => Err(CommError::UnexpectedPayload { src, tag, expected: "scores", found: other.kind() })
        }
    }

    /// Sends counts
    fn send_counts(&self, dest: usize, tag: Tag, counts: Vec<u64>) -> Result<(), CommError> {
        self.send(dest, tag, Payload::Counts(counts))
    }

    /// Receives exactly `expected_len` counts
    /// # Errors
    /// * if the payload is not counts, or has the wrong length
    fn recv_counts(&mut self, src: usize, tag: Tag, expected_len: usize) -> Result<Vec<u64>, CommError> {
        match self.recv(src, tag)? {
            Payload::Counts(counts) => {
                if counts.len() != expected_len {
                    return Err(CommError::LengthMismatch { src, tag, expected: expected_len, found: counts.len() });
                }
                Ok(counts)
            },
            other => Err(CommError::UnexpectedPayload { src, tag, expected: "counts", found: other.kind() })
        }
    }

    /// Broadcasts counts from `root`; the value passed on other ranks is ignored.
    fn broadcast_counts(&mut self, root: usize, counts: Vec<u64>) -> Result<Vec<u64>, CommError> {
        if self.rank() == root {
            for dest in (0..self.size()).filter(|&r| r != root) {
                self.send(dest, Tag::Lengths, Payload::Counts(counts.clone()))?;
            }
            Ok(counts)
        } else {
            match self.recv(root, Tag::Lengths)? {
                Payload::Counts(counts) => Ok(counts),
                other => Err(CommError::UnexpectedPayload { src: root, tag: Tag::Lengths, expected: "counts", found: other.kind() })
            }
        }
    }

    /// Broadcasts symbols from `root`; the value passed on other ranks is ignored.
    fn broadcast_symbols(&mut self, root: usize, symbols: Vec<u8>) -> Result<Vec<u8>, CommError> {
        if self.rank() == root {
            for dest in (0..self.size()).filter(|&r| r != root) {
                self.send(dest, Tag::Symbols, Payload::Symbols(symbols.clone()))?;
            }
            Ok(symbols)
        } else {
            match self.recv(root, Tag::Symbols)? {
                Payload::Symbols(symbols) => Ok(symbols),
                other => Err(CommError::UnexpectedPayload { src: root, tag: Tag::Symbols, expected: "symbols", found: other.kind() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_distinct() {
        let tags = [
            Tag::Horizontal, Tag::Vertical, Tag::Lengths, Tag::Symbols, Tag::FinalScore, Tag::RankSummary,
            Tag::Reconstruction(0), Tag::Reconstruction(1)
        ];
        let raw: std::collections::BTreeSet<usize> = tags.iter().map(|t| t.raw()).collect();
        assert_eq!(raw.len(), tags.len());
        assert_eq!(Tag::Reconstruction(5).raw(), 205);
    }

    #[test]
    fn test_payload() {
        let payload = Payload::Scores(vec![1, 2]);
        assert_eq!(payload.kind(), "scores");
        assert_eq!(payload.len(), 2);
        assert!(Payload::Symbols(vec![]).is_empty());
        assert_eq!(Payload::Counts(vec![3]).kind(), "counts");
        assert_eq!(Payload::Symbols(vec![b'A']).payload_kind(), PayloadKind::Symbols);
    }

    #[test]
    fn test_tag_payload_kinds() {
        assert_eq!(Tag::Horizontal.payload_kind(), PayloadKind::Scores);
        assert_eq!(Tag::Vertical.payload_kind(), PayloadKind::Scores);
        assert_eq!(Tag::FinalScore.payload_kind(), PayloadKind::Scores);
        assert_eq!(Tag::Reconstruction(9).payload_kind(), PayloadKind::Scores);
        assert_eq!(Tag::Lengths.payload_kind(), PayloadKind::Counts);
        assert_eq!(Tag::RankSummary.payload_kind(), PayloadKind::Counts);
        assert_eq!(Tag::Symbols.payload_kind(), PayloadKind::Symbols);
    }
}
