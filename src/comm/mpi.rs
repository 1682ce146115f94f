use log::trace;
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::{Communicator as MpiCommunicator, Destination, Source};
use rustc_hash::FxHashMap as HashMap;
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::comm::{CommError, Communicator, Payload, PayloadKind, Tag};
use crate::data_types::score_grid::ScoreType;

/// Converts a protocol tag into an MPI tag
fn mpi_tag(tag: Tag) -> Result<mpi::Tag, CommError> {
    mpi::Tag::try_from(tag.raw()).map_err(|_| CommError::TagOutOfRange { tag })
}

/// One rank of an `mpirun` launched job, talking to the others over `MPI_COMM_WORLD`.
/// Messages a rank sends to itself never reach MPI; they are queued per tag and handed back by `recv`.
pub struct MpiComm {
    /// The world communicator, dropped before the universe
    world: SimpleCommunicator,
    /// Finalizes MPI when dropped
    _universe: Universe,
    /// This rank
    rank: usize,
    /// Number of ranks
    size: usize,
    /// Messages sent to ourselves, in send order per tag
    loopback: RefCell<HashMap<Tag, VecDeque<Payload>>>
}

impl MpiComm {
    /// Initializes MPI and attaches to the world communicator.
    /// # Errors
    /// * if MPI was already initialized in this process
    pub fn initialize() -> Result<Self, CommError> {
        let universe = mpi::initialize().ok_or(CommError::InitFailed)?;
        let world = universe.world();
        let rank = usize::try_from(world.rank()).map_err(|_| CommError::InitFailed)?;
        let size = usize::try_from(world.size()).map_err(|_| CommError::InitFailed)?;
        Ok(Self {
            world,
            _universe: universe,
            rank,
            size,
            loopback: Default::default()
        })
    }

    fn check_rank(&self, rank: usize) -> Result<mpi::Rank, CommError> {
        if rank < self.size {
            mpi::Rank::try_from(rank).map_err(|_| CommError::InvalidRank { rank, size: self.size })
        } else {
            Err(CommError::InvalidRank { rank, size: self.size })
        }
    }
}

impl Communicator for MpiComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: usize, tag: Tag, payload: Payload) -> Result<(), CommError> {
        let dest_rank = self.check_rank(dest)?;
        let raw_tag = mpi_tag(tag)?;
        if payload.payload_kind() != tag.payload_kind() {
            return Err(CommError::UnexpectedPayload {
                src: self.rank, tag, expected: tag.payload_kind().name(), found: payload.kind()
            });
        }

        if dest == self.rank {
            trace!("R#{} local delivery tag={} len={}", self.rank, tag.raw(), payload.len());
            self.loopback.borrow_mut().entry(tag).or_default().push_back(payload);
            return Ok(());
        }

        trace!("R#{} -> R#{dest} tag={} len={}", self.rank, tag.raw(), payload.len());
        let process = self.world.process_at_rank(dest_rank);
        match &payload {
            Payload::Scores(scores) => process.send_with_tag(&scores[..], raw_tag),
            Payload::Counts(counts) => process.send_with_tag(&counts[..], raw_tag),
            Payload::Symbols(symbols) => process.send_with_tag(&symbols[..], raw_tag)
        }
        Ok(())
    }

    fn recv(&mut self, src: usize, tag: Tag) -> Result<Payload, CommError> {
        let src_rank = self.check_rank(src)?;
        let raw_tag = mpi_tag(tag)?;

        if src == self.rank {
            // nothing else can fill the loopback queue while we wait, so an empty queue is a protocol error
            return self.loopback.borrow_mut()
                .get_mut(&tag)
                .and_then(|queue| queue.pop_front())
                .ok_or(CommError::Disconnected { peer: src });
        }

        let process = self.world.process_at_rank(src_rank);
        let payload = match tag.payload_kind() {
            PayloadKind::Scores => Payload::Scores(process.receive_vec_with_tag::<ScoreType>(raw_tag).0),
            PayloadKind::Counts => Payload::Counts(process.receive_vec_with_tag::<u64>(raw_tag).0),
            PayloadKind::Symbols => Payload::Symbols(process.receive_vec_with_tag::<u8>(raw_tag).0)
        };
        trace!("R#{} <- R#{src} tag={} len={}", self.rank, tag.raw(), payload.len());
        Ok(payload)
    }

    fn abort(&self) {
        self.world.abort(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpi_tags() {
        assert_eq!(mpi_tag(Tag::Horizontal), Ok(0));
        assert_eq!(mpi_tag(Tag::Reconstruction(7)), Ok(207));
        assert_eq!(
            mpi_tag(Tag::Reconstruction(usize::MAX - 200)),
            Err(CommError::TagOutOfRange { tag: Tag::Reconstruction(usize::MAX - 200) })
        );
    }
}
