use log::trace;
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use crate::comm::{CommError, Communicator, Payload, Tag};

/// How often a blocked receive wakes up to check whether the group was aborted
const ABORT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A message in flight
#[derive(Debug)]
struct Envelope {
    src: usize,
    tag: Tag,
    payload: Payload
}

/// Shared flag that lets any rank tear down the whole group
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>
}

impl AbortHandle {
    /// Flags the group as aborted
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// One rank's endpoint in an in-process group.
/// Each rank has a single inbox; messages that arrive before they are asked for are parked
/// per (source, tag) until a matching receive shows up.
pub struct LocalComm {
    /// This rank
    rank: usize,
    /// Senders for every inbox in the group, including our own
    outboxes: Vec<Sender<Envelope>>,
    /// Our inbox
    inbox: Receiver<Envelope>,
    /// Messages that arrived early, in arrival order per (source, tag)
    parked: HashMap<(usize, Tag), VecDeque<Payload>>,
    /// Group-wide abort flag
    abort_handle: AbortHandle
}

/// Creates a fully connected group of `world_size` ranks; entry `i` is rank `i`.
pub fn local_group(world_size: usize) -> Vec<LocalComm> {
    let (outboxes, inboxes): (Vec<Sender<Envelope>>, Vec<Receiver<Envelope>>) = (0..world_size)
        .map(|_| mpsc::channel())
        .unzip();
    let abort_handle = AbortHandle::default();

    inboxes.into_iter()
        .enumerate()
        .map(|(rank, inbox)| LocalComm {
            rank,
            outboxes: outboxes.clone(),
            inbox,
            parked: Default::default(),
            abort_handle: abort_handle.clone()
        })
        .collect()
}

impl LocalComm {
    /// Handle that can abort the group without borrowing this endpoint
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }

    fn check_rank(&self, rank: usize) -> Result<(), CommError> {
        if rank < self.outboxes.len() {
            Ok(())
        } else {
            Err(CommError::InvalidRank { rank, size: self.outboxes.len() })
        }
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.outboxes.len()
    }

    fn send(&self, dest: usize, tag: Tag, payload: Payload) -> Result<(), CommError> {
        self.check_rank(dest)?;
        if self.abort_handle.is_aborted() {
            return Err(CommError::Aborted);
        }

        if dest == self.rank {
            trace!("R#{} local delivery tag={} len={}", self.rank, tag.raw(), payload.len());
        } else {
            trace!("R#{} -> R#{dest} tag={} len={}", self.rank, tag.raw(), payload.len());
        }
        self.outboxes[dest]
            .send(Envelope { src: self.rank, tag, payload })
            .map_err(|_| CommError::Disconnected { peer: dest })
    }

    fn recv(&mut self, src: usize, tag: Tag) -> Result<Payload, CommError> {
        self.check_rank(src)?;

        // something may already be waiting for us
        if let Some(payload) = self.parked.get_mut(&(src, tag)).and_then(|queue| queue.pop_front()) {
            trace!("R#{} <- R#{src} tag={} (parked)", self.rank, tag.raw());
            return Ok(payload);
        }

        loop {
            if self.abort_handle.is_aborted() {
                return Err(CommError::Aborted);
            }

            match self.inbox.recv_timeout(ABORT_POLL_INTERVAL) {
                Ok(envelope) => {
                    if envelope.src == src && envelope.tag == tag {
                        trace!("R#{} <- R#{src} tag={} len={}", self.rank, tag.raw(), envelope.payload.len());
                        return Ok(envelope.payload);
                    }

                    // not what we want yet, park it for a later receive
                    self.parked.entry((envelope.src, envelope.tag))
                        .or_default()
                        .push_back(envelope.payload);
                },
                Err(RecvTimeoutError::Timeout) => {},
                Err(RecvTimeoutError::Disconnected) => {
                    // we hold a sender to our own inbox, so this only happens while tearing down
                    return Err(CommError::Disconnected { peer: src });
                }
            }
        }
    }

    fn abort(&self) {
        trace!("R#{} aborting the group", self.rank);
        self.abort_handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_point_to_point() {
        let mut group = local_group(2);
        let mut rank1 = group.pop().unwrap();
        let rank0 = group.pop().unwrap();
        assert_eq!((rank0.rank(), rank0.size()), (0, 2));
        assert!(rank0.is_root());
        assert!(!rank1.is_root());

        rank0.send_scores(1, Tag::Horizontal, vec![1, 2, 3]).unwrap();
        assert_eq!(rank1.recv_scores(0, Tag::Horizontal, 3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_self_delivery() {
        let mut group = local_group(1);
        let mut rank0 = group.pop().unwrap();
        rank0.send_scores(0, Tag::Vertical, vec![9]).unwrap();
        assert_eq!(rank0.recv_scores(0, Tag::Vertical, 1).unwrap(), vec![9]);
    }

    #[test]
    fn test_tags_and_order() {
        let mut group = local_group(2);
        let mut rank1 = group.pop().unwrap();
        let rank0 = group.pop().unwrap();

        // interleave two channels, then read them back in the opposite order
        for i in 0..3 {
            rank0.send_scores(1, Tag::Horizontal, vec![i]).unwrap();
            rank0.send_scores(1, Tag::Vertical, vec![10 + i]).unwrap();
        }
        for i in 0..3 {
            assert_eq!(rank1.recv_scores(0, Tag::Vertical, 1).unwrap(), vec![10 + i]);
        }
        for i in 0..3 {
            assert_eq!(rank1.recv_scores(0, Tag::Horizontal, 1).unwrap(), vec![i]);
        }
    }

    #[test]
    fn test_sources_are_separate() {
        let mut group = local_group(3);
        let mut rank2 = group.pop().unwrap();
        let rank1 = group.pop().unwrap();
        let rank0 = group.pop().unwrap();

        rank1.send_scores(2, Tag::Horizontal, vec![1]).unwrap();
        rank0.send_scores(2, Tag::Horizontal, vec![0]).unwrap();
        assert_eq!(rank2.recv_scores(0, Tag::Horizontal, 1).unwrap(), vec![0]);
        assert_eq!(rank2.recv_scores(1, Tag::Horizontal, 1).unwrap(), vec![1]);
    }

    #[test]
    fn test_payload_errors() {
        let mut group = local_group(2);
        let mut rank1 = group.pop().unwrap();
        let rank0 = group.pop().unwrap();

        rank0.send_scores(1, Tag::Horizontal, vec![1, 2]).unwrap();
        assert_eq!(
            rank1.recv_scores(0, Tag::Horizontal, 3),
            Err(CommError::LengthMismatch { src: 0, tag: Tag::Horizontal, expected: 3, found: 2 })
        );

        rank0.send(1, Tag::Vertical, Payload::Symbols(b"AC".to_vec())).unwrap();
        assert_eq!(
            rank1.recv_scores(0, Tag::Vertical, 2),
            Err(CommError::UnexpectedPayload { src: 0, tag: Tag::Vertical, expected: "scores", found: "symbols" })
        );

        assert_eq!(rank0.send_scores(5, Tag::Vertical, vec![]), Err(CommError::InvalidRank { rank: 5, size: 2 }));
    }

    #[test]
    fn test_broadcast() {
        let group = local_group(3);
        let results: Vec<(Vec<u64>, Vec<u8>)> = thread::scope(|scope| {
            let handles: Vec<_> = group.into_iter()
                .map(|mut comm| scope.spawn(move || {
                    let (counts, symbols) = if comm.is_root() {
                        (vec![2, 3], b"ACG".to_vec())
                    } else {
                        (vec![], vec![])
                    };
                    let counts = comm.broadcast_counts(0, counts).unwrap();
                    let symbols = comm.broadcast_symbols(0, symbols).unwrap();
                    (counts, symbols)
                }))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (counts, symbols) in results {
            assert_eq!(counts, vec![2, 3]);
            assert_eq!(symbols, b"ACG".to_vec());
        }
    }

    #[test]
    fn test_abort_unblocks_receivers() {
        let mut group = local_group(2);
        let mut rank1 = group.pop().unwrap();
        let rank0 = group.pop().unwrap();

        thread::scope(|scope| {
            let waiter = scope.spawn(move || rank1.recv(0, Tag::FinalScore));
            rank0.abort();
            assert_eq!(waiter.join().unwrap(), Err(CommError::Aborted));
        });
        assert_eq!(rank0.send_scores(1, Tag::FinalScore, vec![0]), Err(CommError::Aborted));
        assert!(rank0.abort_handle().is_aborted());
    }
}
