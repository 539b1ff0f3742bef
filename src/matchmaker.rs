//! FIFO waiting queue that pairs participants into sessions.

use crate::games::go::DEFAULT_SIZE;
use crate::session::{Participant, ParticipantId, Session, SessionId};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument};

#[derive(Debug, Default)]
struct QueueState {
    waiting: VecDeque<Participant>,
    matches_made: u64,
}

/// Shared waiting queue. Clones refer to the same queue.
#[derive(Debug, Clone)]
pub struct Matchmaker {
    state: Arc<Mutex<QueueState>>,
    next_session: Arc<AtomicU64>,
    board_size: usize,
}

impl Matchmaker {
    /// Creates a matchmaker whose games use a 9x9 board.
    pub fn new() -> Self {
        Self::with_board_size(DEFAULT_SIZE)
    }

    /// Creates a matchmaker whose games use the given board size.
    #[instrument]
    pub fn with_board_size(board_size: usize) -> Self {
        info!("Creating matchmaker");
        Self {
            state: Arc::new(Mutex::new(QueueState::default())),
            next_session: Arc::new(AtomicU64::new(1)),
            board_size,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a participant. Returns false if it was already waiting.
    #[instrument(skip(self, participant), fields(participant = %participant.id(), username = participant.username()))]
    pub fn enqueue(&self, participant: Participant) -> bool {
        let mut state = self.lock();
        if state.waiting.iter().any(|p| p.id() == participant.id()) {
            debug!("Participant already queued");
            return false;
        }
        state.waiting.push_back(participant);
        info!(waiting = state.waiting.len(), "Participant entered the queue");
        true
    }

    /// Removes a waiting participant. No-op if absent.
    #[instrument(skip(self))]
    pub fn dequeue(&self, id: ParticipantId) -> bool {
        let mut state = self.lock();
        let before = state.waiting.len();
        state.waiting.retain(|p| p.id() != id);
        let removed = state.waiting.len() != before;
        if removed {
            info!(waiting = state.waiting.len(), "Participant left the queue");
        }
        removed
    }

    /// True while the participant is waiting.
    pub fn is_queued(&self, id: ParticipantId) -> bool {
        self.lock().waiting.iter().any(|p| p.id() == id)
    }

    /// Number of waiting participants.
    pub fn len(&self) -> usize {
        self.lock().waiting.len()
    }

    /// True when nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total sessions created so far.
    pub fn matches_made(&self) -> u64 {
        self.lock().matches_made
    }

    /// Pairs the two longest-waiting participants, first as black.
    ///
    /// Participants whose connection already closed are dropped from the
    /// queue first.
    #[instrument(skip(self))]
    pub fn try_pair(&self) -> Option<Session> {
        let mut state = self.lock();
        state.waiting.retain(|p| !p.is_disconnected());
        if state.waiting.len() < 2 {
            debug!(waiting = state.waiting.len(), "Not enough participants to pair");
            return None;
        }

        let black = state.waiting.pop_front()?;
        let white = state.waiting.pop_front()?;
        state.matches_made += 1;
        let id: SessionId = self.next_session.fetch_add(1, Ordering::Relaxed);
        info!(
            session_id = id,
            black = black.username(),
            white = white.username(),
            "Paired participants"
        );
        Some(Session::new(id, black, white, self.board_size))
    }
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::new()
    }
}
