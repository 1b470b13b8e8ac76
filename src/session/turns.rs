use futures::stream::{FuturesOrdered, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::transcript::{ChatMessage, Transcript, FALLBACK_REPLY};
use crate::assistant::{Assistant, AssistantError};

/// How a chat turn was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant answered
    Replied,
    /// The request failed and the fallback apology was appended
    Fallback,
}

/// Completion handle for one submitted turn
#[derive(Debug)]
pub struct TurnHandle {
    turn: u64,
    outcome: oneshot::Receiver<TurnOutcome>,
}

impl TurnHandle {
    /// Sequence number of the turn within its session, starting at 1
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Wait until the reply (or fallback) has been appended.
    ///
    /// Returns `None` if the session ended before the reply landed.
    pub async fn settled(self) -> Option<TurnOutcome> {
        self.outcome.await.ok()
    }
}

struct PendingTurn {
    turn: u64,
    text: String,
    done: oneshot::Sender<TurnOutcome>,
}

/// Runs the chat turns of one session.
///
/// Requests are issued as soon as they are submitted and may overlap, but
/// replies are appended strictly in submission order. Dropping the worker
/// cancels every in-flight request.
pub(crate) struct TurnWorker {
    tx: mpsc::UnboundedSender<PendingTurn>,
    task: JoinHandle<()>,
    next_turn: u64,
    in_flight: Arc<AtomicUsize>,
}

impl TurnWorker {
    pub fn spawn(
        generation: u64,
        assistant: Arc<dyn Assistant>,
        transcript: Arc<Mutex<Transcript>>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn(run_turns(
            generation,
            assistant,
            transcript,
            rx,
            Arc::clone(&in_flight),
        ));

        Self {
            tx,
            task,
            next_turn: 1,
            in_flight,
        }
    }

    /// Queue a turn. The user message must already be in the transcript.
    pub fn submit(&mut self, text: String) -> TurnHandle {
        let turn = self.next_turn;
        self.next_turn += 1;

        let (done, outcome) = oneshot::channel();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(PendingTurn { turn, text, done }).is_err() {
            // Worker already gone; the handle settles as cancelled
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            warn!("Turn {} submitted after worker stopped", turn);
        }

        TurnHandle { turn, outcome }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Drop for TurnWorker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn exchange(
    assistant: Arc<dyn Assistant>,
    turn: PendingTurn,
) -> (PendingTurn, Result<String, AssistantError>) {
    let result = assistant.reply(&turn.text).await;
    (turn, result)
}

async fn run_turns(
    generation: u64,
    assistant: Arc<dyn Assistant>,
    transcript: Arc<Mutex<Transcript>>,
    mut rx: mpsc::UnboundedReceiver<PendingTurn>,
    in_flight: Arc<AtomicUsize>,
) {
    let mut pending = FuturesOrdered::new();
    let mut open = true;

    loop {
        tokio::select! {
            next = rx.recv(), if open => match next {
                Some(turn) => {
                    debug!("Turn {} sent to {}", turn.turn, assistant.name());
                    pending.push_back(exchange(Arc::clone(&assistant), turn));
                }
                None => open = false,
            },
            Some((turn, result)) = pending.next(), if !pending.is_empty() => {
                in_flight.fetch_sub(1, Ordering::SeqCst);
                append_reply(generation, &transcript, turn, result).await;
            }
            else => break,
        }
    }

    info!("Turn worker for generation {} finished", generation);
}

async fn append_reply(
    generation: u64,
    transcript: &Mutex<Transcript>,
    turn: PendingTurn,
    result: Result<String, AssistantError>,
) {
    let (content, outcome) = match result {
        Ok(reply) => (reply, TurnOutcome::Replied),
        Err(e) => {
            warn!("Turn {} failed: {}", turn.turn, e);
            (FALLBACK_REPLY.to_string(), TurnOutcome::Fallback)
        }
    };

    let mut transcript = transcript.lock().await;
    if transcript.generation != generation {
        debug!("Dropping reply to turn {} from a closed session", turn.turn);
        return;
    }
    transcript.messages.push(ChatMessage::assistant(content));
    drop(transcript);

    // Receiver may have been dropped; nothing to do then
    let _ = turn.done.send(outcome);
}
