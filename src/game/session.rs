//! Match engine: selection, timed evaluation, scoring and win detection.
//!
//! All timing lives in a pending-action queue owned by the session and fired
//! by the frame loop, so replacing the session on reset also discards every
//! in-flight timer. The module is pure Rust over an injected clock.

use super::board::Board;

/// Delay before two revealed cards are compared.
pub const EVALUATE_DELAY_MS: f64 = 600.0;
/// Delay before a mismatched pair starts flipping back down.
pub const FLIP_BACK_DELAY_MS: f64 = 500.0;
/// Delay between winning and the victory celebration.
pub const CELEBRATE_DELAY_MS: f64 = 1000.0;

/// Score formula: 1000 base, −20 per attempt, −1 per elapsed second,
/// floored at 100.
pub fn score(attempts: u32, elapsed_ms: f64) -> u32 {
    let raw = 1000.0 - attempts as f64 * 20.0 - (elapsed_ms / 1000.0).floor();
    raw.max(100.0) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Completed,
}

/// Observable phase of the selection state machine, derived from session
/// data rather than stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    OneSelected,
    Evaluating,
    Won,
}

/// What the session did this tick; the app layer reacts with particles,
/// status text and the score submission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEvent {
    PairMatched { a: usize, b: usize },
    Mismatch { a: usize, b: usize },
    Won { score: u32, elapsed_ms: f64, attempts: u32 },
    Celebrate,
}

/// Final clock and score, captured once at the winning transition.
#[derive(Clone, Copy, Debug)]
pub struct Completion {
    pub elapsed_ms: f64,
    pub score: u32,
}

#[derive(Clone, Copy, Debug)]
enum ActionKind {
    Evaluate,
    FlipBack(usize, usize),
    Celebrate,
}

#[derive(Clone, Copy, Debug)]
struct PendingAction {
    due_ms: f64,
    kind: ActionKind,
}

pub struct GameSession {
    status: Status,
    attempts: u32,
    matched_pairs: usize,
    started_at_ms: f64,
    completed: Option<Completion>,
    /// At most two indices of revealed, unresolved cards.
    selection: Vec<usize>,
    pending: Vec<PendingAction>,
}

impl GameSession {
    pub fn new(now: f64) -> Self {
        Self {
            status: Status::Playing,
            attempts: 0,
            matched_pairs: 0,
            started_at_ms: now,
            completed: None,
            selection: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completed
    }

    pub fn phase(&self) -> Phase {
        match (self.status, self.selection.len()) {
            (Status::Completed, _) => Phase::Won,
            (_, 2) => Phase::Evaluating,
            (_, 1) => Phase::OneSelected,
            _ => Phase::Idle,
        }
    }

    /// Elapsed play time; frozen at the winning transition.
    pub fn elapsed_ms(&self, now: f64) -> f64 {
        match self.completed {
            Some(c) => c.elapsed_ms,
            None => now - self.started_at_ms,
        }
    }

    /// Live score preview, or the frozen final score once completed.
    pub fn current_score(&self, now: f64) -> u32 {
        match self.completed {
            Some(c) => c.score,
            None => score(self.attempts, now - self.started_at_ms),
        }
    }

    /// Value for the score readout: 0 until the first attempt, then the
    /// live preview, then the frozen final score.
    pub fn display_score(&self, now: f64) -> u32 {
        if self.completed.is_none() && self.attempts == 0 {
            0
        } else {
            self.current_score(now)
        }
    }

    /// Handle a click already hit-tested to `idx`: flip the card and grow
    /// the selection. The second selection costs an attempt and arms the
    /// evaluation timer.
    pub fn on_card_clicked(&mut self, board: &mut Board, idx: usize, now: f64) {
        if self.status != Status::Playing || self.selection.len() >= 2 {
            return;
        }
        let card = board.card_mut(idx);
        if card.face_up || card.animating() || card.matched {
            return;
        }
        card.begin_flip(now);
        self.selection.push(idx);
        if self.selection.len() == 2 {
            self.attempts += 1;
            self.pending.push(PendingAction {
                due_ms: now + EVALUATE_DELAY_MS,
                kind: ActionKind::Evaluate,
            });
        }
    }

    /// Fire every due timed action. Called once per frame, after the cards'
    /// own animations have advanced.
    pub fn advance(&mut self, board: &mut Board, now: f64) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if !self.action_ready(board, &self.pending[i], now) {
                i += 1;
                continue;
            }
            let action = self.pending.remove(i);
            match action.kind {
                ActionKind::Evaluate => self.evaluate(board, now, &mut events),
                ActionKind::FlipBack(a, b) => {
                    board.card_mut(a).begin_flip(now);
                    board.card_mut(b).begin_flip(now);
                }
                ActionKind::Celebrate => events.push(SessionEvent::Celebrate),
            }
        }
        events
    }

    fn action_ready(&self, board: &Board, action: &PendingAction, now: f64) -> bool {
        if now < action.due_ms {
            return false;
        }
        match action.kind {
            // Comparison waits until both cards have finished turning.
            ActionKind::Evaluate => self.selection.iter().all(|&i| !board.card(i).animating()),
            _ => true,
        }
    }

    fn evaluate(&mut self, board: &mut Board, now: f64, events: &mut Vec<SessionEvent>) {
        let (a, b) = match self.selection[..] {
            [a, b] => (a, b),
            _ => return,
        };
        self.selection.clear();

        if board.card(a).symbol == board.card(b).symbol {
            board.card_mut(a).begin_match(now);
            board.card_mut(b).begin_match(now);
            self.matched_pairs += 1;
            events.push(SessionEvent::PairMatched { a, b });
            if self.matched_pairs == board.pair_count() {
                let elapsed_ms = now - self.started_at_ms;
                let final_score = score(self.attempts, elapsed_ms);
                self.status = Status::Completed;
                self.completed = Some(Completion {
                    elapsed_ms,
                    score: final_score,
                });
                self.pending.push(PendingAction {
                    due_ms: now + CELEBRATE_DELAY_MS,
                    kind: ActionKind::Celebrate,
                });
                events.push(SessionEvent::Won {
                    score: final_score,
                    elapsed_ms,
                    attempts: self.attempts,
                });
            }
        } else {
            events.push(SessionEvent::Mismatch { a, b });
            self.pending.push(PendingAction {
                due_ms: now + FLIP_BACK_DELAY_MS,
                kind: ActionKind::FlipBack(a, b),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SYMBOLS: &[&str] = &["A", "B", "C", "D", "E", "F", "G", "H"];

    fn make_board(pairs: usize, seed: u64) -> Board {
        let mut rng = StdRng::seed_from_u64(seed);
        Board::setup(pairs, SYMBOLS, 520.0, 640.0, &mut rng).expect("board setup")
    }

    fn indices_of(board: &Board, symbol: &str) -> (usize, usize) {
        let mut it = board
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.symbol == symbol)
            .map(|(i, _)| i);
        (it.next().unwrap(), it.next().unwrap())
    }

    fn tick(board: &mut Board, session: &mut GameSession, now: f64) -> Vec<SessionEvent> {
        board.advance(now);
        session.advance(board, now)
    }

    #[test]
    fn score_matches_the_formula() {
        assert_eq!(score(0, 0.0), 1000);
        assert_eq!(score(1, 0.0), 980);
        assert_eq!(score(0, 30_000.0), 970);
        assert_eq!(score(45, 0.0), 100, "exactly at the floor");
        assert_eq!(score(1000, 0.0), 100, "deep below the floor");
        assert_eq!(score(10, 59_999.0), 741);
    }

    #[test]
    fn score_is_monotone_non_increasing() {
        for attempts in 0..60 {
            assert!(score(attempts + 1, 5_000.0) <= score(attempts, 5_000.0));
        }
        for secs in 0..120 {
            let ms = secs as f64 * 1000.0;
            assert!(score(5, ms + 1000.0) <= score(5, ms));
        }
    }

    #[test]
    fn second_selection_costs_an_attempt_and_arms_evaluation() {
        let mut board = make_board(8, 1);
        let mut session = GameSession::new(0.0);
        let (a, b) = indices_of(&board, "A");

        session.on_card_clicked(&mut board, a, 0.0);
        assert_eq!(session.phase(), Phase::OneSelected);
        assert_eq!(session.attempts(), 0);

        session.on_card_clicked(&mut board, b, 0.0);
        assert_eq!(session.phase(), Phase::Evaluating);
        assert_eq!(session.attempts(), 1);

        // Nothing resolves before the evaluation delay.
        let events = tick(&mut board, &mut session, EVALUATE_DELAY_MS - 1.0);
        assert!(events.is_empty());
        assert_eq!(session.phase(), Phase::Evaluating);

        let events = tick(&mut board, &mut session, EVALUATE_DELAY_MS + 1.0);
        assert_eq!(events, vec![SessionEvent::PairMatched { a, b }]);
        assert!(board.card(a).matched && board.card(b).matched);
        assert_eq!(session.matched_pairs(), 1);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn clicking_the_same_card_twice_is_one_selection() {
        let mut board = make_board(8, 1);
        let mut session = GameSession::new(0.0);
        session.on_card_clicked(&mut board, 0, 0.0);
        session.on_card_clicked(&mut board, 0, 10.0);
        assert_eq!(session.phase(), Phase::OneSelected);
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn mismatch_flips_both_back_after_the_delay() {
        let mut board = make_board(8, 2);
        let mut session = GameSession::new(0.0);
        let (a, _) = indices_of(&board, "A");
        let (b, _) = indices_of(&board, "B");

        session.on_card_clicked(&mut board, a, 0.0);
        session.on_card_clicked(&mut board, b, 0.0);
        let events = tick(&mut board, &mut session, 700.0);
        assert_eq!(events, vec![SessionEvent::Mismatch { a, b }]);
        assert_eq!(session.phase(), Phase::Idle, "selection clears at the decision");
        assert!(board.card(a).face_up, "stays revealed until the flip-back fires");

        // Flip-back due 500ms after the decision.
        let _ = tick(&mut board, &mut session, 1250.0);
        let _ = tick(&mut board, &mut session, 1600.0);
        assert!(!board.card(a).face_up && !board.card(b).face_up);
        assert_eq!(board.card(a).flip_progress, 0.0);
        assert_eq!(session.matched_pairs(), 0);
    }

    #[test]
    fn evaluation_waits_for_flip_animations_to_finish() {
        let mut board = make_board(8, 11);
        let mut session = GameSession::new(0.0);
        let (a, b) = indices_of(&board, "C");
        session.on_card_clicked(&mut board, a, 0.0);
        session.on_card_clicked(&mut board, b, 0.0);

        // Due time has passed but the cards were never advanced to the end
        // of their flips.
        let events = session.advance(&mut board, 900.0);
        assert!(events.is_empty(), "comparison must wait for the flips");

        board.advance(900.0);
        let events = session.advance(&mut board, 901.0);
        assert_eq!(events, vec![SessionEvent::PairMatched { a, b }]);
    }

    #[test]
    fn third_click_is_ignored_while_two_are_selected() {
        let mut board = make_board(8, 5);
        let mut session = GameSession::new(0.0);
        let (a, _) = indices_of(&board, "A");
        let (b, _) = indices_of(&board, "B");
        let (c, _) = indices_of(&board, "C");

        session.on_card_clicked(&mut board, a, 0.0);
        session.on_card_clicked(&mut board, b, 0.0);
        session.on_card_clicked(&mut board, c, 100.0);
        assert!(!board.card(c).face_up, "third card must stay face down");
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn win_freezes_clock_and_score() {
        let mut board = make_board(2, 9);
        let mut session = GameSession::new(0.0);
        let mut now = 0.0;
        for symbol in &SYMBOLS[..2] {
            let (a, b) = indices_of(&board, symbol);
            session.on_card_clicked(&mut board, a, now);
            session.on_card_clicked(&mut board, b, now);
            now += 700.0;
            let _ = tick(&mut board, &mut session, now);
        }
        assert_eq!(session.status(), Status::Completed);
        assert_eq!(session.phase(), Phase::Won);

        let done = session.completion().expect("completion data");
        assert_eq!(done.elapsed_ms, 1400.0);
        assert_eq!(done.score, score(2, 1400.0));
        assert_eq!(session.elapsed_ms(99_999.0), 1400.0);
        assert_eq!(session.display_score(99_999.0), done.score);

        // Celebration fires once, a second after the win.
        let events = tick(&mut board, &mut session, now + CELEBRATE_DELAY_MS + 10.0);
        assert_eq!(events, vec![SessionEvent::Celebrate]);
        let events = tick(&mut board, &mut session, now + CELEBRATE_DELAY_MS + 500.0);
        assert!(events.is_empty());

        // Clicks after completion change nothing.
        session.on_card_clicked(&mut board, 0, now + 2000.0);
        assert_eq!(session.attempts(), 2);
        assert_eq!(session.status(), Status::Completed);
    }

    #[test]
    fn display_score_is_zero_before_the_first_attempt() {
        let session = GameSession::new(0.0);
        assert_eq!(session.display_score(5_000.0), 0);
        assert_eq!(session.current_score(5_000.0), 995);
    }
}
