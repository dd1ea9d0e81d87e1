use std::time::Instant;

use tracing::{debug, info};

use crate::engine::normalize::practice_target;
use crate::error::PracticeError;
use crate::session::drill::DrillState;
use crate::session::result::{LiveMetrics, PracticeResult};
use crate::session::timer::SessionTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Finished,
    Exited,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Finished | SessionStatus::Exited)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Finished => "finished",
            SessionStatus::Exited => "exited",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Rejected: wrong state, not a typing character, or target already full.
    Ignored,
    Accepted,
    /// The keystroke completed the target. Emitted exactly once per session.
    Finished(PracticeResult),
}

/// One practice attempt over a fixed target text.
///
/// Owns the typing buffer and the elapsed-time ticker and decides which
/// inputs are accepted in each state. `Finished` and `Exited` are terminal;
/// a new attempt always needs a new session.
#[derive(Debug)]
pub struct PracticeSession {
    text_id: String,
    title: String,
    status: SessionStatus,
    drill: DrillState,
    timer: SessionTimer,
    result: Option<PracticeResult>,
}

impl PracticeSession {
    /// Start an idle session on the confirmed practice string.
    pub fn start(text_id: &str, title: &str, practice: &str) -> Result<Self, PracticeError> {
        let target = practice_target(practice);
        if target.is_empty() {
            return Err(PracticeError::EmptyContent);
        }
        debug!(text_id, chars = target.chars().count(), "practice session created");
        Ok(Self {
            text_id: text_id.to_string(),
            title: title.to_string(),
            status: SessionStatus::Idle,
            drill: DrillState::new(&target),
            timer: SessionTimer::new(),
            result: None,
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn drill(&self) -> &DrillState {
        &self.drill
    }

    pub fn text_id(&self) -> &str {
        &self.text_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.elapsed_secs()
    }

    pub fn result(&self) -> Option<&PracticeResult> {
        self.result.as_ref()
    }

    pub fn live_metrics(&self) -> LiveMetrics {
        LiveMetrics::from_drill(&self.drill, self.timer.elapsed_secs())
    }

    /// Feed one typed character.
    ///
    /// The first printable character starts the clock. Control characters
    /// such as a line break are only accepted once running.
    pub fn handle_key(&mut self, ch: char, now: Instant) -> KeyOutcome {
        match self.status {
            SessionStatus::Idle => {
                if ch.is_control() {
                    return KeyOutcome::Ignored;
                }
                self.status = SessionStatus::Running;
                self.timer.arm(now);
                info!(text_id = %self.text_id, "session started");
                self.append(ch, now)
            }
            SessionStatus::Running => self.append(ch, now),
            SessionStatus::Paused | SessionStatus::Finished | SessionStatus::Exited => {
                KeyOutcome::Ignored
            }
        }
    }

    fn append(&mut self, ch: char, now: Instant) -> KeyOutcome {
        self.timer.poll(now);
        if !self.drill.append(ch) {
            return KeyOutcome::Ignored;
        }
        if self.drill.is_complete() {
            return KeyOutcome::Finished(self.finish(now));
        }
        KeyOutcome::Accepted
    }

    fn finish(&mut self, now: Instant) -> PracticeResult {
        self.timer.poll(now);
        self.timer.disarm();
        self.status = SessionStatus::Finished;
        let result =
            PracticeResult::from_drill(&self.drill, self.timer.elapsed_secs(), &self.text_id);
        info!(
            text_id = %self.text_id,
            wpm = result.wpm,
            accuracy = result.accuracy,
            duration = result.duration,
            "session finished"
        );
        self.result = Some(result.clone());
        result
    }

    /// Advance the clock to `now`. Returns the number of seconds that elapsed.
    pub fn tick(&mut self, now: Instant) -> u64 {
        if self.status != SessionStatus::Running {
            return 0;
        }
        self.timer.poll(now)
    }

    pub fn pause(&mut self, now: Instant) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        self.timer.poll(now);
        self.timer.disarm();
        self.status = SessionStatus::Paused;
        debug!(elapsed = self.timer.elapsed_secs(), "session paused");
        true
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        self.timer.arm(now);
        self.status = SessionStatus::Running;
        debug!(elapsed = self.timer.elapsed_secs(), "session resumed");
        true
    }

    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        match self.status {
            SessionStatus::Running => self.pause(now),
            SessionStatus::Paused => self.resume(now),
            _ => false,
        }
    }

    /// Abandon the session from any non-terminal state. Never yields a result.
    pub fn exit(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.timer.disarm();
        self.status = SessionStatus::Exited;
        info!(text_id = %self.text_id, typed = self.drill.typed_len(), "session exited");
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn session(text: &str) -> PracticeSession {
        PracticeSession::start("t1", "Title", text).unwrap()
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn type_str(s: &mut PracticeSession, text: &str, now: Instant) -> Vec<KeyOutcome> {
        text.chars().map(|ch| s.handle_key(ch, now)).collect()
    }

    #[test]
    fn test_start_rejects_blank_practice() {
        assert_eq!(
            PracticeSession::start("t", "x", "  \n ").unwrap_err(),
            PracticeError::EmptyContent
        );
    }

    #[test]
    fn test_target_is_normalized() {
        let s = session("  one   two \n\n three ");
        let target: String = s.drill().target().iter().collect();
        assert_eq!(target, "one two\nthree");
    }

    #[test]
    fn test_first_printable_key_starts() {
        let t0 = Instant::now();
        let mut s = session("abc");
        assert_eq!(s.status(), SessionStatus::Idle);
        assert_eq!(s.handle_key('\n', t0), KeyOutcome::Ignored);
        assert_eq!(s.handle_key('\t', t0), KeyOutcome::Ignored);
        assert_eq!(s.status(), SessionStatus::Idle);
        assert_eq!(s.handle_key('a', t0), KeyOutcome::Accepted);
        assert_eq!(s.status(), SessionStatus::Running);
        assert_eq!(s.drill().typed_len(), 1);
    }

    #[test]
    fn test_idle_clock_does_not_advance() {
        let t0 = Instant::now();
        let mut s = session("abc");
        assert_eq!(s.tick(t0 + secs(30)), 0);
        assert_eq!(s.elapsed_secs(), 0);
    }

    #[test]
    fn test_finishes_exactly_once_at_target_length() {
        let t0 = Instant::now();
        let mut s = session("hi!");
        let outcomes = type_str(&mut s, "hi", t0);
        assert!(outcomes.iter().all(|o| *o == KeyOutcome::Accepted));
        s.tick(t0 + secs(2));

        let KeyOutcome::Finished(result) = s.handle_key('!', t0 + secs(3)) else {
            panic!("expected Finished");
        };
        assert_eq!(s.status(), SessionStatus::Finished);
        assert_eq!(result.duration, 3);
        assert_eq!(result.accuracy, 100);
        assert_eq!(s.result(), Some(&result));

        assert_eq!(s.handle_key('x', t0 + secs(4)), KeyOutcome::Ignored);
        assert_eq!(s.drill().typed_len(), 3);
        assert_eq!(s.tick(t0 + secs(20)), 0);
        assert_eq!(s.elapsed_secs(), 3);
        assert!(!s.exit());
    }

    #[test]
    fn test_final_metrics_with_mistakes() {
        let t0 = Instant::now();
        let mut s = session("hello");
        type_str(&mut s, "hell", t0);
        let KeyOutcome::Finished(result) = s.handle_key('x', t0 + secs(6)) else {
            panic!("expected Finished");
        };
        assert_eq!(result.accuracy, 80);
        // 4 correct chars over 6s: (0.8 / 0.1) = 8
        assert_eq!(result.wpm, 8);
    }

    #[test]
    fn test_pause_freezes_clock_and_rejects_input() {
        let t0 = Instant::now();
        let mut s = session("abcdef");
        s.handle_key('a', t0);
        s.tick(t0 + secs(2));
        assert!(s.pause(t0 + Duration::from_millis(2500)));
        assert_eq!(s.status(), SessionStatus::Paused);

        for n in 3..100 {
            assert_eq!(s.tick(t0 + secs(n)), 0);
        }
        assert_eq!(s.elapsed_secs(), 2);
        assert_eq!(s.handle_key('b', t0 + secs(50)), KeyOutcome::Ignored);
        assert_eq!(s.drill().typed_len(), 1);

        let t1 = t0 + secs(100);
        assert!(s.resume(t1));
        assert_eq!(s.status(), SessionStatus::Running);
        s.tick(t1 + secs(3));
        assert_eq!(s.elapsed_secs(), 5);
        assert_eq!(s.handle_key('b', t1 + secs(3)), KeyOutcome::Accepted);
    }

    #[test]
    fn test_pause_only_from_running() {
        let t0 = Instant::now();
        let mut s = session("abc");
        assert!(!s.pause(t0));
        assert!(!s.resume(t0));
        assert!(!s.toggle_pause(t0));
        s.handle_key('a', t0);
        assert!(s.toggle_pause(t0));
        assert_eq!(s.status(), SessionStatus::Paused);
        assert!(s.toggle_pause(t0));
        assert_eq!(s.status(), SessionStatus::Running);
    }

    #[test]
    fn test_exit_from_every_active_state() {
        let t0 = Instant::now();

        let mut idle = session("abc");
        assert!(idle.exit());
        assert_eq!(idle.status(), SessionStatus::Exited);
        assert!(idle.result().is_none());

        let mut running = session("abc");
        running.handle_key('a', t0);
        assert!(running.exit());
        assert!(running.result().is_none());
        assert_eq!(running.handle_key('b', t0), KeyOutcome::Ignored);

        let mut paused = session("abc");
        paused.handle_key('a', t0);
        paused.pause(t0);
        assert!(paused.exit());
        assert!(!paused.resume(t0));
        assert!(paused.result().is_none());
        assert!(!paused.exit());
    }

    #[test]
    fn test_clock_advances_while_typing_without_ticks() {
        let t0 = Instant::now();
        let mut s = session(&"a".repeat(40));
        for i in 0..20u64 {
            s.handle_key('a', t0 + Duration::from_millis(90 * i));
        }
        let live = s.live_metrics();
        assert_eq!(live.elapsed_secs, 1);
        assert!(live.wpm > 0);
    }

    #[test]
    fn test_enter_types_line_break_while_running() {
        let t0 = Instant::now();
        let mut s = session("a\nb");
        s.handle_key('a', t0);
        assert_eq!(s.handle_key('\n', t0), KeyOutcome::Accepted);
        assert!(matches!(s.handle_key('b', t0), KeyOutcome::Finished(_)));
    }
}
