use std::time::Duration;

use study_core::session::Tick;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

/// Why a timer loop returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerExit {
    /// The countdown reached zero and the session auto-submitted.
    Expired,
    /// The session stopped on its own (manual submit).
    Stopped,
    /// `cancel` was called.
    Cancelled,
}

/// Drives a quiz countdown once per second.
///
/// `run` never spawns: the caller owns the future, and dropping it stops the
/// timer. One `QuizTimer` per mounted quiz.
#[derive(Debug)]
pub struct QuizTimer {
    period: Duration,
    cancel: watch::Sender<bool>,
}

impl Default for QuizTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let (cancel, _) = watch::channel(false);
        Self { period, cancel }
    }

    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Call `on_tick` every period until it reports `Expired` or `Stopped`,
    /// or until cancelled. The first call happens one period after start.
    pub async fn run<F>(&self, mut on_tick: F) -> TimerExit
    where
        F: FnMut() -> Tick,
    {
        let mut cancelled = self.cancel.subscribe();
        if *cancelled.borrow_and_update() {
            return TimerExit::Cancelled;
        }

        let mut ticks = interval_at(Instant::now() + self.period, self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticks.tick() => match on_tick() {
                    Tick::Running { remaining } => debug!(remaining, "quiz tick"),
                    Tick::Expired => {
                        info!("quiz time limit reached");
                        return TimerExit::Expired;
                    }
                    Tick::Stopped => return TimerExit::Stopped,
                },
                changed = cancelled.changed() => {
                    if changed.is_err() || *cancelled.borrow() {
                        return TimerExit::Cancelled;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::QuizQuestion;
    use study_core::session::{Countdown, QuizSession, SubmitReason};

    fn quiz(minutes: u32) -> QuizSession {
        let questions = vec![
            QuizQuestion::new("Q1", vec!["a".into(), "b".into()], 0, None).unwrap(),
            QuizQuestion::new("Q2", vec!["a".into(), "b".into()], 1, None).unwrap(),
        ];
        QuizSession::new(questions, Countdown::from_minutes(minutes)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn submits_when_time_runs_out() {
        let mut session = quiz(1);
        session.select_option(0, 0).unwrap();
        let timer = QuizTimer::new();
        let started = Instant::now();

        let exit = timer.run(|| session.tick()).await;

        assert_eq!(exit, TimerExit::Expired);
        assert_eq!(started.elapsed(), Duration::from_secs(60));
        assert!(session.is_submitted());
        assert_eq!(session.submitted_by(), Some(SubmitReason::Timeout));
        assert_eq!(session.result().unwrap().score(), 1);
        assert_eq!(session.tick(), Tick::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_submit_stops_the_loop() {
        let mut session = quiz(30);
        let timer = QuizTimer::new();
        let mut calls = 0;

        let exit = timer
            .run(|| {
                calls += 1;
                if calls == 3 {
                    session.submit();
                }
                session.tick()
            })
            .await;

        assert_eq!(exit, TimerExit::Stopped);
        assert_eq!(session.submitted_by(), Some(SubmitReason::Manual));
        assert_eq!(session.remaining_seconds(), Some(30 * 60 - 2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_ends_the_loop_without_submitting() {
        let mut session = quiz(1);
        let timer = QuizTimer::new();

        let (exit, ()) = tokio::join!(timer.run(|| session.tick()), async {
            tokio::time::sleep(Duration::from_millis(5_500)).await;
            timer.cancel();
        });

        assert_eq!(exit, TimerExit::Cancelled);
        assert!(timer.is_cancelled());
        assert!(!session.is_submitted());
        assert_eq!(session.remaining_seconds(), Some(55));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_returns_immediately() {
        let timer = QuizTimer::new();
        timer.cancel();
        let exit = timer.run(|| Tick::Running { remaining: 1 }).await;
        assert_eq!(exit, TimerExit::Cancelled);
    }
}
