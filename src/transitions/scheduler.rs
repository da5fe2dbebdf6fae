//! Lesson status poller
//!
//! Periodically fetches the lessons the rule table can still act on,
//! evaluates them and asks the backend to apply due transitions. Nothing is
//! persisted locally: a failed request leaves the lesson as it was and the
//! next cycle re-evaluates it.

use std::time::Duration;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn, error, debug};
use crate::services::LessonService;
use crate::utils::errors::Result;
use crate::utils::logging::log_lesson_transition;
use super::rules::RuleTable;

/// Outcome of a single poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub evaluated: usize,
    pub applied: usize,
    pub failed: usize,
}

/// Evaluates the rule table against the backend's lessons
#[derive(Clone)]
pub struct LessonStatusTransitionService {
    lessons: LessonService,
    rules: RuleTable,
}

impl LessonStatusTransitionService {
    /// Create a new LessonStatusTransitionService instance
    pub fn new(lessons: LessonService, rules: RuleTable) -> Self {
        Self { lessons, rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Run one poll cycle as of `now`
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<CycleReport> {
        let lessons = self.lessons.list_active().await?;
        let transitions = self.rules.evaluate_all(&lessons, now);

        let mut report = CycleReport {
            evaluated: lessons.len(),
            ..Default::default()
        };

        for transition in transitions {
            match self.lessons.update_status(transition.lesson_id, transition.to).await {
                Ok(_) => {
                    report.applied += 1;
                    log_lesson_transition(transition.lesson_id, transition.from, transition.to, transition.rule, true);
                }
                Err(e) => {
                    report.failed += 1;
                    log_lesson_transition(transition.lesson_id, transition.from, transition.to, transition.rule, false);
                    warn!(lesson_id = transition.lesson_id, error = %e, "Status update request failed");
                }
            }
        }

        debug!(
            evaluated = report.evaluated,
            applied = report.applied,
            failed = report.failed,
            "Transition cycle finished"
        );
        Ok(report)
    }
}

/// Owns the background poll task; dropping it stops polling
#[derive(Debug)]
pub struct TransitionScheduler {
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl TransitionScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: None,
        }
    }

    /// Spawn the poll loop. The first cycle runs immediately.
    pub fn start(&mut self, service: LessonStatusTransitionService) {
        if self.is_running() {
            warn!("Transition scheduler is already running");
            return;
        }

        let period = self.interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match service.run_cycle(Utc::now()).await {
                    Ok(report) => {
                        if report.applied > 0 || report.failed > 0 {
                            info!(
                                applied = report.applied,
                                failed = report.failed,
                                "Transition cycle changed lessons"
                            );
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Transition cycle failed to fetch lessons");
                    }
                }
            }
        });

        self.handle = Some(handle);
        info!("Started lesson transition scheduler with interval {:?}", self.interval);
    }

    /// Abort the poll loop
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Stopped lesson transition scheduler");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TransitionScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
