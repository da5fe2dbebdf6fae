//! Automatic lesson status transitions
//!
//! `rules` decides, `scheduler` polls and applies.

pub mod rules;
pub mod scheduler;

pub use rules::{RuleTable, RuleWindows, Transition, TransitionRule};
pub use scheduler::{CycleReport, LessonStatusTransitionService, TransitionScheduler};
