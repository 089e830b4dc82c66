//! Articulation dispatch
//!
//! An articulation is a named, multi-step motion a subsystem runs across
//! many ticks. The op-mode requests one by name and polls it with the same
//! call until it reports completion; nothing blocks.
//!
//! [`ArticulationRunner`] implements that protocol once so every subsystem
//! shares the same semantics:
//!
//! - the first request applies step 0 of the plan
//! - later calls advance when the current step's settle time has elapsed
//! - completion returns `true`; asking again for the articulation that just
//!   completed is a no-op that returns `true`
//! - a different request abandons the one in flight and restarts
//!
//! [`RoutineLatch`] gives canned routines the "true exactly once, then inert
//! until re-armed" behavior the op-mode relies on.

/// Whole-robot articulations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotArticulation {
    /// Fold into the starting envelope
    Init,
    /// Unfold at match start
    Start,
    /// Hand the game element from gripper to crane
    Transfer,
    /// Exercise every actuator once
    Diagnostic,
}

impl RobotArticulation {
    pub const fn name(self) -> &'static str {
        match self {
            RobotArticulation::Init => "INIT",
            RobotArticulation::Start => "START",
            RobotArticulation::Transfer => "TRANSFER",
            RobotArticulation::Diagnostic => "DIAGNOSTIC",
        }
    }
}

/// Crane articulations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraneArticulation {
    Home,
    LowestTier,
    MiddleTier,
    HighTier,
}

impl CraneArticulation {
    pub const fn name(self) -> &'static str {
        match self {
            CraneArticulation::Home => "HOME",
            CraneArticulation::LowestTier => "LOWEST_TIER",
            CraneArticulation::MiddleTier => "MIDDLE_TIER",
            CraneArticulation::HighTier => "HIGH_TIER",
        }
    }
}

/// One step of an articulation plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArticulationStep<T> {
    /// Setpoint applied when the step begins
    pub target: T,
    /// Time the step needs before the next one may begin
    pub settle_ns: u64,
}

impl<T> ArticulationStep<T> {
    pub const fn new(target: T, settle_ns: u64) -> Self {
        Self { target, settle_ns }
    }
}

/// Step runner for one subsystem's articulations
#[derive(Debug, Clone, Copy)]
pub struct ArticulationRunner<A> {
    current: Option<A>,
    step: usize,
    step_started_ns: u64,
    completed: Option<A>,
}

impl<A: Copy + PartialEq> ArticulationRunner<A> {
    pub const fn new() -> Self {
        Self {
            current: None,
            step: 0,
            step_started_ns: 0,
            completed: None,
        }
    }

    /// Articulation currently in progress
    pub fn in_flight(&self) -> Option<A> {
        self.current
    }

    /// Most recently completed articulation
    pub fn completed(&self) -> Option<A> {
        self.completed
    }

    /// Index of the step in progress
    pub fn step_index(&self) -> usize {
        self.step
    }

    /// Request or continue `request`, applying setpoints through `apply`
    ///
    /// Returns `true` once every step of `steps` has been applied and has
    /// settled.
    pub fn advance<T: Copy>(
        &mut self,
        request: A,
        steps: &[ArticulationStep<T>],
        now_ns: u64,
        mut apply: impl FnMut(T),
    ) -> bool {
        if self.current != Some(request) {
            if self.current.is_none() && self.completed == Some(request) {
                return true;
            }
            self.current = Some(request);
            self.completed = None;
            self.step = 0;
            self.step_started_ns = now_ns;
            match steps.first() {
                Some(first) => apply(first.target),
                None => return self.finish(),
            }
        }

        loop {
            let Some(step) = steps.get(self.step) else {
                return self.finish();
            };
            if now_ns.saturating_sub(self.step_started_ns) < step.settle_ns {
                return false;
            }
            self.step += 1;
            match steps.get(self.step) {
                Some(next) => {
                    apply(next.target);
                    self.step_started_ns = now_ns;
                }
                None => return self.finish(),
            }
        }
    }

    /// Drop any in-flight articulation
    pub fn cancel(&mut self) {
        self.current = None;
        self.completed = None;
        self.step = 0;
    }

    fn finish(&mut self) -> bool {
        self.completed = self.current.take();
        self.step = 0;
        true
    }
}

impl<A: Copy + PartialEq> Default for ArticulationRunner<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports a routine's completion exactly once
///
/// After the wrapped poll first returns `true` the latch stops polling and
/// returns `false` until [`RoutineLatch::rearm`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutineLatch {
    done: bool,
}

impl RoutineLatch {
    pub const fn new() -> Self {
        Self { done: false }
    }

    /// Poll the routine unless it already completed
    pub fn poll(&mut self, routine: impl FnOnce() -> bool) -> bool {
        if self.done {
            return false;
        }
        self.done = routine();
        self.done
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn rearm(&mut self) {
        self.done = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    const PLAN: [ArticulationStep<i32>; 3] = [
        ArticulationStep::new(10, 100 * MS),
        ArticulationStep::new(20, 50 * MS),
        ArticulationStep::new(30, 0),
    ];

    #[test]
    fn test_first_request_applies_step_zero() {
        let mut runner = ArticulationRunner::new();
        let mut applied = 0;
        assert!(!runner.advance(CraneArticulation::Home, &PLAN, 0, |t| applied = t));
        assert_eq!(applied, 10);
        assert_eq!(runner.in_flight(), Some(CraneArticulation::Home));
    }

    #[test]
    fn test_steps_advance_after_settle() {
        let mut runner = ArticulationRunner::new();
        let mut applied = 0;
        let home = CraneArticulation::Home;

        runner.advance(home, &PLAN, 0, |t| applied = t);
        assert!(!runner.advance(home, &PLAN, 99 * MS, |t| applied = t));
        assert_eq!(applied, 10);

        assert!(!runner.advance(home, &PLAN, 100 * MS, |t| applied = t));
        assert_eq!(applied, 20);
        assert_eq!(runner.step_index(), 1);

        // Last step has no settle time
        assert!(runner.advance(home, &PLAN, 150 * MS, |t| applied = t));
        assert_eq!(applied, 30);
        assert_eq!(runner.in_flight(), None);
        assert_eq!(runner.completed(), Some(home));
    }

    #[test]
    fn test_repeat_after_completion_is_noop() {
        let mut runner = ArticulationRunner::new();
        let mut calls = 0;
        let plan = [ArticulationStep::new(1, 0)];

        assert!(runner.advance(RobotArticulation::Start, &plan, 0, |_| calls += 1));
        assert!(runner.advance(RobotArticulation::Start, &plan, 5, |_| calls += 1));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_different_request_restarts() {
        let mut runner = ArticulationRunner::new();
        let mut applied = 0;

        runner.advance(CraneArticulation::HighTier, &PLAN, 0, |t| applied = t);
        runner.advance(CraneArticulation::HighTier, &PLAN, 100 * MS, |t| applied = t);
        assert_eq!(applied, 20);

        let low = [ArticulationStep::new(-5, 10 * MS)];
        assert!(!runner.advance(CraneArticulation::LowestTier, &low, 101 * MS, |t| applied = t));
        assert_eq!(applied, -5);
        assert!(runner.advance(CraneArticulation::LowestTier, &low, 111 * MS, |t| applied = t));
    }

    #[test]
    fn test_cancel() {
        let mut runner = ArticulationRunner::new();
        runner.advance(CraneArticulation::Home, &PLAN, 0, |_| {});
        runner.cancel();
        assert_eq!(runner.in_flight(), None);
        assert_eq!(runner.completed(), None);
    }

    #[test]
    fn test_empty_plan_completes_immediately() {
        let mut runner = ArticulationRunner::<RobotArticulation>::new();
        let empty: [ArticulationStep<i32>; 0] = [];
        assert!(runner.advance(RobotArticulation::Init, &empty, 0, |_| {}));
    }

    #[test]
    fn test_routine_latch_fires_once() {
        let polls = core::cell::Cell::new(0);
        let poll = |done: bool| {
            polls.set(polls.get() + 1);
            done
        };

        let mut latch = RoutineLatch::new();
        assert!(!latch.poll(|| poll(false)));
        assert!(latch.poll(|| poll(true)));
        assert!(!latch.poll(|| poll(true)));
        assert!(latch.is_done());
        assert_eq!(polls.get(), 2);

        latch.rearm();
        assert!(latch.poll(|| poll(true)));
        assert_eq!(polls.get(), 3);
    }

    #[test]
    fn test_names() {
        assert_eq!(RobotArticulation::Transfer.name(), "TRANSFER");
        assert_eq!(CraneArticulation::MiddleTier.name(), "MIDDLE_TIER");
    }
}
