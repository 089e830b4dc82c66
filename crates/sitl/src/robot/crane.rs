//! Simulated crane: turret, shoulder, elbow and wrist.

use reach_core::articulation::{ArticulationRunner, ArticulationStep, CraneArticulation};
use reach_core::robot::{Crane, TelemetryProvider, SERVO_MAX, SERVO_MIN};
use reach_core::telemetry::TelemetryMap;
use reach_core::traits::TimeSource;

use super::{approach, normalize_angle, MS};
use crate::config::SimConfig;
use crate::time::SitlTimeSource;

/// Wrist target that tips the bucket over
const DUMP_WRIST: i32 = 2_000;

/// Joint setpoints for one articulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CranePose {
    pub shoulder: i32,
    pub elbow: i32,
    pub wrist: i32,
    pub turret: f64,
}

impl CranePose {
    pub const fn new(shoulder: i32, elbow: i32, wrist: i32, turret: f64) -> Self {
        Self {
            shoulder,
            elbow,
            wrist,
            turret,
        }
    }
}

const HOME: [ArticulationStep<CranePose>; 1] =
    [ArticulationStep::new(CranePose::new(1500, 1500, 1500, 0.0), 600 * MS)];

const LOWEST_TIER: [ArticulationStep<CranePose>; 2] = [
    ArticulationStep::new(CranePose::new(1650, 1500, 1500, 0.0), 300 * MS),
    ArticulationStep::new(CranePose::new(1750, 1350, 1450, 0.0), 500 * MS),
];

const MIDDLE_TIER: [ArticulationStep<CranePose>; 2] = [
    ArticulationStep::new(CranePose::new(1650, 1500, 1500, 0.0), 300 * MS),
    ArticulationStep::new(CranePose::new(1900, 1200, 1350, 0.0), 600 * MS),
];

const HIGH_TIER: [ArticulationStep<CranePose>; 3] = [
    ArticulationStep::new(CranePose::new(1650, 1500, 1500, 0.0), 300 * MS),
    ArticulationStep::new(CranePose::new(2000, 1300, 1400, 0.0), 400 * MS),
    ArticulationStep::new(CranePose::new(2150, 1000, 1250, 0.0), 500 * MS),
];

/// Step plan for a crane articulation
pub fn crane_plan(articulation: CraneArticulation) -> &'static [ArticulationStep<CranePose>] {
    match articulation {
        CraneArticulation::Home => &HOME,
        CraneArticulation::LowestTier => &LOWEST_TIER,
        CraneArticulation::MiddleTier => &MIDDLE_TIER,
        CraneArticulation::HighTier => &HIGH_TIER,
    }
}

#[derive(Debug, Clone)]
pub struct SimCrane {
    time: SitlTimeSource,
    servo_slew_rate: f64,
    turret_slew_rate: f64,
    runner: ArticulationRunner<CraneArticulation>,
    target: CranePose,
    shoulder_pos: f64,
    elbow_pos: f64,
    wrist_pos: f64,
    turret_angle: f64,
    dumps: u32,
}

impl SimCrane {
    pub fn new(config: &SimConfig, time: SitlTimeSource) -> Self {
        let home = HOME[0].target;
        Self {
            time,
            servo_slew_rate: config.servo_slew_rate,
            turret_slew_rate: config.turret_slew_rate,
            runner: ArticulationRunner::new(),
            target: home,
            shoulder_pos: home.shoulder as f64,
            elbow_pos: home.elbow as f64,
            wrist_pos: home.wrist as f64,
            turret_angle: home.turret,
            dumps: 0,
        }
    }

    fn apply(&mut self, pose: CranePose) {
        self.set_shoulder_target(pose.shoulder);
        self.set_elbow_target(pose.elbow);
        self.set_wrist_target(pose.wrist);
        self.set_turret_target_angle(pose.turret);
    }

    /// Continue any in-flight articulation and move joints toward their
    /// targets over `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        if let Some(articulation) = self.runner.in_flight() {
            self.articulate(articulation);
        }

        let servo_step = self.servo_slew_rate * dt;
        self.shoulder_pos = approach(self.shoulder_pos, self.target.shoulder as f64, servo_step);
        self.elbow_pos = approach(self.elbow_pos, self.target.elbow as f64, servo_step);
        self.wrist_pos = approach(self.wrist_pos, self.target.wrist as f64, servo_step);
        self.turret_angle = approach(
            self.turret_angle,
            self.target.turret,
            self.turret_slew_rate * dt,
        );
    }

    /// Abandon any in-flight articulation, holding current targets.
    pub fn cancel(&mut self) {
        self.runner.cancel();
    }

    pub fn in_flight(&self) -> Option<CraneArticulation> {
        self.runner.in_flight()
    }

    pub fn completed(&self) -> Option<CraneArticulation> {
        self.runner.completed()
    }

    pub fn dumps(&self) -> u32 {
        self.dumps
    }

    pub fn shoulder_pos(&self) -> f64 {
        self.shoulder_pos
    }
}

impl TelemetryProvider for SimCrane {
    fn telemetry(&self, debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put(
            "Articulation",
            self.runner.in_flight().map_or("IDLE", CraneArticulation::name),
        );
        map.put("Shoulder Target", self.target.shoulder);
        map.put("Elbow Target", self.target.elbow);
        map.put("Wrist Target", self.target.wrist);
        map.put("Turret Target Angle", self.target.turret.to_degrees());

        if debug {
            map.put("Articulation Step", self.runner.step_index());
            map.put("Shoulder Pos", self.shoulder_pos);
            map.put("Elbow Pos", self.elbow_pos);
            map.put("Wrist Pos", self.wrist_pos);
            map.put("Turret Angle", self.turret_angle.to_degrees());
            map.put("Dumps", self.dumps as i64);
        }
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Crane"
    }
}

impl Crane for SimCrane {
    fn articulate(&mut self, articulation: CraneArticulation) -> bool {
        let now = self.time.now_ns();
        let mut applied = None;
        let done = self
            .runner
            .advance(articulation, crane_plan(articulation), now, |pose| {
                applied = Some(pose)
            });
        if let Some(pose) = applied {
            self.apply(pose);
        }
        done
    }

    fn dump(&mut self) {
        self.set_wrist_target(DUMP_WRIST);
        self.dumps += 1;
        log::debug!("Crane dump {}", self.dumps);
    }

    fn shoulder_target(&self) -> i32 {
        self.target.shoulder
    }

    fn set_shoulder_target(&mut self, counts: i32) {
        self.target.shoulder = counts.clamp(SERVO_MIN, SERVO_MAX);
    }

    fn elbow_target(&self) -> i32 {
        self.target.elbow
    }

    fn set_elbow_target(&mut self, counts: i32) {
        self.target.elbow = counts.clamp(SERVO_MIN, SERVO_MAX);
    }

    fn wrist_target(&self) -> i32 {
        self.target.wrist
    }

    fn set_wrist_target(&mut self, counts: i32) {
        self.target.wrist = counts.clamp(SERVO_MIN, SERVO_MAX);
    }

    fn turret_target_angle(&self) -> f64 {
        self.target.turret
    }

    fn set_turret_target_angle(&mut self, angle: f64) {
        self.target.turret = normalize_angle(angle);
    }
}
