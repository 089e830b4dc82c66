//! Simulated autonomous suite.
//!
//! Routines are flat lists of legs executed one after another, one poll per
//! tick. The alliance routines score the pre-loaded element on the hub tier
//! read from the barcode, spin the carousel when starting on the lower side
//! and park.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reach_core::articulation::{CraneArticulation, RobotArticulation};
use reach_core::robot::{AutonomousSuite, Robot, Routine, RoutineKind, VisionProvider};
use reach_core::state::{Alliance, StartingPosition};
use reach_core::teleop::DriveCommand;

use crate::config::SimConfig;
use crate::vision::{BarcodePosition, ProviderKind, SimVision};

/// Hub tier used when no barcode position was detected
const DEFAULT_TIER: CraneArticulation = CraneArticulation::HighTier;

const DRIVE_FORWARD: f64 = 24.0;
const TURN_RATE: f64 = 157.0;

/// One segment of a routine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leg {
    /// Hold a drive command for a number of ticks, then stop
    Drive { command: DriveCommand, ticks: u32 },
    /// Poll a crane articulation until it completes
    Crane(CraneArticulation),
    /// Poll a robot articulation until it completes
    Articulate(RobotArticulation),
    Dump,
    /// Run the duck spinner for a number of ticks, then stop it
    DuckSpinner { power: f64, ticks: u32 },
}

/// Leg-by-leg routine
#[derive(Debug, Clone, Default)]
pub struct SimRoutine {
    name: &'static str,
    legs: Vec<Leg>,
    leg: usize,
    leg_ticks: u32,
    done: bool,
    completions: u32,
}

impl SimRoutine {
    pub fn new(name: &'static str, legs: Vec<Leg>) -> Self {
        Self {
            name,
            legs,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Index of the leg in progress
    pub fn leg(&self) -> usize {
        self.leg
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Times the routine ran to completion
    pub fn completions(&self) -> u32 {
        self.completions
    }

    /// Run one tick of `leg`; `true` once the leg is finished
    fn run_leg(&mut self, leg: Leg, robot: &mut dyn Robot) -> bool {
        match leg {
            Leg::Drive { command, ticks } => {
                self.leg_ticks += 1;
                if self.leg_ticks > ticks {
                    robot.drive_train().set_drive_power(DriveCommand::ZERO);
                    true
                } else {
                    robot.drive_train().set_drive_power(command);
                    false
                }
            }
            Leg::Crane(articulation) => robot.crane().articulate(articulation),
            Leg::Articulate(articulation) => robot.articulate(articulation),
            Leg::Dump => {
                robot.crane().dump();
                true
            }
            Leg::DuckSpinner { power, ticks } => {
                self.leg_ticks += 1;
                if self.leg_ticks > ticks {
                    robot.drive_train().set_duck_spinner_power(0.0);
                    true
                } else {
                    robot.drive_train().set_duck_spinner_power(power);
                    false
                }
            }
        }
    }
}

impl Routine for SimRoutine {
    fn execute(&mut self, robot: &mut dyn Robot) -> bool {
        if self.done {
            return false;
        }

        if let Some(leg) = self.legs.get(self.leg).copied() {
            if !self.run_leg(leg, robot) {
                return false;
            }
            self.leg += 1;
            self.leg_ticks = 0;
            if self.leg < self.legs.len() {
                return false;
            }
        }

        self.done = true;
        self.completions += 1;
        log::info!("Routine {} complete", self.name);
        true
    }

    fn reset(&mut self) {
        self.leg = 0;
        self.leg_ticks = 0;
        self.done = false;
    }
}

/// Alliance autonomous: score, optionally spin the carousel, park
pub fn autonomous_legs(
    alliance: Alliance,
    lower: bool,
    tier: CraneArticulation,
    config: &SimConfig,
) -> Vec<Leg> {
    let ticks = config.routine_leg_ticks;
    let sign = f64::from(alliance.modifier());

    let mut legs = vec![
        Leg::Drive {
            command: DriveCommand::new(DRIVE_FORWARD, 0.0),
            ticks,
        },
        Leg::Crane(tier),
        Leg::Dump,
        Leg::Crane(CraneArticulation::Home),
    ];
    if lower {
        legs.push(Leg::Drive {
            command: DriveCommand::new(-DRIVE_FORWARD, sign * TURN_RATE),
            ticks,
        });
        legs.push(Leg::DuckSpinner {
            power: sign * config.duck_spinner_power,
            ticks: config.duck_spin_ticks,
        });
    }
    legs.push(Leg::Drive {
        command: DriveCommand::new(-DRIVE_FORWARD, 0.0),
        ticks,
    });
    legs
}

pub fn back_and_forth_legs(config: &SimConfig) -> Vec<Leg> {
    let ticks = config.routine_leg_ticks;
    vec![
        Leg::Drive {
            command: DriveCommand::new(DRIVE_FORWARD, 0.0),
            ticks,
        },
        Leg::Drive {
            command: DriveCommand::new(-DRIVE_FORWARD, 0.0),
            ticks,
        },
    ]
}

pub fn square_legs(config: &SimConfig) -> Vec<Leg> {
    let ticks = config.routine_leg_ticks;
    (0..4)
        .flat_map(|_| {
            [
                Leg::Drive {
                    command: DriveCommand::new(DRIVE_FORWARD, 0.0),
                    ticks,
                },
                Leg::Drive {
                    command: DriveCommand::new(0.0, TURN_RATE),
                    ticks,
                },
            ]
        })
        .collect()
}

/// Routines plus the vision provider table
pub struct SimAutonomous {
    config: SimConfig,
    rng: StdRng,
    red: SimRoutine,
    blue: SimRoutine,
    back_and_forth: SimRoutine,
    square: SimRoutine,
    vision: SimVision,
    providers_created: u32,
    built: Option<(Alliance, StartingPosition)>,
}

impl SimAutonomous {
    pub fn new(config: SimConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let vision = SimVision::new(
            ProviderKind::TABLE[0],
            rng.gen(),
            config.fail_vision_init,
        );
        Self {
            red: SimRoutine::new(
                "Autonomous Red",
                autonomous_legs(Alliance::Red, false, DEFAULT_TIER, &config),
            ),
            blue: SimRoutine::new(
                "Autonomous Blue",
                autonomous_legs(Alliance::Blue, false, DEFAULT_TIER, &config),
            ),
            back_and_forth: SimRoutine::new("Back And Forth", back_and_forth_legs(&config)),
            square: SimRoutine::new("Square", square_legs(&config)),
            vision,
            rng,
            config,
            providers_created: 0,
            built: None,
        }
    }

    pub fn sim_routine(&self, kind: RoutineKind) -> &SimRoutine {
        match kind {
            RoutineKind::AutonomousRed => &self.red,
            RoutineKind::AutonomousBlue => &self.blue,
            RoutineKind::BackAndForth => &self.back_and_forth,
            RoutineKind::Square => &self.square,
        }
    }

    pub fn sim_vision(&self) -> &SimVision {
        &self.vision
    }

    pub fn providers_created(&self) -> u32 {
        self.providers_created
    }

    /// Alliance and start the routines were last built for
    pub fn built(&self) -> Option<(Alliance, StartingPosition)> {
        self.built
    }

    /// Hub tier the alliance routines score on
    pub fn tier(&self) -> CraneArticulation {
        self.vision
            .position()
            .map_or(DEFAULT_TIER, BarcodePosition::tier)
    }
}

impl AutonomousSuite for SimAutonomous {
    fn build(&mut self, alliance: Alliance, start: StartingPosition) {
        let lower = start == StartingPosition::lower(start.alliance());
        let tier = self.tier();
        self.red = SimRoutine::new(
            "Autonomous Red",
            autonomous_legs(Alliance::Red, lower, tier, &self.config),
        );
        self.blue = SimRoutine::new(
            "Autonomous Blue",
            autonomous_legs(Alliance::Blue, lower, tier, &self.config),
        );
        self.built = Some((alliance, start));
        log::info!(
            "Autonomous built for {} {} scoring {}",
            alliance.label(),
            start.label(),
            tier.name()
        );
    }

    fn routine(&mut self, kind: RoutineKind) -> &mut dyn Routine {
        match kind {
            RoutineKind::AutonomousRed => &mut self.red,
            RoutineKind::AutonomousBlue => &mut self.blue,
            RoutineKind::BackAndForth => &mut self.back_and_forth,
            RoutineKind::Square => &mut self.square,
        }
    }

    fn vision_provider_count(&self) -> usize {
        ProviderKind::TABLE.len()
    }

    fn create_vision_provider(&mut self, index: usize) {
        let kind = ProviderKind::TABLE[index % ProviderKind::TABLE.len()];
        self.vision = SimVision::new(kind, self.rng.gen(), self.config.fail_vision_init);
        self.providers_created += 1;
        log::info!("Vision provider {} created", kind.name());
    }

    fn vision_provider(&mut self) -> &mut dyn VisionProvider {
        &mut self.vision
    }

    fn vision_provider_ref(&self) -> &dyn VisionProvider {
        &self.vision
    }
}
