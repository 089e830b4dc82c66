//! Discrete tele-op commands
//!
//! Each button edge maps to one command. Commands are one-shot: holding a
//! button issues its command once. The guide button is not in these tables:
//! the op-mode handles it after every mode handler so it always wins.

use crate::articulation::{CraneArticulation, RobotArticulation};
use crate::input::{Buttons, Edges};
use heapless::Vec;

/// Upper bound on commands issued in one tick
pub const MAX_COMMANDS: usize = 16;

/// Commands issued this tick, in execution order
pub type CommandList = Vec<TeleopCommand, MAX_COMMANDS>;

/// One discrete subsystem command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleopCommand {
    /// Close the gripper on a game element
    GripperSet,
    /// Raise the gripper
    GripperLift,
    /// Start or stop the duck spinner, polarity from the alliance
    ToggleDuckSpinner,
    Robot(RobotArticulation),
    Crane(CraneArticulation),
    CraneDump,
    /// Move the chassis length level by this many steps
    ChassisLevel(i32),
}

/// Controller one table
const GAMEPAD1_TABLE: &[(Buttons, TeleopCommand)] = &[
    (Buttons::X, TeleopCommand::GripperSet),
    (Buttons::B, TeleopCommand::GripperLift),
    (Buttons::A, TeleopCommand::ToggleDuckSpinner),
    (Buttons::Y, TeleopCommand::Robot(RobotArticulation::Transfer)),
    (Buttons::DPAD_RIGHT, TeleopCommand::Crane(CraneArticulation::Home)),
];

/// Controller two table
const GAMEPAD2_TABLE: &[(Buttons, TeleopCommand)] = &[
    (Buttons::X, TeleopCommand::Crane(CraneArticulation::Home)),
    (Buttons::B, TeleopCommand::CraneDump),
    (Buttons::A, TeleopCommand::ToggleDuckSpinner),
    (Buttons::DPAD_RIGHT, TeleopCommand::Crane(CraneArticulation::Home)),
    (Buttons::DPAD_DOWN, TeleopCommand::Crane(CraneArticulation::LowestTier)),
    (Buttons::DPAD_LEFT, TeleopCommand::Crane(CraneArticulation::MiddleTier)),
    (Buttons::DPAD_UP, TeleopCommand::Crane(CraneArticulation::HighTier)),
    (Buttons::Y, TeleopCommand::Robot(RobotArticulation::Transfer)),
];

/// Map this tick's edges to commands
pub fn map_buttons(edges: &Edges) -> CommandList {
    let mut commands = CommandList::new();

    // Both tables together are shorter than MAX_COMMANDS, so pushes cannot fail
    for &(button, command) in GAMEPAD1_TABLE {
        if edges.one(button) {
            let _ = commands.push(command);
        }
    }
    for &(button, command) in GAMEPAD2_TABLE {
        if edges.two(button) {
            let _ = commands.push(command);
        }
    }

    if edges.two(Buttons::RIGHT_BUMPER) {
        let _ = commands.push(TeleopCommand::ChassisLevel(1));
    } else if edges.two(Buttons::LEFT_BUMPER) {
        let _ = commands.push(TeleopCommand::ChassisLevel(-1));
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_edges_no_commands() {
        assert!(map_buttons(&Edges::default()).is_empty());
    }

    #[test]
    fn test_controller_one_table() {
        let commands = map_buttons(&Edges::new(Buttons::X | Buttons::Y, Buttons::empty()));
        assert_eq!(
            commands.as_slice(),
            &[
                TeleopCommand::GripperSet,
                TeleopCommand::Robot(RobotArticulation::Transfer)
            ]
        );
    }

    #[test]
    fn test_controller_two_tiers() {
        let commands = map_buttons(&Edges::new(
            Buttons::empty(),
            Buttons::DPAD_DOWN | Buttons::DPAD_UP,
        ));
        assert_eq!(
            commands.as_slice(),
            &[
                TeleopCommand::Crane(CraneArticulation::LowestTier),
                TeleopCommand::Crane(CraneArticulation::HighTier)
            ]
        );
    }

    #[test]
    fn test_same_button_differs_per_controller() {
        let one = map_buttons(&Edges::new(Buttons::B, Buttons::empty()));
        let two = map_buttons(&Edges::new(Buttons::empty(), Buttons::B));
        assert_eq!(one.as_slice(), &[TeleopCommand::GripperLift]);
        assert_eq!(two.as_slice(), &[TeleopCommand::CraneDump]);
    }

    #[test]
    fn test_chassis_level_right_bumper_wins() {
        let commands = map_buttons(&Edges::new(
            Buttons::empty(),
            Buttons::LEFT_BUMPER | Buttons::RIGHT_BUMPER,
        ));
        assert_eq!(commands.as_slice(), &[TeleopCommand::ChassisLevel(1)]);
    }

    #[test]
    fn test_chassis_level_ignores_controller_one() {
        let commands = map_buttons(&Edges::new(Buttons::RIGHT_BUMPER, Buttons::empty()));
        assert!(commands.is_empty());
    }

    #[test]
    fn test_guide_is_not_a_teleop_command() {
        let commands = map_buttons(&Edges::new(
            Buttons::GUIDE | Buttons::X,
            Buttons::GUIDE | Buttons::DPAD_UP,
        ));
        assert_eq!(
            commands.as_slice(),
            &[
                TeleopCommand::GripperSet,
                TeleopCommand::Crane(CraneArticulation::HighTier)
            ]
        );
    }

    #[test]
    fn test_everything_pressed_fits() {
        let commands = map_buttons(&Edges::new(Buttons::all(), Buttons::all()));
        assert_eq!(
            commands.len(),
            GAMEPAD1_TABLE.len() + GAMEPAD2_TABLE.len() + 1
        );
        assert!(commands.len() <= MAX_COMMANDS);
    }
}
