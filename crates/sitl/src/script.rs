//! Scripted gamepads.
//!
//! A script is a list of timed holds replayed tick by tick. Each line is one
//! of
//!
//! ```text
//! <tick> play
//! <tick> <ticks> <pad> <control> [value]
//! ```
//!
//! `play` marks the tick at which the match starts. A hold keeps `control`
//! on gamepad `pad` (1 or 2) down for `ticks` ticks starting at `tick`.
//! Buttons take their flag name (`a`, `dpad_up`, `right_bumper`, ...), axes
//! (`left_stick_x`, `right_stick_y`, `left_trigger`, ...) take a value in
//! [-1, 1]. Blank lines and `#` comments are ignored.

use std::str::FromStr;

use reach_core::input::{Buttons, GamepadState};

use crate::error::SimError;

/// Demo match at 50 Hz: pregame setup, tele-op drive, scoring, emergency stop
pub const DEFAULT_SCRIPT: &str = "\
# Pregame: red alliance, lower start, debug telemetry on
2 1 1 b
6 1 1 a
10 1 1 dpad_down
20 play
# Activate tele-op and drive forward on gamepad 1
30 1 1 start
40 100 1 left_stick_y -1.0
40 100 1 right_stick_y -1.0
# Arcade turn on gamepad 2
160 50 2 left_stick_y -0.5
160 50 2 right_stick_x 0.5
# Extend the chassis, spin the duck, score high
220 1 2 right_bumper
230 1 1 a
330 1 1 a
340 1 2 dpad_up
420 1 2 b
440 1 2 dpad_right
# Emergency stop
500 1 1 guide
";

/// Analog gamepad inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

impl Axis {
    fn apply(self, pad: &mut GamepadState, value: f32) {
        match self {
            Axis::LeftStickX => pad.left_stick_x = value,
            Axis::LeftStickY => pad.left_stick_y = value,
            Axis::RightStickX => pad.right_stick_x = value,
            Axis::RightStickY => pad.right_stick_y = value,
            Axis::LeftTrigger => pad.left_trigger = value,
            Axis::RightTrigger => pad.right_trigger = value,
        }
    }
}

impl FromStr for Axis {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left_stick_x" => Ok(Axis::LeftStickX),
            "left_stick_y" => Ok(Axis::LeftStickY),
            "right_stick_x" => Ok(Axis::RightStickX),
            "right_stick_y" => Ok(Axis::RightStickY),
            "left_trigger" => Ok(Axis::LeftTrigger),
            "right_trigger" => Ok(Axis::RightTrigger),
            _ => Err(()),
        }
    }
}

/// What a hold drives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Buttons(Buttons),
    Axis(Axis, f32),
}

/// One timed hold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hold {
    pub start: u64,
    pub ticks: u64,
    /// 0 for gamepad 1, 1 for gamepad 2
    pub pad: usize,
    pub input: Input,
}

impl Hold {
    fn covers(&self, tick: u64) -> bool {
        tick >= self.start && tick - self.start < self.ticks
    }
}

/// Gamepad source replaying a script
#[derive(Debug, Clone, Default)]
pub struct ScriptedGamepads {
    holds: Vec<Hold>,
    play_tick: Option<u64>,
}

impl ScriptedGamepads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a script; errors name the offending line (1-based).
    pub fn parse(script: &str) -> Result<Self, SimError> {
        let mut gamepads = Self::new();
        for (index, raw) in script.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            gamepads
                .parse_line(line)
                .map_err(|message| SimError::Script {
                    line: index + 1,
                    message,
                })?;
        }
        Ok(gamepads)
    }

    fn parse_line(&mut self, line: &str) -> Result<(), String> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let tick = parse_field::<u64>(&fields, 0, "tick")?;

        if fields.get(1) == Some(&"play") {
            if fields.len() != 2 {
                return Err("unexpected fields after 'play'".to_string());
            }
            self.play_tick = Some(tick);
            return Ok(());
        }

        let ticks = parse_field::<u64>(&fields, 1, "duration")?;
        let pad = match parse_field::<usize>(&fields, 2, "gamepad")? {
            pad @ (1 | 2) => pad - 1,
            other => return Err(format!("gamepad must be 1 or 2, got {}", other)),
        };
        let control = fields
            .get(3)
            .ok_or_else(|| "missing control".to_string())?;

        let input = if let Ok(axis) = control.parse::<Axis>() {
            let value = parse_field::<f32>(&fields, 4, "axis value")?;
            if !(-1.0..=1.0).contains(&value) {
                return Err(format!("axis value {} outside [-1, 1]", value));
            }
            if fields.len() > 5 {
                return Err("unexpected fields after axis value".to_string());
            }
            Input::Axis(axis, value)
        } else {
            let buttons = Buttons::from_name(&control.to_ascii_uppercase())
                .ok_or_else(|| format!("unknown control '{}'", control))?;
            if fields.len() > 4 {
                return Err("buttons take no value".to_string());
            }
            Input::Buttons(buttons)
        };

        self.holds.push(Hold {
            start: tick,
            ticks,
            pad,
            input,
        });
        Ok(())
    }

    /// Hold `buttons` on `pad` (1 or 2) for `ticks` ticks from `start`.
    pub fn hold(&mut self, start: u64, ticks: u64, pad: usize, buttons: Buttons) -> &mut Self {
        self.holds.push(Hold {
            start,
            ticks,
            pad: pad.clamp(1, 2) - 1,
            input: Input::Buttons(buttons),
        });
        self
    }

    /// Press and release `buttons` on `pad` at `tick`.
    pub fn press(&mut self, tick: u64, pad: usize, buttons: Buttons) -> &mut Self {
        self.hold(tick, 1, pad, buttons)
    }

    /// Hold `axis` of `pad` at `value` for `ticks` ticks from `start`.
    pub fn axis(&mut self, start: u64, ticks: u64, pad: usize, axis: Axis, value: f32) -> &mut Self {
        self.holds.push(Hold {
            start,
            ticks,
            pad: pad.clamp(1, 2) - 1,
            input: Input::Axis(axis, value.clamp(-1.0, 1.0)),
        });
        self
    }

    pub fn play_at(&mut self, tick: u64) -> &mut Self {
        self.play_tick = Some(tick);
        self
    }

    /// Tick at which the match starts
    pub fn play_tick(&self) -> Option<u64> {
        self.play_tick
    }

    pub fn holds(&self) -> &[Hold] {
        &self.holds
    }

    /// Both gamepads as seen on `tick`
    pub fn sample(&self, tick: u64) -> [GamepadState; 2] {
        let mut pads = [GamepadState::IDLE; 2];
        for hold in self.holds.iter().filter(|hold| hold.covers(tick)) {
            let pad = &mut pads[hold.pad];
            match hold.input {
                Input::Buttons(buttons) => pad.buttons |= buttons,
                Input::Axis(axis, value) => axis.apply(pad, value),
            }
        }
        pads
    }

    /// Last tick any hold is active, or the play tick if later
    pub fn last_tick(&self) -> u64 {
        self.holds
            .iter()
            .map(|hold| hold.start + hold.ticks)
            .chain(self.play_tick)
            .max()
            .unwrap_or(0)
    }
}

fn parse_field<T: FromStr>(fields: &[&str], index: usize, what: &str) -> Result<T, String> {
    let field = fields
        .get(index)
        .ok_or_else(|| format!("missing {}", what))?;
    field
        .parse()
        .map_err(|_| format!("invalid {} '{}'", what, field))
}
