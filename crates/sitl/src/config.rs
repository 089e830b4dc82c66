//! Simulation configuration.

/// Physical and behavioral parameters of the simulated robot.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Linear velocity in m/s per unit of commanded forward.
    pub meters_per_forward_unit: f64,
    /// Angular velocity in rad/s per unit of commanded rotate.
    pub radians_per_rotate_unit: f64,
    /// Maximum linear speed in m/s.
    pub max_speed: f64,
    /// Maximum turn rate in rad/s.
    pub max_turn_rate: f64,
    /// Distance between the front wheels in meters.
    pub track_width: f64,
    /// Shortest chassis length in meters.
    pub chassis_length_min: f64,
    /// Longest chassis length in meters.
    pub chassis_length_max: f64,
    /// Kept off the slide's hard stop when fully extended, in meters.
    pub chassis_length_threshold: f64,
    /// Chassis length slew rate in m/s.
    pub chassis_slew_rate: f64,
    /// Servo slew rate in counts/s.
    pub servo_slew_rate: f64,
    /// Turret slew rate in rad/s.
    pub turret_slew_rate: f64,
    /// Duck spinner power magnitude used by toggles.
    pub duck_spinner_power: f64,
    /// Ticks each canned-routine drive leg lasts.
    pub routine_leg_ticks: u32,
    /// Ticks the duck spinner runs during autonomous.
    pub duck_spin_ticks: u32,
    /// RNG seed for deterministic vision. None = random.
    pub seed: Option<u64>,
    /// Make vision initialization fail.
    pub fail_vision_init: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            meters_per_forward_unit: 0.03,
            radians_per_rotate_unit: 0.01,
            max_speed: 1.5,
            max_turn_rate: 3.0,
            track_width: 0.308162,
            chassis_length_min: 0.0,
            chassis_length_max: 0.864,
            chassis_length_threshold: 0.1,
            chassis_slew_rate: 0.25,
            servo_slew_rate: 2_000.0,
            turret_slew_rate: 3.0,
            duck_spinner_power: 0.5,
            routine_leg_ticks: 50,
            duck_spin_ticks: 100,
            seed: None,
            fail_vision_init: false,
        }
    }
}

impl SimConfig {
    /// Deterministic configuration for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
