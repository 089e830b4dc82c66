//! Simulated vision providers.
//!
//! Each provider reports which of the three barcode positions holds the team
//! shipping element. The pipeline entry samples the position from a seeded
//! RNG when it starts; the fixed entry always sees the middle position.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reach_core::articulation::CraneArticulation;
use reach_core::robot::{TelemetryProvider, VisionProvider};
use reach_core::telemetry::TelemetryMap;
use reach_core::VisionError;

/// Barcode position of the team shipping element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodePosition {
    Left,
    Middle,
    Right,
}

impl BarcodePosition {
    pub const ALL: [Self; 3] = [Self::Left, Self::Middle, Self::Right];

    pub const fn label(self) -> &'static str {
        match self {
            BarcodePosition::Left => "LEFT",
            BarcodePosition::Middle => "MIDDLE",
            BarcodePosition::Right => "RIGHT",
        }
    }

    /// Shipping hub tier scored for this position
    pub const fn tier(self) -> CraneArticulation {
        match self {
            BarcodePosition::Left => CraneArticulation::LowestTier,
            BarcodePosition::Middle => CraneArticulation::MiddleTier,
            BarcodePosition::Right => CraneArticulation::HighTier,
        }
    }
}

/// Entries of the vision provider table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Randomized detection, stands in for the camera pipeline
    Pipeline,
    /// Always reports the middle position
    Fixed,
}

impl ProviderKind {
    pub const TABLE: [Self; 2] = [Self::Pipeline, Self::Fixed];

    pub const fn name(self) -> &'static str {
        match self {
            ProviderKind::Pipeline => "Pipeline",
            ProviderKind::Fixed => "Fixed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimVision {
    kind: ProviderKind,
    rng: StdRng,
    fail_init: bool,
    initialized: bool,
    position: Option<BarcodePosition>,
    frames: u64,
    saved_images: u32,
}

impl SimVision {
    pub fn new(kind: ProviderKind, seed: u64, fail_init: bool) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
            fail_init,
            initialized: false,
            position: None,
            frames: 0,
            saved_images: 0,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Most recent detection, kept after shutdown
    pub fn position(&self) -> Option<BarcodePosition> {
        self.position
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn saved_images(&self) -> u32 {
        self.saved_images
    }
}

impl TelemetryProvider for SimVision {
    fn telemetry(&self, debug: bool) -> TelemetryMap {
        let mut map = TelemetryMap::new();
        map.put("Provider", self.kind.name());
        map.put("Initialized", self.initialized);
        map.put(
            "Position",
            self.position.map_or("UNKNOWN", BarcodePosition::label),
        );
        if debug {
            map.put("Frames", self.frames as i64);
            map.put("Saved Images", self.saved_images as i64);
        }
        map
    }

    fn telemetry_name(&self) -> &'static str {
        "Vision"
    }
}

impl VisionProvider for SimVision {
    fn initialize_vision(&mut self) -> Result<(), VisionError> {
        if self.fail_init {
            return Err(VisionError::InitFailed);
        }
        self.initialized = true;
        self.position = Some(match self.kind {
            ProviderKind::Pipeline => {
                BarcodePosition::ALL[self.rng.gen_range(0..BarcodePosition::ALL.len())]
            }
            ProviderKind::Fixed => BarcodePosition::Middle,
        });
        log::info!("Vision provider {} initialized", self.kind.name());
        Ok(())
    }

    fn shutdown_vision(&mut self) -> Result<(), VisionError> {
        if !self.initialized {
            return Err(VisionError::NotInitialized);
        }
        self.initialized = false;
        log::info!("Vision provider {} shut down", self.kind.name());
        Ok(())
    }

    fn update(&mut self) {
        if self.initialized {
            self.frames += 1;
        }
    }

    fn save_dashboard_image(&mut self) -> Result<(), VisionError> {
        if !self.initialized {
            return Err(VisionError::NotInitialized);
        }
        self.saved_images += 1;
        Ok(())
    }
}
