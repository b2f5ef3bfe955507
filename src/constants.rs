// Level and experience constants
pub const MAX_LEVEL: u32 = 55;
pub const DEATH_PENALTY_RATE: f64 = 0.05;

// Proficiency point curve (linear from MIN_PT at level 1 to MAX_PT at MAX_LEVEL)
pub const MIN_PT: u32 = 2;
pub const MAX_PT: u32 = 99;
pub const PT_EXP_BASE: f64 = 0.04;

// Combat timing constants
pub const BASE_TICK_MS: u64 = 1500;
pub const MIN_TICK_MS: u64 = 400;
pub const BASE_ATTACK_SPEED: u32 = 10;
pub const DAMAGE_VARIANCE: f64 = 0.20;

// Delay before the next encounter starts in continuous mode
pub const CONTINUE_DELAY_MS: u64 = 1200;

// Inventory constants
pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 8;
pub const GRID_SLOTS: usize = GRID_ROWS * GRID_COLS;
pub const MAX_STACK_SIZE: u32 = 99;

// Save system constants
pub const SAVE_VERSION: u32 = 2;
