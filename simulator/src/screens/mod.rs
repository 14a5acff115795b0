mod startup;

pub use startup::{run_splash, run_sweep};
