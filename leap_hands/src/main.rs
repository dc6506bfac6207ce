//! leap_hands — terminal entry point. Runs until any key is pressed.

use leap_hands::app::{init_logging, run_terminal, AppConfig};

fn main() {
    let cfg = AppConfig::from_env();

    if let Err(e) = init_logging(&cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // The terminal is restored by the time run_terminal returns.
    match run_terminal(&cfg) {
        Ok(summary) => {
            println!(
                "{} frames, {} points drawn, {} draw failures, {} recalibrations",
                summary.iterations,
                summary.points_drawn,
                summary.draw_failures,
                summary.recalibrations,
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
