//! mealsheet main entrypoint.

use mealsheet::run;

fn main() {
    if let Err(e) = run() {
        mealsheet::ui::messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
