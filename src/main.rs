mod meter;
mod model;
mod storage;
mod tui;

use std::process;

use storage::Storage;

fn main() {
    let root = Storage::default_root().unwrap_or_else(|| {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    });

    let storage = match Storage::new(root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    match tui::run(&storage) {
        Ok(tickets) => {
            // The session's receipts, printed once the terminal is back.
            for ticket in tickets {
                println!("{ticket}");
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
