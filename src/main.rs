use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use lc3_vm::{terminal, Emulator};

/// Runs LC-3 program images on an emulated machine.
#[derive(Parser)]
#[command(name = "lc3", version, about)]
struct Args {
    /// Program images to load, in load order
    #[arg(value_name = "IMAGE-FILE", required = true)]
    images: Vec<PathBuf>,
}

fn main() -> ExitCode {
    // Ctrl-C must restore the terminal no matter what the guest is doing
    let _ = terminal::install_interrupt_handler();

    let args = Args::parse();

    let mut emulator = Emulator::new();
    for path in &args.images {
        if let Err(error) = emulator.load_image_file(path) {
            eprintln!("{error}");
            return ExitCode::from(1);
        }
    }

    // keystrokes must reach the guest unbuffered and without echo; a
    // non-terminal stdin runs with its default settings
    let _input_mode = terminal::unbuffered_input().ok();

    match emulator.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(1)
        }
    }
}
