use clap::{App, Arg};
use lc3_vm::emulator::{Emulator, RunOutcome};
use lc3_vm::hardware::console::TerminalConsole;
use lc3_vm::terminal;
use log::{error, warn};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const EXIT_LOAD_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_INTERRUPTED: i32 = -2;

fn cli_config<'a>() -> clap::ArgMatches<'a> {
    let app = App::new("lc3")
        .about("Emulator for the LC-3 educational 16-bit architecture")
        .arg(
            Arg::with_name("image")
                .value_name("IMAGE")
                .help("LC-3 image files, loaded in command order")
                .multiple(true)
                .required(true),
        );
    match app.get_matches_safe() {
        Ok(matches) => matches,
        Err(e)
            if e.kind == clap::ErrorKind::HelpDisplayed
                || e.kind == clap::ErrorKind::VersionDisplayed =>
        {
            e.exit()
        }
        Err(_) => {
            println!("lc3 [image-file1] ...");
            process::exit(EXIT_USAGE);
        }
    }
}

fn main() {
    env_logger::init();
    let matches = cli_config();

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
        error!("cannot install the interrupt handler: {e}");
        process::exit(EXIT_LOAD_FAILURE);
    }

    let mut emu = Emulator::new(TerminalConsole::new());
    for path in matches
        .values_of("image")
        .expect("the image argument is required")
    {
        if let Err(e) = emu.load_image_file(path) {
            error!("{e}");
            println!("failed to load image: {path}");
            process::exit(EXIT_LOAD_FAILURE);
        }
    }

    // Raw mode is held until after the run so every exit path below restores
    // the previous terminal state.
    let raw_lock = match terminal::set_terminal_raw() {
        Ok(lock) => Some(lock),
        Err(e) => {
            warn!("cannot switch the terminal to raw mode: {e}");
            None
        }
    };
    let outcome = emu.run(&shutdown);
    drop(raw_lock);

    match outcome {
        Ok(RunOutcome::Halted) => {}
        Ok(RunOutcome::Interrupted) => {
            println!();
            process::exit(EXIT_INTERRUPTED);
        }
        Err(e) => {
            error!("{e}");
            process::abort();
        }
    }
}
