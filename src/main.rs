use clap::Parser;
use lc3_vm::emulator;
use lc3_vm::errors::ExecutionError;
use lc3_vm::hardware::{KeyboardInputProvider, ReaderInputProvider, TerminalInputProvider};
use lc3_vm::terminal;
use log::info;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_LOAD_FAILURE: u8 = 1;
const EXIT_EXECUTION_FAILURE: u8 = 1;
const EXIT_INTERRUPTED: u8 = 130;

/// Virtual machine for LC-3 programs.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Program images to load in order, later images overwrite earlier ones where they overlap
    #[arg(required = true, value_name = "IMAGE-FILE")]
    images: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let lock = terminal::set_terminal_raw();
    // without raw mode there are no key events to poll, input is read from stdin as is
    let keyboard: Box<dyn KeyboardInputProvider> = if lock.is_enabled() {
        Box::new(TerminalInputProvider::new())
    } else {
        Box::new(ReaderInputProvider::new(stdin()))
    };
    let mut emu = match emulator::from_images(&args.images, keyboard) {
        Ok(emu) => emu,
        Err(e) => {
            drop(lock);
            eprintln!("{e}");
            return ExitCode::from(EXIT_LOAD_FAILURE);
        }
    };
    info!("Loaded {} image(s)", args.images.len());

    let result = {
        let mut out = terminal::RawModeWriter::new(stdout().lock(), lock.is_enabled());
        emu.execute(&mut out)
    };
    drop(lock);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(ExecutionError::Interrupted) => {
            eprintln!("{}", ExecutionError::Interrupted);
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(EXIT_EXECUTION_FAILURE)
        }
    }
}
