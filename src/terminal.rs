//! Controlling-terminal setup and teardown.
//!
//! While a program runs, keystrokes must reach the guest one at a time,
//! without line buffering and without local echo. The settings found at
//! startup are restored when the guard drops, or by [`interrupt_exit`] when
//! SIGINT cuts the session short.

use std::io::stdin;
use std::os::fd::{AsRawFd, RawFd};
use std::process;
use std::sync::OnceLock;
use termios::{Termios, ECHO, ICANON, TCSANOW};

/// Exit status reported after an interrupt.
pub const INTERRUPT_EXIT_CODE: i32 = 254;

static STARTUP_SETTINGS: OnceLock<(RawFd, Termios)> = OnceLock::new();

/// Restores the captured terminal settings when dropped.
pub struct TerminalModeGuard {
    fd: RawFd,
    startup: Termios,
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        // nothing left to do if the terminal refuses the settings
        let _ = termios::tcsetattr(self.fd, TCSANOW, &self.startup);
    }
}

/// Switches stdin to unbuffered input without echo.
///
/// Only `ICANON` and `ECHO` are cleared; `ISIG` stays set, so Ctrl-C still
/// raises a real SIGINT and cancellation works even while the guest never
/// touches the keyboard. See [`install_interrupt_handler`].
///
/// # Errors
/// - stdin is not a terminal, or the settings cannot be applied
pub fn unbuffered_input() -> Result<TerminalModeGuard, std::io::Error> {
    let fd = stdin().as_raw_fd();
    let startup = Termios::from_fd(fd)?;
    let _ = STARTUP_SETTINGS.set((fd, startup));
    let mut unbuffered = startup;
    unbuffered.c_lflag &= !(ICANON | ECHO);
    termios::tcsetattr(fd, TCSANOW, &unbuffered)?;
    Ok(TerminalModeGuard { fd, startup })
}

/// Registers a SIGINT handler that routes to [`interrupt_exit`].
///
/// The handler preempts execution asynchronously, independent of whatever
/// the guest program is doing.
///
/// # Errors
/// - a handler is already installed for this process
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| interrupt_exit())
}

/// Restores the terminal and ends the process after an interrupt.
pub fn interrupt_exit() -> ! {
    if let Some((fd, startup)) = STARTUP_SETTINGS.get() {
        let _ = termios::tcsetattr(*fd, TCSANOW, startup);
    }
    println!();
    process::exit(INTERRUPT_EXIT_CODE);
}
