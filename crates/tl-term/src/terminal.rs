// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, signals, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, sigaction, pipe, poll, and raw
// fd reads and writes. These are the POSIX interfaces for terminal
// control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// The session is single-threaded and waits for input with poll(). Signals
// reach that wait through a self-pipe: the handler sets a flag and writes
// one byte to the pipe, and the pipe is polled alongside stdin. A signal
// that lands between checking the flag and entering poll() still leaves a
// byte behind, so the wait returns at once.
//
//   SIGWINCH → resize flag, reported as a `Resize` event
//   SIGINT   → interrupt flag, ends the run loop (session only)
//
// Raw mode keeps ISIG on, like curses cbreak mode, so Ctrl-C raises SIGINT
// instead of arriving as a key.
//
// The panic hook bypasses Rust's stdout lock and writes a pre-built
// restore sequence directly to fd 1, then restores termios from a global
// backup, then hands over to the original hook so the message lands on a
// working terminal.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use tracing::debug;

use crate::ansi;
use crate::geometry::Size;

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size::new(ws.ws_col, ws.ws_row))
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether both stdin and stdout are connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 && libc::isatty(libc::STDOUT_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Signals ────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler, cleared by [`take_resize`].
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// Set by the SIGINT handler, cleared by [`take_interrupt`].
static INTERRUPT_PENDING: AtomicBool = AtomicBool::new(false);

/// Read and write ends of the wakeup pipe, `-1` until created.
#[cfg(unix)]
static WAKE_READ: std::sync::atomic::AtomicI32 = std::sync::atomic::AtomicI32::new(-1);
#[cfg(unix)]
static WAKE_WRITE: std::sync::atomic::AtomicI32 = std::sync::atomic::AtomicI32::new(-1);

static SIGWINCH_INSTALLED: Once = Once::new();

/// SIGINT disposition saved by [`Terminal::enter`], put back by
/// [`Terminal::leave`].
#[cfg(unix)]
static SAVED_SIGINT: Mutex<Option<libc::sigaction>> = Mutex::new(None);

/// Create the wakeup pipe and install the SIGWINCH handler, once per
/// process.
#[cfg(unix)]
fn install_sigwinch_handler() {
    SIGWINCH_INSTALLED.call_once(|| unsafe {
        let mut fds: [libc::c_int; 2] = [-1, -1];
        if libc::pipe(fds.as_mut_ptr()) == 0 {
            for fd in fds {
                let flags = libc::fcntl(fd, libc::F_GETFL);
                libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
                libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC);
            }
            WAKE_READ.store(fds[0], Ordering::Relaxed);
            WAKE_WRITE.store(fds[1], Ordering::Relaxed);
        }
        let sa = handler_action();
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    });
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

#[cfg(unix)]
fn handler_action() -> libc::sigaction {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = signal_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        sa
    }
}

/// Only async-signal-safe work: atomic stores and one `write`.
#[cfg(unix)]
extern "C" fn signal_handler(sig: libc::c_int) {
    if sig == libc::SIGWINCH {
        RESIZE_PENDING.store(true, Ordering::Relaxed);
    } else {
        INTERRUPT_PENDING.store(true, Ordering::Relaxed);
    }
    let fd = WAKE_WRITE.load(Ordering::Relaxed);
    if fd >= 0 {
        // A full pipe already holds a pending wakeup.
        let byte = 1u8;
        unsafe {
            let _ = libc::write(fd, (&raw const byte).cast::<libc::c_void>(), 1);
        }
    }
}

/// Route SIGINT to the interrupt flag, saving the previous disposition.
#[cfg(unix)]
fn catch_interrupt() {
    let sa = handler_action();
    let mut old: libc::sigaction = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::sigaction(libc::SIGINT, &raw const sa, &raw mut old) };
    if rc == 0 {
        if let Ok(mut guard) = SAVED_SIGINT.lock() {
            *guard = Some(old);
        }
    }
}

#[cfg(not(unix))]
fn catch_interrupt() {}

#[cfg(unix)]
fn release_interrupt() {
    if let Ok(mut guard) = SAVED_SIGINT.lock() {
        if let Some(old) = guard.take() {
            unsafe {
                libc::sigaction(libc::SIGINT, &raw const old, std::ptr::null_mut());
            }
        }
    }
}

#[cfg(not(unix))]
fn release_interrupt() {}

/// Empty the wakeup pipe.
#[cfg(unix)]
fn drain_wakeups() {
    let fd = WAKE_READ.load(Ordering::Relaxed);
    if fd < 0 {
        return;
    }
    let mut buf = [0u8; 64];
    loop {
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()) };
        if n <= 0 {
            break;
        }
    }
}

/// Consume a pending resize notification.
pub fn take_resize() -> bool {
    RESIZE_PENDING.swap(false, Ordering::Relaxed)
}

/// Consume a pending Ctrl-C.
pub fn take_interrupt() -> bool {
    INTERRUPT_PENDING.swap(false, Ordering::Relaxed)
}

/// Mark a Ctrl-C as pending, as the SIGINT handler does.
#[cfg(test)]
pub(crate) fn note_interrupt() {
    INTERRUPT_PENDING.store(true, Ordering::Relaxed);
}

/// What a wait on the terminal came back with.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ready {
    input: bool,
    wakeup: bool,
}

/// Poll stdin and the wakeup pipe. An interrupted poll reports nothing.
#[cfg(unix)]
fn poll_inputs(timeout_ms: i32) -> io::Result<Ready> {
    // poll() skips negative descriptors, so a missing pipe is harmless.
    let mut fds = [
        libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        },
        libc::pollfd {
            fd: WAKE_READ.load(Ordering::Relaxed),
            events: libc::POLLIN,
            revents: 0,
        },
    ];
    let n = unsafe { libc::poll(fds.as_mut_ptr(), 2, timeout_ms) };
    if n < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(Ready {
                input: false,
                wakeup: false,
            })
        } else {
            Err(err)
        };
    }
    Ok(Ready {
        input: fds[0].revents != 0,
        wakeup: fds[1].revents != 0,
    })
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for the panic hook, which cannot
/// reach the [`Terminal`] that owns the primary copy.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Reset SGR attributes, show the cursor, exit the alternate screen.
///
/// The alternate screen exit is last so the shell's content comes back
/// clean.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h\x1b[?1049l";

static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence straight to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// cbreak-style raw mode: no echo, no line editing, no output processing,
/// 8-bit input. `ISIG` stays on so Ctrl-C still raises SIGINT.
#[cfg(unix)]
fn make_raw(termios: &mut libc::termios) {
    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::IEXTEN);
    termios.c_lflag |= libc::ISIG;
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    // read() blocks until at least one byte is available.
    termios.c_cc[libc::VMIN] = 1;
    termios.c_cc[libc::VTIME] = 0;
}

// ─── Reading ────────────────────────────────────────────────────────────────

/// Outcome of one blocking read from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// This many bytes were read.
    Data(usize),
    /// A signal woke the wait before any input. Check [`take_resize`] and
    /// [`take_interrupt`].
    Interrupted,
    /// Input is closed.
    Closed,
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal session with RAII cleanup.
///
/// [`enter`](Self::enter) switches to raw mode and the alternate screen.
/// The terminal is restored by [`leave`](Self::leave), on drop, and from
/// the panic hook.
pub struct Terminal {
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    size: Size,

    active: bool,
}

impl Terminal {
    /// Create a handle and query the current size, falling back to
    /// `fallback` when the size cannot be determined.
    ///
    /// Does **not** enter raw mode.
    #[must_use]
    pub fn new(fallback: Size) -> Self {
        let size = get_size().unwrap_or(fallback);
        Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size from the OS and cache it.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter raw mode, switch to the alternate screen, hide the cursor and
    /// clear. Ctrl-C is caught until [`leave`](Self::leave). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        install_sigwinch_handler();
        self.enable_raw_mode()?;
        catch_interrupt();

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::enter_alt_screen(&mut lock)?;
        ansi::cursor_hide(&mut lock)?;
        ansi::clear_screen(&mut lock)?;
        lock.flush()?;

        self.active = true;
        debug!(width = self.size.width, height = self.size.height, "terminal session started");
        Ok(())
    }

    /// Restore the terminal. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::reset(&mut lock)?;
        ansi::cursor_show(&mut lock)?;
        ansi::exit_alt_screen(&mut lock)?;
        lock.flush()?;
        drop(lock);

        release_interrupt();
        self.disable_raw_mode()?;
        self.active = false;
        debug!("terminal session ended");
        Ok(())
    }

    /// Block until input arrives, a signal wakes the wait, or input closes.
    ///
    /// # Errors
    ///
    /// Returns any poll or read error other than `EINTR`.
    #[cfg(unix)]
    pub fn read_input(&self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        let ready = poll_inputs(-1)?;
        if ready.wakeup {
            drain_wakeups();
            return Ok(ReadOutcome::Interrupted);
        }
        if !ready.input {
            return Ok(ReadOutcome::Interrupted);
        }

        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        match n {
            0 => Ok(ReadOutcome::Closed),
            n if n > 0 => Ok(ReadOutcome::Data(n.unsigned_abs())),
            _ => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    Ok(ReadOutcome::Interrupted)
                } else {
                    Err(err)
                }
            }
        }
    }

    #[cfg(not(unix))]
    pub fn read_input(&self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        use std::io::Read;
        match io::stdin().read(buf) {
            Ok(0) => Ok(ReadOutcome::Closed),
            Ok(n) => Ok(ReadOutcome::Data(n)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadOutcome::Interrupted),
            Err(e) => Err(e),
        }
    }

    /// Wait up to `timeout_ms` for input or a signal wakeup.
    ///
    /// # Errors
    ///
    /// Returns any `poll` error other than `EINTR`.
    #[cfg(unix)]
    pub fn poll_readable(&self, timeout_ms: i32) -> io::Result<bool> {
        let ready = poll_inputs(timeout_ms)?;
        Ok(ready.input || ready.wakeup)
    }

    #[cfg(not(unix))]
    pub fn poll_readable(&self, _timeout_ms: i32) -> io::Result<bool> {
        Ok(false)
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }

        let fd = libc::STDIN_FILENO;

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            make_raw(&mut termios);

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
