use ember_core::{narrate, EmberError, Narrator, Result};
use ember_rounds::{spawn_guarded, TicketGuard};
use parking_lot::Mutex;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

const SPEECH_PROGRAMS: [&str; 2] = ["say", "espeak"];

/// Reads lines through the system speech program, or prints them when there is none.
pub struct SpeechNarrator {
    program: Option<&'static str>,
    current: Mutex<Option<Child>>,
}

impl SpeechNarrator {
    /// Picks the first speech program found on `PATH`.
    pub fn detect() -> Self {
        let program = SPEECH_PROGRAMS.into_iter().find(|p| on_path(p));
        match program {
            Some(p) => tracing::debug!("Narrating with {}", p),
            None => tracing::debug!("No speech program found, narration will be printed"),
        }
        Self {
            program,
            current: Mutex::new(None),
        }
    }
}

fn on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| is_file(&dir.join(program))))
        .unwrap_or(false)
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

impl Narrator for SpeechNarrator {
    fn speak(&self, line: &str) -> Result<()> {
        self.stop();

        let Some(program) = self.program else {
            println!("  » {}", line);
            return Ok(());
        };

        let child = Command::new(program)
            .arg(line)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EmberError::narration(format!("{} failed to start: {}", program, e)))?;
        *self.current.lock() = Some(child);
        Ok(())
    }

    fn stop(&self) {
        if let Some(mut child) = self.current.lock().take() {
            if let Err(e) = child.start_kill() {
                tracing::debug!("Speech already finished: {}", e);
            }
        }
    }
}

/// Holds at most one queued line. Queuing a new line drops whatever was still waiting.
pub struct NarrationQueue {
    narrator: Arc<dyn Narrator>,
    pending: Option<JoinHandle<bool>>,
}

impl NarrationQueue {
    pub fn new(narrator: Arc<dyn Narrator>) -> Self {
        Self {
            narrator,
            pending: None,
        }
    }

    /// Speaks `line` after `delay`, unless the round behind `guard` ends first.
    pub fn say_after(&mut self, guard: TicketGuard, delay: Duration, line: String) {
        self.silence();
        let narrator = self.narrator.clone();
        self.pending = Some(spawn_guarded(guard, delay, move || async move {
            narrate(narrator.as_ref(), &line)
        }));
    }

    pub fn say_now(&mut self, line: &str) {
        self.silence();
        narrate(self.narrator.as_ref(), line);
    }

    /// Drops the queued line and cuts off current speech.
    pub fn silence(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.narrator.stop();
    }
}
