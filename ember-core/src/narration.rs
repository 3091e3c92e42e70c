use crate::error::Result;

/// Speaks lines aloud. Implementations start speech and return straight away.
pub trait Narrator: Send + Sync {
    fn speak(&self, line: &str) -> Result<()>;

    /// Cuts off whatever is currently being spoken.
    fn stop(&self);
}

/// Narrator that stays quiet.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&self, _line: &str) -> Result<()> {
        Ok(())
    }

    fn stop(&self) {}
}

/// Best-effort narration: failures are logged and never reach the caller.
pub fn narrate(narrator: &dyn Narrator, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if let Err(e) = narrator.speak(line) {
        tracing::warn!("Narration failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmberError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingNarrator {
        lines: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Narrator for RecordingNarrator {
        fn speak(&self, line: &str) -> Result<()> {
            if self.fail {
                return Err(EmberError::narration("speaker unplugged"));
            }
            self.lines.lock().push(line.to_string());
            Ok(())
        }

        fn stop(&self) {}
    }

    #[test]
    fn test_narrate_forwards_lines() {
        let narrator = RecordingNarrator::default();
        narrate(&narrator, "Ana, what would be your ideal weekend?");
        narrate(&narrator, "   ");
        assert_eq!(narrator.lines.lock().len(), 1);
    }

    #[test]
    fn test_narrate_swallows_failures() {
        let narrator = RecordingNarrator {
            fail: true,
            ..Default::default()
        };
        narrate(&narrator, "This never plays");
        assert!(narrator.lines.lock().is_empty());
    }
}
