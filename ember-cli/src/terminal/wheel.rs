use async_trait::async_trait;
use ember_core::Result;
use ember_rounds::{SpinPlan, WheelPresenter};
use std::io::Write;
use std::time::Duration;

/// Ticks through player names under a fixed pointer, slowing as the wheel eases out.
pub struct TerminalWheel {
    frame: Duration,
}

impl TerminalWheel {
    pub fn new(frame: Duration) -> Self {
        Self { frame }
    }
}

impl Default for TerminalWheel {
    fn default() -> Self {
        Self::new(Duration::from_millis(40))
    }
}

#[async_trait]
impl WheelPresenter for TerminalWheel {
    async fn animate(&self, plan: &SpinPlan) -> Result<()> {
        let frame_ms = self.frame.as_millis().max(1);
        let frames = (plan.duration().as_millis() / frame_ms).max(1) as u32;
        let mut interval = tokio::time::interval(self.frame);
        let mut stdout = std::io::stdout();
        let mut shown: Option<&str> = None;

        for i in 0..=frames {
            interval.tick().await;
            let entry = plan.entry_at(f64::from(i) / f64::from(frames));
            if shown != Some(entry.label.as_str()) {
                write!(stdout, "\r  ▶ {:<32}", entry.label)?;
                stdout.flush()?;
                shown = Some(entry.label.as_str());
            }
        }

        writeln!(stdout)?;
        Ok(())
    }
}
