use super::SpinPlan;
use async_trait::async_trait;

/// A rendering surface for the wheel.
///
/// `animate` plays the committed plan and resolves once the wheel has stopped; that
/// resolution is the single completion signal for the spin.
#[async_trait]
pub trait WheelPresenter: Send + Sync {
    async fn animate(&self, plan: &SpinPlan) -> ember_core::Result<()>;
}

/// Presenter that completes immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantPresenter;

#[async_trait]
impl WheelPresenter for InstantPresenter {
    async fn animate(&self, _plan: &SpinPlan) -> ember_core::Result<()> {
        Ok(())
    }
}

/// Runs the animation for a committed spin. A failed animation is only cosmetic; the
/// outcome was fixed before it started, so the failure is logged and the spin completes.
pub async fn present(presenter: &dyn WheelPresenter, plan: &SpinPlan) {
    if let Err(e) = presenter.animate(plan).await {
        tracing::warn!("Wheel animation failed for {}: {}", plan.winner().label, e);
    }
}
