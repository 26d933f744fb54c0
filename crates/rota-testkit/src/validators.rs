//! Validators with controllable verdicts.
//!
//! - [`ScriptedValidator`]: replays a fixed list of verdicts
//! - [`GatedValidator`]: each call waits until the test releases its [`Gate`]
//! - [`FlakyValidator`]: seeded random rejections, like a flaky policy service

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::oneshot;

use rota::{Rejection, Validator};
use rota_core::PermissionsModel;

type Verdict = Result<(), Rejection>;

/// Replays verdicts in order, then falls back to a fixed verdict.
#[derive(Debug)]
pub struct ScriptedValidator {
    script: Mutex<VecDeque<Verdict>>,
    fallback: Verdict,
    seen: Mutex<Vec<PermissionsModel>>,
}

impl ScriptedValidator {
    /// Replay `script`, accepting once it runs out.
    pub fn new(script: impl IntoIterator<Item = Verdict>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: Ok(()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Reject every call with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            fallback: Err(Rejection::new(reason)),
            ..Self::new([])
        }
    }

    /// Models passed to `validate`, in call order.
    pub fn seen(&self) -> Vec<PermissionsModel> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Validator for ScriptedValidator {
    async fn validate(&self, model: &PermissionsModel) -> Result<(), Rejection> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(model.clone());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Release handle for one pending validation.
#[derive(Debug)]
pub struct Gate(oneshot::Sender<Verdict>);

impl Gate {
    /// Let the validation succeed.
    pub fn accept(self) {
        let _ = self.0.send(Ok(()));
    }

    /// Let the validation fail with `reason`.
    pub fn reject(self, reason: impl Into<String>) {
        let _ = self.0.send(Err(Rejection::new(reason)));
    }
}

/// Each `validate` call takes the next gate (in the order gates were
/// created) and suspends until that gate is released.
///
/// Lets a test observe the optimistic write and resolve overlapping
/// commits in any order. A call with no gate left, or whose gate was
/// dropped unreleased, is rejected.
#[derive(Debug, Default)]
pub struct GatedValidator {
    pending: Mutex<VecDeque<oneshot::Receiver<Verdict>>>,
    calls: AtomicUsize,
}

impl GatedValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a gate for the next unclaimed `validate` call.
    pub fn gate(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut pending) = self.pending.lock() {
            pending.push_back(rx);
        }
        Gate(tx)
    }

    /// Number of `validate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Validator for GatedValidator {
    async fn validate(&self, _model: &PermissionsModel) -> Result<(), Rejection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = self.pending.lock().ok().and_then(|mut p| p.pop_front());
        match rx {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(Rejection::new("gate dropped"))),
            None => Err(Rejection::new("no gate queued")),
        }
    }
}

/// Rejects each call independently with a fixed probability, drawn from a
/// seeded generator so runs are reproducible.
#[derive(Debug)]
pub struct FlakyValidator {
    rng: Mutex<StdRng>,
    reject_probability: f64,
}

impl FlakyValidator {
    /// `reject_probability` is clamped to `0.0..=1.0`; NaN never rejects.
    pub fn new(seed: u64, reject_probability: f64) -> Self {
        let reject_probability = if reject_probability.is_nan() {
            0.0
        } else {
            reject_probability.clamp(0.0, 1.0)
        };
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            reject_probability,
        }
    }
}

#[async_trait]
impl Validator for FlakyValidator {
    async fn validate(&self, _model: &PermissionsModel) -> Result<(), Rejection> {
        let reject = match self.rng.lock() {
            Ok(mut rng) => rng.gen_bool(self.reject_probability),
            Err(_) => true,
        };
        if reject {
            Err(Rejection::new("simulated policy service rejection"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_validator_replays_then_falls_back() {
        let validator = ScriptedValidator::new([Err(Rejection::new("first")), Ok(())]);
        let model = PermissionsModel::default();

        assert_eq!(validator.validate(&model).await, Err(Rejection::new("first")));
        assert_eq!(validator.validate(&model).await, Ok(()));
        assert_eq!(validator.validate(&model).await, Ok(()));
        assert_eq!(validator.seen().len(), 3);
    }

    #[tokio::test]
    async fn test_rejecting_validator() {
        let validator = ScriptedValidator::rejecting("closed");
        let verdict = validator.validate(&PermissionsModel::default()).await;
        assert_eq!(verdict, Err(Rejection::new("closed")));
    }

    #[tokio::test]
    async fn test_gated_validator_waits_for_release() {
        let validator = GatedValidator::new();
        let gate = validator.gate();

        let model = PermissionsModel::default();
        let (verdict, ()) = tokio::join!(validator.validate(&model), async move {
            tokio::task::yield_now().await;
            gate.reject("not yet");
        });

        assert_eq!(verdict, Err(Rejection::new("not yet")));
        assert_eq!(validator.calls(), 1);
    }

    #[tokio::test]
    async fn test_gated_validator_without_gate_rejects() {
        let validator = GatedValidator::new();
        let verdict = validator.validate(&PermissionsModel::default()).await;
        assert_eq!(verdict, Err(Rejection::new("no gate queued")));
    }

    #[tokio::test]
    async fn test_flaky_validator_is_reproducible() {
        let model = PermissionsModel::default();
        let mut runs = Vec::new();
        for _ in 0..2 {
            let validator = FlakyValidator::new(7, 0.2);
            let mut verdicts = Vec::new();
            for _ in 0..50 {
                verdicts.push(validator.validate(&model).await.is_ok());
            }
            runs.push(verdicts);
        }

        assert_eq!(runs[0], runs[1]);
        assert!(runs[0].iter().any(|ok| *ok));
    }

    #[tokio::test]
    async fn test_flaky_validator_extremes() {
        let model = PermissionsModel::default();
        assert!(FlakyValidator::new(1, 0.0).validate(&model).await.is_ok());
        assert!(FlakyValidator::new(1, 1.0).validate(&model).await.is_err());
        assert!(FlakyValidator::new(1, f64::NAN).validate(&model).await.is_ok());
        assert!(FlakyValidator::new(1, f64::INFINITY).validate(&model).await.is_err());
    }
}
