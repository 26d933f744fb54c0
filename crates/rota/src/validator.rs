//! Validation seam for permission commits.
//!
//! A commit is applied optimistically and then handed to a [`Validator`],
//! which stands in for a remote policy-approval service. Its acceptance
//! policy is entirely up to the implementation.

use std::sync::Arc;

use async_trait::async_trait;
use rota_core::PermissionsModel;
use thiserror::Error;

/// A validator's refusal of a proposed model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Rejection {
    /// Human-readable reason, suitable for showing to the user.
    pub reason: String,
}

impl Rejection {
    /// Create a rejection with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Decides whether a proposed permissions model may become the new
/// last-committed-good model.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Accept or reject `model`.
    async fn validate(&self, model: &PermissionsModel) -> Result<(), Rejection>;
}

#[async_trait]
impl<V: Validator + ?Sized> Validator for Arc<V> {
    async fn validate(&self, model: &PermissionsModel) -> Result<(), Rejection> {
        (**self).validate(model).await
    }
}

#[async_trait]
impl<V: Validator + ?Sized> Validator for Box<V> {
    async fn validate(&self, model: &PermissionsModel) -> Result<(), Rejection> {
        (**self).validate(model).await
    }
}

/// Accepts every model.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

#[async_trait]
impl Validator for AcceptAll {
    async fn validate(&self, _model: &PermissionsModel) -> Result<(), Rejection> {
        Ok(())
    }
}

/// Synchronous validator built from a closure.
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&PermissionsModel) -> Result<(), Rejection> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&PermissionsModel) -> Result<(), Rejection> + Send + Sync,
{
    async fn validate(&self, model: &PermissionsModel) -> Result<(), Rejection> {
        (self.0)(model)
    }
}
