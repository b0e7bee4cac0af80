//! Modelos neutrales (Artifact, Fingerprint, ExecutionContext, secretos).

pub mod artifact;
pub mod context;
pub mod fingerprint;
pub mod secret;
pub mod typed_artifact;

pub use artifact::{Artifact, ArtifactKind};
pub use context::{ExecutionContext, StepRuntime};
pub use fingerprint::StepFingerprintInput;
pub use secret::{Credential, SecretBinding, AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY};
pub use typed_artifact::{ArtifactDecodeError, ArtifactSpec};
