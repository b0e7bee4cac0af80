use std::marker::PhantomData;

use super::{StepDefinition, TypedStep};
use crate::errors::CoreEngineError;
use crate::model::SecretBinding;
use crate::repo::{build_flow_definition, FlowDefinition};

/// Marker trait to assert two types are the same at compile time.
/// Implemented only for identical types (T: SameAs<T> for all T).
pub trait SameAs<T> {}
impl<T> SameAs<T> for T {}

/// Typed graph builder: `then` only compiles when the next step's input is
/// the previous step's output, so every edge is checked before boxing.
///
/// Usage:
///   let def = Pipe::named("validate-train", ValidateStep::new(..))
///       .then(TrainStep::after_validation())
///       .use_secret(SecretBinding::s3("minio-connection"))
///       .build()?;
pub struct Pipe<S: TypedStep + 'static> {
    name: String,
    steps: Vec<Box<dyn StepDefinition>>,
    secret: Option<SecretBinding>,
    _out: PhantomData<<S as TypedStep>::Output>,
}

impl<S> Pipe<S> where S: TypedStep + std::fmt::Debug + 'static
{
    /// Graph named after its first step.
    pub fn new(step: S) -> Self {
        let name = TypedStep::id(&step).to_string();
        Self::named(name, step)
    }

    pub fn named(name: impl Into<String>, step: S) -> Self {
        Self { name: name.into(),
               steps: vec![Box::new(step)],
               secret: None,
               _out: PhantomData }
    }

    /// Append a new step, enforcing N::Input == S::Output at compile time.
    pub fn then<N>(mut self, next: N) -> Pipe<N>
        where N: TypedStep + std::fmt::Debug + 'static,
              <N as TypedStep>::Input: SameAs<<S as TypedStep>::Output>
    {
        self.steps.push(Box::new(next));
        Pipe::<N> { name: self.name,
                    steps: self.steps,
                    secret: self.secret,
                    _out: PhantomData }
    }

    /// Attach the graph-wide credential binding. Every step that requires
    /// storage receives the same credential through it.
    pub fn use_secret(mut self, binding: SecretBinding) -> Self {
        self.secret = Some(binding);
        self
    }

    pub fn build(self) -> Result<FlowDefinition, CoreEngineError> {
        build_flow_definition(self.name, self.steps, self.secret)
    }
}
