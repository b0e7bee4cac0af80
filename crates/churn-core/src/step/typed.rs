use serde::{de::DeserializeOwned, Serialize};

use super::{StepKind, StepRunResult};
use crate::errors::CoreEngineError;
use crate::model::{ArtifactSpec, ExecutionContext, StepRuntime};

/// Resultado tipado de ejecutar un `TypedStep`.
pub enum StepRunResultTyped<Out: ArtifactSpec> {
    Success { outputs: Vec<Out> },
    Failure { error: CoreEngineError },
}

impl<Out: ArtifactSpec> StepRunResultTyped<Out> {
    /// Convierte a `StepRunResult` neutro vía `ArtifactSpec::into_artifact`.
    pub fn into_neutral(self) -> StepRunResult {
        match self {
            StepRunResultTyped::Success { outputs } => {
                match outputs.into_iter().map(ArtifactSpec::into_artifact).collect() {
                    Ok(outputs) => StepRunResult::Success { outputs },
                    Err(error) => StepRunResult::Failure { error },
                }
            }
            StepRunResultTyped::Failure { error } => StepRunResult::Failure { error },
        }
    }
}

impl<Out: ArtifactSpec> From<Result<Out, CoreEngineError>> for StepRunResultTyped<Out> {
    fn from(res: Result<Out, CoreEngineError>) -> Self {
        match res {
            Ok(out) => StepRunResultTyped::Success { outputs: vec![out] },
            Err(error) => StepRunResultTyped::Failure { error },
        }
    }
}

/// Interfaz de alto nivel para Steps con tipos fuertes (Params / Input /
/// Output). Un adaptador genérico la expone como `StepDefinition`.
pub trait TypedStep {
    type Params: DeserializeOwned + Serialize + Clone + Default;
    type Input: ArtifactSpec;
    type Output: ArtifactSpec;

    fn id(&self) -> &'static str;

    fn name(&self) -> &str {
        self.id()
    }

    fn kind(&self) -> StepKind;

    fn requires_storage(&self) -> bool {
        false
    }

    fn params_default(&self) -> Self::Params {
        Default::default()
    }

    /// Ejecución tipada. Para `Source`, `input` es `None`.
    fn run_typed(&self,
                 input: Option<Self::Input>,
                 params: Self::Params,
                 runtime: &StepRuntime)
                 -> StepRunResultTyped<Self::Output>;
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

impl<T> crate::step::StepDefinition for T where T: TypedStep + std::fmt::Debug + 'static
{
    fn id(&self) -> &str {
        <Self as TypedStep>::id(self)
    }

    fn name(&self) -> &str {
        <Self as TypedStep>::name(self)
    }

    fn base_params(&self) -> serde_json::Value {
        serde_json::to_value(self.params_default()).unwrap_or(serde_json::Value::Null)
    }

    fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
        let params: <Self as TypedStep>::Params = match ctx.params_as() {
            Ok(p) => p,
            Err(e) => return StepRunResult::Failure { error: CoreEngineError::InvalidParams(e.to_string()) },
        };

        let typed_in = match (<Self as TypedStep>::kind(self), ctx.input.as_ref()) {
            (StepKind::Source, _) => None,
            (_, None) => {
                return StepRunResult::Failure { error: CoreEngineError::MissingInputs(TypedStep::id(self).to_string()) }
            }
            (_, Some(a)) => match <Self as TypedStep>::Input::from_artifact(a) {
                Ok(v) => Some(v),
                Err(e) => return StepRunResult::Failure { error: e.into() },
            },
        };

        <Self as TypedStep>::run_typed(self, typed_in, params, &ctx.runtime).into_neutral()
    }

    fn kind(&self) -> StepKind {
        <Self as TypedStep>::kind(self)
    }

    fn requires_storage(&self) -> bool {
        <Self as TypedStep>::requires_storage(self)
    }

    fn input_type(&self) -> Option<&'static str> {
        match <Self as TypedStep>::kind(self) {
            StepKind::Source => None,
            _ => Some(short_type_name::<<Self as TypedStep>::Input>()),
        }
    }

    fn output_type(&self) -> &'static str {
        short_type_name::<<Self as TypedStep>::Output>()
    }

    fn definition_hash(&self) -> String {
        let hash_input = serde_json::json!({
            "id": TypedStep::id(self),
            "kind": format!("{:?}", TypedStep::kind(self)),
            "requires_storage": TypedStep::requires_storage(self),
            "base_params": crate::step::StepDefinition::base_params(self),
            "type": std::any::type_name::<T>()
        });
        crate::hashing::hash_value(&hash_input)
    }
}
