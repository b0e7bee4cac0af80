//! Macros utilitarias para declarar Artifacts y Steps tipados.
//!
//! Exportadas en la raíz del crate:
//!   use churn_core::{typed_artifact, typed_step};

/// Declara un Artifact tipado con derives y ArtifactSpec.
///
/// - typed_artifact!(Name { field1: Ty1, field2: Ty2 }); // KIND = GenericJson
/// - typed_artifact!(Name { field1: Ty1 } kind: $kind_expr );
#[macro_export]
macro_rules! typed_artifact {
    ($name:ident { $($fname:ident : $fty:ty),+ $(,)? } kind: $kind:expr) => {
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        pub struct $name { $(pub $fname: $fty,)+ pub schema_version: u32 }
        impl $crate::model::ArtifactSpec for $name {
            const KIND: $crate::model::ArtifactKind = $kind;
        }
    };
    ($name:ident { $($fname:ident : $fty:ty),+ $(,)? }) => {
        $crate::typed_artifact!($name { $($fname : $fty),+ } kind: $crate::model::ArtifactKind::GenericJson);
    };
}

/// Declara un step unitario. El cuerpo devuelve `Result<Output, CoreEngineError>`.
#[macro_export]
macro_rules! typed_step {
    (
        source $name:ident {
            id: $id:expr,
            output: $out:ty,
            params: $params:ty,
            run($self_ident:ident, $p_ident:ident, $rt_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug, Default)]
        pub struct $name;
        impl $name { pub fn new() -> Self { Self } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $out;
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $crate::step::StepKind::Source }
            fn run_typed(&self,
                         _input: Option<Self::Input>,
                         $p_ident: Self::Params,
                         $rt_ident: &$crate::model::StepRuntime)
                         -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                let res: Result<Self::Output, $crate::errors::CoreEngineError> = (|| $body)();
                res.into()
            }
        }
    };

    (
        step $name:ident {
            id: $id:expr,
            kind: $kind:expr,
            input: $inp:ty,
            output: $out:ty,
            params: $params:ty,
            run($self_ident:ident, $inp_ident:ident, $p_ident:ident, $rt_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug, Default)]
        pub struct $name;
        impl $name { pub fn new() -> Self { Self } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $inp;
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $kind }
            fn run_typed(&self,
                         input: Option<Self::Input>,
                         $p_ident: Self::Params,
                         $rt_ident: &$crate::model::StepRuntime)
                         -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                let $inp_ident: Self::Input = match input {
                    Some(v) => v,
                    None => {
                        return $crate::step::StepRunResultTyped::Failure {
                            error: $crate::errors::CoreEngineError::MissingInputs($id.to_string()),
                        }
                    }
                };
                let res: Result<Self::Output, $crate::errors::CoreEngineError> = (|| $body)();
                res.into()
            }
        }
    };
}
