//! Compiling many units at once.

use std::sync::Arc;

use crate::driver::{CompileOptions, Compiler, SourceUnit};
use crate::error::{CompileError, Result};
use crate::external::ExternalCompiler;

/// Outcome for one unit of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub source_name: String,
    pub result: Result<String>,
}

impl BuildOutput {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Compile every unit on tokio's blocking pool.
///
/// Units are independent: they may finish in any order and one failure does
/// not stop the others. The returned outputs follow the order of `units`.
pub async fn compile_all<E>(
    compiler: Arc<Compiler<E>>,
    units: Vec<SourceUnit>,
    options: CompileOptions,
) -> Vec<BuildOutput>
where
    E: ExternalCompiler + 'static,
{
    let tasks: Vec<_> = units
        .into_iter()
        .map(|unit| {
            let compiler = Arc::clone(&compiler);
            let source_name = unit.name().to_string();
            let task = tokio::task::spawn_blocking(move || compiler.compile(&unit, &options));
            (source_name, task)
        })
        .collect();

    tracing::debug!(units = tasks.len(), "batch started");

    let mut outputs = Vec::with_capacity(tasks.len());
    for (source_name, task) in tasks {
        let result = match task.await {
            Ok(result) => result,
            Err(e) => Err(CompileError::new(
                source_name.as_str(),
                format!("compile task failed: {}", e),
            )),
        };
        outputs.push(BuildOutput {
            source_name,
            result,
        });
    }
    outputs
}
