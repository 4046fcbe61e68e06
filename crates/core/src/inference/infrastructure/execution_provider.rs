/// Execution providers for the RetinaFace session.
///
/// The detector is deliberately CPU-bound on every platform so results do
/// not depend on which accelerator happens to be available.
pub fn cpu_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    vec![ort::execution_providers::CPUExecutionProvider::default().build()]
}
