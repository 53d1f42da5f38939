mod download_orchestrator;
pub(crate) use download_orchestrator::*;
