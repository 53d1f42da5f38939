mod impls;
mod orchestrator;
mod poller;
mod traits;
mod types;

pub(crate) use impls::*;
pub(crate) use orchestrator::*;
pub(crate) use poller::*;
pub(crate) use traits::*;
pub(crate) use types::*;
