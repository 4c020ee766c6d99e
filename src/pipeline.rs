pub(crate) mod drawable;
pub(crate) mod orchestrator;
pub(crate) mod tick;
