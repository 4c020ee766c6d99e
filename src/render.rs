pub(crate) mod agent;
pub(crate) mod worker;
