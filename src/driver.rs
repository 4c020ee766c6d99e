pub(crate) mod coroutine;
pub(crate) mod ops;
