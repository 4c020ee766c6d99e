pub(crate) mod buffers;
pub(crate) mod graphics;
pub(crate) mod transform;
