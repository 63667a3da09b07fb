pub(crate) mod format;
#[allow(clippy::module_inception)]
pub(crate) mod frame;
pub(crate) mod plane;
