pub(crate) mod bob;
pub(crate) mod dispatch;
pub(crate) mod kernel;
pub(crate) mod parity;
