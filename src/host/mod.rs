pub(crate) mod core;
pub(crate) mod node;
pub(crate) mod registry;
pub(crate) mod source;
