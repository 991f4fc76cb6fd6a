pub(crate) mod decode;
pub(crate) mod registry;
pub(crate) mod source;
