pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod model;
pub(crate) mod slices;
