pub(crate) mod camera;
pub(crate) mod options;
pub(crate) mod surface;
pub(crate) mod text;
pub(crate) mod vgroup;
