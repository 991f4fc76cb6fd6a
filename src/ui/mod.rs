pub(crate) mod button;
pub(crate) mod image;
pub(crate) mod item_list;
pub(crate) mod nine_slice;
pub(crate) mod panel;
pub(crate) mod root;
pub(crate) mod text;
pub(crate) mod widget;
