pub mod dialog;
pub mod path_input;
pub mod status_bar;
pub mod tree;
