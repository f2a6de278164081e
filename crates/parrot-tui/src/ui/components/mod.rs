pub mod nav_bar;
pub mod statusbar;
