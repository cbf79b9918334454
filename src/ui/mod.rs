pub mod figure_window;
