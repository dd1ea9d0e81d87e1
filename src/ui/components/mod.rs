pub mod dashboard;
pub mod library_list;
pub mod progress_bar;
pub mod selection_list;
pub mod stats_sidebar;
pub mod typing_area;
