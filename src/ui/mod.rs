pub mod grid;
pub mod list;
pub mod panels;
pub mod thumbnail;
