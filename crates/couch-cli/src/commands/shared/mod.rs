pub mod input;
pub mod pages;
