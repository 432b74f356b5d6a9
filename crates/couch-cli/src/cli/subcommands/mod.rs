mod db;
mod design;
mod doc;

pub use db::DbCommands;
pub use design::DesignCommands;
pub use doc::DocCommands;
