pub mod changes;
pub mod db;
pub mod design;
pub mod dispatch;
pub mod doc;
pub mod server;
pub mod shared;
pub mod view;
