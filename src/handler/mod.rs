pub mod feeds;
pub mod trades;
