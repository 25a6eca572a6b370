pub mod ai;
pub mod demo;
pub mod response;
pub mod upload;
