pub mod json;
pub mod plcopen;
