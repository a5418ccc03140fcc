pub mod graph;
pub mod plcopen;
