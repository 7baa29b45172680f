pub mod error;
pub mod gap;
pub mod indices;
pub mod net;
pub mod netlist;
pub mod parser;
