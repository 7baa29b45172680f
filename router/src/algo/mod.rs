pub mod left_edge;
pub mod ordering;
