pub mod ancestry;
pub mod three_way;
