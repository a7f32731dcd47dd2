pub mod budget;
pub mod solvers;
