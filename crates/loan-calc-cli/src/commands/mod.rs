pub mod affordability;
pub mod loan;
pub mod projection;
