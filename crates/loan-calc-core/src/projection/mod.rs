pub mod equilibrium;
pub mod tenure_curve;
