pub mod bs;
pub mod spline;
pub mod vix;
