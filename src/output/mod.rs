//! Output destinations for cleaned CSV artifacts

mod cloud;

pub use cloud::CloudDestination;
