//! Domain models for the Pest.i monitoring platform

mod forecast;
mod notification;
mod observation;

pub use forecast::*;
pub use notification::*;
pub use observation::*;
