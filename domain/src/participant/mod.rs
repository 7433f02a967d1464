//! Panel composition: providers, participant seats and the judge seat.

pub mod entities;
