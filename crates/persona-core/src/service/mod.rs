//! Application services that sit outside the edit controller.

pub mod bootstrap;
