//! Monte Carlo simulation of a white LED, coloured objects, a black camera
//! housing and an RGB photodiode, projected onto a chromaticity plane.

pub mod color;
pub mod data;
pub mod render;
pub mod sim;
