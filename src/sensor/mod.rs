pub mod simulator;

pub use simulator::{collect, generate, generate_with};
