pub mod bootstrap;
pub mod console;
