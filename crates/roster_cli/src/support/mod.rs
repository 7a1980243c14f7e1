pub mod fs;
pub mod io;
pub mod print;
