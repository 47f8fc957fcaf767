pub mod prelude;

pub mod tokens;
